use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use glass_workflow::build_router;
use glass_workflow::config::EnvironmentConfig;
use glass_workflow::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🪟 Glass Workflow API");
    info!("=====================");
    info!("🌍 Entorno: {}", config.environment);

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(config)
        .map_err(|e| anyhow::anyhow!("Error inicializando el estado: {}", e))?;
    let app = build_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("📦 Órdenes:");
    info!("   POST /api/orders/create - Crear orden");
    info!("   GET  /api/orders - Listar órdenes");
    info!("   GET  /api/orders/:id - Detalle de orden");
    info!("   POST /api/orders/preview-price - Consultar precio");
    info!("   POST /api/orders/update-status - Cambiar estado");
    info!("   POST /api/orders/schedule - Programar instalación");
    info!("   GET  /api/orders/completed - Órdenes por facturar");
    info!("🧾 Facturación:");
    info!("   POST /api/orders/generate-invoice - Generar factura");
    info!("   POST /api/orders/send-invoice-whatsapp - Enviar factura por WhatsApp");
    info!("👷 Equipos:");
    info!("   POST|PUT /api/crew/save-progress - Autoguardado de progreso");
    info!("   POST /api/crew/complete-job - Completar trabajo");
    info!("   GET  /api/crew/jobs - Trabajos del equipo");
    info!("   POST /api/admin/assign-crew - Asignar equipo a usuario");
    info!("📚 Catálogos:");
    info!("   GET  /api/clients | /api/truck-models | /api/crews | /api/glass-positions");
    info!("   GET  /api/debug/pricing - Tabla de precios agrupada");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
