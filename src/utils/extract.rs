//! Extractores con errores de la aplicación
//! 
//! Igual que `axum::Json` y `axum::extract::Query`, pero un cuerpo o query
//! inválido se responde con el formato de error estándar (400) en lugar del
//! rechazo por defecto de axum.

use axum::extract::{FromRequest, FromRequestParts};

use crate::utils::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
