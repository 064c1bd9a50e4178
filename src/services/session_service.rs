//! Verificación de sesiones de Clerk
//!
//! Los tokens de sesión se verifican sin red contra la llave pública
//! PEM de la instancia (RS256). Si `CLERK_JWT_KEY` no es un PEM se usa
//! como secreto HMAC (HS256), útil en desarrollo local y en tests.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::ClerkConfig;
use crate::utils::errors::{AppError, AppResult};

/// Claims relevantes del token de sesión
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    algorithm: Algorithm,
    authorized_parties: Vec<String>,
}

impl SessionVerifier {
    pub fn from_config(config: &ClerkConfig) -> AppResult<Self> {
        let jwt_key = config.jwt_key.trim();

        let (key, algorithm) = if jwt_key.starts_with("-----BEGIN") {
            let key = DecodingKey::from_rsa_pem(jwt_key.as_bytes()).map_err(|e| {
                AppError::Configuration(format!("Invalid CLERK_JWT_KEY public key: {}", e))
            })?;
            (key, Algorithm::RS256)
        } else {
            log::warn!("⚠️ CLERK_JWT_KEY no es un PEM, verificando sesiones con HS256");
            (DecodingKey::from_secret(jwt_key.as_bytes()), Algorithm::HS256)
        };

        Ok(Self {
            key,
            algorithm,
            authorized_parties: config.authorized_parties.clone(),
        })
    }

    /// Verificar un token de sesión y devolver sus claims
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 5;
        validation.validate_nbf = true;
        // Clerk no emite `aud` en los tokens de sesión
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<SessionClaims>(token, &self.key, &validation)
            .map_err(|e| {
                log::debug!("🔒 Token de sesión rechazado: {}", e);
                AppError::Unauthorized("Invalid or expired session token".to_string())
            })?
            .claims;

        if let Some(azp) = &claims.azp {
            if !self.authorized_parties.is_empty() && !self.authorized_parties.contains(azp) {
                return Err(AppError::Unauthorized(format!(
                    "Session issued for unauthorized party '{}'",
                    azp
                )));
            }
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationsConfig;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, azp: Option<&str>, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "user_2abc".to_string(),
            sid: Some("sess_1".to_string()),
            azp: azp.map(str::to_string),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn clerk_config() -> ClerkConfig {
        IntegrationsConfig::for_base_url("http://localhost:9").clerk
    }

    #[test]
    fn valid_session_is_accepted() {
        let verifier = SessionVerifier::from_config(&clerk_config()).unwrap();
        let claims = verifier
            .verify(&token("local-session-secret", None, 300))
            .unwrap();
        assert_eq!(claims.sub, "user_2abc");
        assert_eq!(claims.sid.as_deref(), Some("sess_1"));
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let verifier = SessionVerifier::from_config(&clerk_config()).unwrap();
        assert!(matches!(
            verifier.verify(&token("local-session-secret", None, -600)),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            verifier.verify(&token("other-secret", None, 300)),
            Err(AppError::Unauthorized(_))
        ));
        assert!(verifier.verify("not-a-jwt").is_err());
    }

    #[test]
    fn authorized_parties_are_enforced_when_configured() {
        let mut config = clerk_config();
        config.authorized_parties = vec!["https://app.example.com".to_string()];
        let verifier = SessionVerifier::from_config(&config).unwrap();

        assert!(verifier
            .verify(&token("local-session-secret", Some("https://app.example.com"), 300))
            .is_ok());
        assert!(verifier
            .verify(&token("local-session-secret", Some("https://evil.example.com"), 300))
            .is_err());
    }

    #[test]
    fn malformed_pem_is_a_configuration_error() {
        let mut config = clerk_config();
        config.jwt_key = "-----BEGIN PUBLIC KEY-----\n!!not base64!!\n-----END PUBLIC KEY-----".to_string();
        assert!(matches!(
            SessionVerifier::from_config(&config),
            Err(AppError::Configuration(_))
        ));
    }
}
