use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Placeholder operator gate: a fixed username/password pair compared in
/// plain text, no sessions. Not a security mechanism.
pub fn verify_operator(config: &AppConfig, username: &str, password: &str) -> AppResult<()> {
    if username == config.admin_username && password == config.admin_password {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
