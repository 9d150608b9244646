use catalog_auth::AuthError;

/// Startup and serving failures. Request-level failures never use this type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("authentication setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
