#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid base URL {0:?}: {1}")]
    InvalidBaseUrl(String, String),

    #[error("Request timeout must be at least one second")]
    InvalidTimeout,
}
