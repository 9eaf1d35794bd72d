use thiserror::Error;

use iesgo_shared::ValidationError;
use iesgo_store::StoreError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A logout happened while the sign-in round trip was pending.
    #[error("Login cancelled by logout")]
    LoginCancelled,

    #[error("Invalid selfie payload: {0}")]
    InvalidSelfie(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
