use thiserror::Error;

/// Failure talking to the catalog server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to catalog failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("catalog rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ClientError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
