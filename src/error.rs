use thiserror::Error;

/// Failures of a single `compose` call.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// An input image could not be re-encoded, or the request body could not be serialized.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Connectivity, TLS or timeout failure before a status code was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream kept answering with a transient status until attempts ran out.
    #[error("Upstream returned retryable status {status} after {attempts} attempt(s)")]
    RetryableHttp { status: u16, attempts: u32 },

    #[error("Upstream returned HTTP {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    FatalHttp {
        status: u16,
        message: Option<String>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No image found in response")]
    NoImageInResponse,

    #[error("Generated image could not be decoded: {0}")]
    ImageDecode(String),

    #[error("Generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// True when resubmitting the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::RetryableHttp { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationError::Cancelled)
    }

    /// Text suitable for showing to the person using the app.
    ///
    /// Cancellation has no user-facing surface and returns `None`.
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            GenerationError::Encoding(_) => "Failed to process images".to_string(),
            GenerationError::Transport(_) => {
                "Could not reach the try-on service. Check your connection.".to_string()
            }
            GenerationError::RetryableHttp { status: 429, .. } => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            GenerationError::RetryableHttp { .. } => {
                "Service temporarily unavailable. Please try again shortly.".to_string()
            }
            GenerationError::FatalHttp { status: 400, .. } => {
                "The try-on request was rejected. Try different photos.".to_string()
            }
            GenerationError::FatalHttp { status, .. } => format!("HTTP error: {}", status),
            GenerationError::MalformedResponse(_) => "Failed to read the service response".to_string(),
            GenerationError::NoImageInResponse => "No image found in the service response".to_string(),
            GenerationError::ImageDecode(_) => "Failed to decode the generated image".to_string(),
            GenerationError::Cancelled => return None,
        };
        Some(message)
    }

    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        if self.is_transient() {
            Some("This is usually temporary. Tap retry in a few seconds.")
        } else {
            None
        }
    }
}

/// Failures of configuration and the identity/backend collaborators.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Response error: {0}")]
    Response(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
