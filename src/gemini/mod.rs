pub mod builder;
pub mod classifier;
pub mod prompt;
pub mod retry;
pub mod transport;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    config::GeminiConfig,
    error::{GenerationError, GenerationResult, Result},
    models::{GeneratedImage, GenerationRequest},
};

pub use builder::RequestBuilder;
pub use classifier::{classify, Classification};
pub use retry::{RetryController, RetryState};
pub use transport::{MockTransport, RawResponse, ReqwestTransport, Transport, TransportRequest};

/// Composes try-on images through the Gemini image model.
///
/// Each call owns its attempt counter; a client can be shared across tasks.
#[derive(Clone)]
pub struct TryOnClient {
    config: GeminiConfig,
    api_key: String,
    builder: RequestBuilder,
    retry: RetryController,
    transport: Arc<dyn Transport>,
}

impl TryOnClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: GeminiConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            builder: RequestBuilder::from_config(&config),
            retry: RetryController::new(config.retry.clone()),
            api_key,
            config,
            transport,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub async fn compose(&self, request: &GenerationRequest<'_>) -> GenerationResult<GeneratedImage> {
        self.compose_cancellable(request, &CancellationToken::new())
            .await
    }

    /// Like [`compose`](Self::compose), abandoning the network wait or the
    /// backoff sleep as soon as `cancel` fires.
    pub async fn compose_cancellable(
        &self,
        request: &GenerationRequest<'_>,
        cancel: &CancellationToken,
    ) -> GenerationResult<GeneratedImage> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let body = self.builder.build_body(request)?;
        let transport_request = TransportRequest {
            url: self.config.endpoint(),
            api_key: self.api_key.clone(),
            key_placement: self.config.key_placement,
            body,
            timeout: self.config.timeout,
        };

        log::info!(
            "Composing {} ({} fit) with model: {}",
            request.style.clothing_type.display_name(),
            request.style.fit_style.display_name(),
            self.config.model
        );

        let max_attempts = self.retry.policy().max_attempts;
        let mut state = self.retry.start();
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    log::debug!("Generation attempt {}/{}", attempt, max_attempts);
                    let outcome = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            log::info!("Generation cancelled during attempt {}", attempt);
                            return Err(GenerationError::Cancelled);
                        }
                        outcome = self.transport.send(&transport_request) => outcome,
                    };

                    let classification = match outcome {
                        Ok(raw) => classify(raw.status, &raw.body),
                        Err(e) => Classification::FatalFailure(e),
                    };
                    self.retry.on_classified(attempt, classification)
                }
                RetryState::Waiting { attempt, status } => {
                    log::warn!(
                        "Gemini API error {}, retrying in {:.1} seconds... (attempt {}/{})",
                        status,
                        attempt.backoff_delay.as_secs_f64(),
                        attempt.attempt_number,
                        max_attempts
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            log::info!("Generation cancelled during backoff");
                            return Err(GenerationError::Cancelled);
                        }
                        _ = tokio::time::sleep(attempt.backoff_delay) => {}
                    }
                    self.retry.on_backoff_elapsed(&attempt)
                }
                RetryState::Succeeded(image) => {
                    log::info!(
                        "Generated {}x{} {} image",
                        image.width,
                        image.height,
                        image.mime_type
                    );
                    return Ok(image);
                }
                RetryState::Exhausted(err) => {
                    log::error!("Generation failed: {}", err);
                    return Err(err);
                }
            };
        }
    }
}
