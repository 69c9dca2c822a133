use std::env;
use std::time::Duration;

use crate::error::{Result, ServiceError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Long enough for two inline photos plus model latency.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// JPEG quality (0-100) used when re-encoding input photos.
pub const DEFAULT_JPEG_QUALITY: u8 = 50;

/// Upstream rejects inline images above roughly this size.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Where the API key travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiKeyPlacement {
    /// `x-goog-api-key` request header.
    #[default]
    Header,
    /// `?key=` query parameter.
    Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay to wait after a retryable failure on the given 1-based attempt:
    /// `base_delay * 2^(attempt - 1)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub jpeg_quality: u8,
    pub max_image_bytes: usize,
    pub key_placement: ApiKeyPlacement,
    pub retry: RetryPolicy,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            key_placement: ApiKeyPlacement::Header,
            retry: RetryPolicy::default(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let base_url = env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url);
        let model = env::var("GEMINI_MODEL").unwrap_or(defaults.model);
        let timeout = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let jpeg_quality = env::var("GEMINI_JPEG_QUALITY")
            .ok()
            .and_then(|s| s.parse::<u8>().ok())
            .map(|q| q.clamp(1, 100))
            .unwrap_or(defaults.jpeg_quality);
        let key_placement = match env::var("GEMINI_KEY_IN_QUERY").ok().as_deref() {
            Some("true") | Some("1") => ApiKeyPlacement::Query,
            _ => ApiKeyPlacement::Header,
        };

        GeminiConfig {
            api_key,
            base_url,
            model,
            timeout,
            jpeg_quality,
            key_placement,
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn with_key_placement(mut self, placement: ApiKeyPlacement) -> Self {
        self.key_placement = placement;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::Config("Gemini API key is required".into()))
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub bucket: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        SupabaseConfig {
            url: None,
            anon_key: None,
            bucket: "tryon-images".to_string(),
        }
    }
}

impl SupabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let url = env::var("SUPABASE_URL").ok();
        let anon_key = env::var("SUPABASE_ANON_KEY").ok();
        let bucket = env::var("SUPABASE_BUCKET").unwrap_or_else(|_| "tryon-images".to_string());

        SupabaseConfig {
            url,
            anon_key,
            bucket,
        }
    }

    pub fn with_credentials(mut self, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.anon_key = Some(anon_key.into());
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}
