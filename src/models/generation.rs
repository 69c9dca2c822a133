use std::time::Duration;

use serde::Serialize;

use super::clothing::StyleOptions;

/// One try-on to compose. The image bytes stay owned by the caller.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub person_image: &'a [u8],
    pub clothing_image: &'a [u8],
    pub style: StyleOptions,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(person_image: &'a [u8], clothing_image: &'a [u8], style: StyleOptions) -> Self {
        Self {
            person_image,
            clothing_image,
            style,
        }
    }
}

/// Decoded composite returned by a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedImage {
    pub mime_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl GeneratedImage {
    /// File extension matching `mime_type`.
    pub fn extension(&self) -> &'static str {
        extension_for_mime(&self.mime_type)
    }
}

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

/// Per-try bookkeeping inside one orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationAttempt {
    pub attempt_number: u32,
    pub backoff_delay: Duration,
}
