use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    error::GenerationError,
    models::{
        gemini::{ApiErrorBody, GenerateContentResponse},
        GeneratedImage,
    },
};

/// Statuses that signal a transient upstream condition.
pub const RETRYABLE_STATUS_CODES: [u16; 4] = [429, 502, 503, 504];

#[derive(Debug)]
pub enum Classification {
    Success(GeneratedImage),
    RetryableFailure(u16),
    FatalFailure(GenerationError),
}

pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}

/// Classifies one HTTP exchange. Pure: no I/O, no logging.
pub fn classify(status: u16, body: &[u8]) -> Classification {
    if status != 200 {
        if is_retryable_status(status) {
            return Classification::RetryableFailure(status);
        }
        return Classification::FatalFailure(GenerationError::FatalHttp {
            status,
            message: error_message(body),
        });
    }

    match decode_success(body) {
        Ok(image) => Classification::Success(image),
        Err(e) => Classification::FatalFailure(e),
    }
}

fn decode_success(body: &[u8]) -> Result<GeneratedImage, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_slice(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let inline = response
        .first_inline_image()
        .ok_or(GenerationError::NoImageInResponse)?;

    let data = STANDARD
        .decode(inline.data.trim())
        .map_err(|e| GenerationError::ImageDecode(format!("invalid base64: {}", e)))?;

    let decoded =
        image::load_from_memory(&data).map_err(|e| GenerationError::ImageDecode(e.to_string()))?;
    let (width, height) = image::GenericImageView::dimensions(&decoded);

    Ok(GeneratedImage {
        mime_type: inline.mime_type.clone(),
        width,
        height,
        data,
    })
}

fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::builder::tests::png_fixture;
    use serde_json::json;

    fn success_body(image: &[u8]) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "candidates": [{
                "content": {"parts": [{"inline_data": {"mime_type": "image/png", "data": STANDARD.encode(image)}}]}
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_retryable_statuses() {
        for status in RETRYABLE_STATUS_CODES {
            assert!(matches!(
                classify(status, b""),
                Classification::RetryableFailure(s) if s == status
            ));
        }
    }

    #[test]
    fn test_other_non_200_statuses_are_fatal() {
        for status in (100u16..600).filter(|s| *s != 200 && !RETRYABLE_STATUS_CODES.contains(s)) {
            match classify(status, b"") {
                Classification::FatalFailure(GenerationError::FatalHttp { status: s, .. }) => {
                    assert_eq!(s, status)
                }
                other => panic!("status {} classified as {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_fatal_carries_vendor_message() {
        let body = br#"{"error": {"code": 400, "message": "Image too large", "status": "INVALID_ARGUMENT"}}"#;
        match classify(400, body) {
            Classification::FatalFailure(GenerationError::FatalHttp { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Image too large"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_success_decodes_image() {
        let png = png_fixture(10, 6, 4);
        match classify(200, &success_body(&png)) {
            Classification::Success(image) => {
                assert_eq!(image.mime_type, "image/png");
                assert_eq!((image.width, image.height), (10, 6));
                assert_eq!(image.data, png);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_is_not_retried() {
        assert!(matches!(
            classify(200, b"<html>oops</html>"),
            Classification::FatalFailure(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            classify(200, br#"{"promptFeedback": {}}"#),
            Classification::FatalFailure(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_empty_candidates_is_no_image() {
        assert!(matches!(
            classify(200, br#"{"candidates": []}"#),
            Classification::FatalFailure(GenerationError::NoImageInResponse)
        ));
    }

    #[test]
    fn test_text_only_candidate_is_no_image() {
        let body = br#"{"candidates": [{"content": {"parts": [{"text": "I can't do that"}]}, "finishReason": "SAFETY"}]}"#;
        assert!(matches!(
            classify(200, body),
            Classification::FatalFailure(GenerationError::NoImageInResponse)
        ));
    }

    #[test]
    fn test_bad_payload_is_image_decode_error() {
        let not_base64 = br#"{"candidates": [{"content": {"parts": [{"inline_data": {"mime_type": "image/png", "data": "***"}}]}}]}"#;
        assert!(matches!(
            classify(200, not_base64),
            Classification::FatalFailure(GenerationError::ImageDecode(_))
        ));

        let not_an_image = success_body(b"definitely not pixels");
        assert!(matches!(
            classify(200, &not_an_image),
            Classification::FatalFailure(GenerationError::ImageDecode(_))
        ));
    }
}
