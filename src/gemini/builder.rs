use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;

use crate::{
    config::GeminiConfig,
    error::{GenerationError, GenerationResult},
    models::{
        gemini::{Content, GenerateContentRequest, GenerationConfig, Part},
        GenerationRequest,
    },
};

use super::prompt::instruction_text;

/// Turns two photos and style options into a `generateContent` body.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    jpeg_quality: u8,
    max_image_bytes: usize,
    generation_config: GenerationConfig,
}

impl RequestBuilder {
    pub fn new(jpeg_quality: u8, max_image_bytes: usize) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
            max_image_bytes,
            generation_config: GenerationConfig::default(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(config.jpeg_quality, config.max_image_bytes)
    }

    /// Parts are ordered `[instruction, person, clothing]`.
    pub fn build(&self, request: &GenerationRequest<'_>) -> GenerationResult<GenerateContentRequest> {
        let person = self.encode_image("person", request.person_image)?;
        let clothing = self.encode_image("clothing", request.clothing_image)?;

        Ok(GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text(instruction_text(&request.style)),
                    Part::jpeg(person),
                    Part::jpeg(clothing),
                ],
            }],
            generation_config: self.generation_config.clone(),
        })
    }

    /// Serialized JSON body, byte-identical for identical inputs.
    pub fn build_body(&self, request: &GenerationRequest<'_>) -> GenerationResult<Vec<u8>> {
        let payload = self.build(request)?;
        let body = serde_json::to_vec(&payload)
            .map_err(|e| GenerationError::Encoding(format!("request serialization failed: {}", e)))?;
        log::debug!("Built generation request body: {} KB", body.len() / 1024);
        Ok(body)
    }

    /// Re-encodes one photo as JPEG and returns it as base64.
    fn encode_image(&self, label: &str, bytes: &[u8]) -> GenerationResult<String> {
        if bytes.is_empty() {
            return Err(GenerationError::Encoding(format!("{} image is empty", label)));
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| GenerationError::Encoding(format!("{} image is unreadable: {}", label, e)))?;
        let rgb = decoded.to_rgb8();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| GenerationError::Encoding(format!("{} image JPEG encoding failed: {}", label, e)))?;

        if jpeg.len() > self.max_image_bytes {
            return Err(GenerationError::Encoding(format!(
                "{} image is {} KB after compression, limit is {} KB",
                label,
                jpeg.len() / 1024,
                self.max_image_bytes / 1024
            )));
        }

        log::debug!("{} image size: {} KB", label, jpeg.len() / 1024);
        Ok(STANDARD.encode(&jpeg))
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::from_config(&GeminiConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{gemini::JPEG_MIME_TYPE, ClothingState, ClothingType, FitStyle, StyleOptions};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    pub(crate) fn png_fixture(width: u32, height: u32, seed: u8) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x as u8).wrapping_mul(seed), (y as u8).wrapping_add(seed), seed])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn style() -> StyleOptions {
        StyleOptions::new(ClothingType::Hoodie, FitStyle::Tight, ClothingState::Closed)
    }

    #[test]
    fn test_parts_are_ordered() {
        let person = png_fixture(16, 16, 3);
        let clothing = png_fixture(8, 8, 7);
        let request = GenerationRequest::new(&person, &clothing, style());

        let payload = RequestBuilder::default().build(&request).unwrap();
        let parts = &payload.contents[0].parts;
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], Part::Text { text } if text.contains("hoodie")));
        for part in &parts[1..] {
            match part {
                Part::InlineData { inline_data } => {
                    assert_eq!(inline_data.mime_type, JPEG_MIME_TYPE);
                    let jpeg = STANDARD.decode(&inline_data.data).unwrap();
                    assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
                }
                other => panic!("expected inline data, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_body_is_deterministic() {
        let person = png_fixture(24, 24, 5);
        let clothing = png_fixture(12, 12, 9);
        let request = GenerationRequest::new(&person, &clothing, style());
        let builder = RequestBuilder::default();

        let first = builder.build_body(&request).unwrap();
        let second = builder.build_body(&request).unwrap();
        assert_eq!(first, second);

        let json: serde_json::Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(json["generationConfig"]["topK"], 32);
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/jpeg");
    }

    #[test]
    fn test_empty_image_fails_before_network() {
        let person = png_fixture(4, 4, 1);
        let request = GenerationRequest::new(&person, &[], style());
        let err = RequestBuilder::default().build_body(&request).unwrap_err();
        assert!(matches!(err, GenerationError::Encoding(msg) if msg.contains("clothing")));
    }

    #[test]
    fn test_undecodable_image_is_encoding_error() {
        let clothing = png_fixture(4, 4, 1);
        let request = GenerationRequest::new(b"not an image", &clothing, style());
        let err = RequestBuilder::default().build(&request).unwrap_err();
        assert!(matches!(err, GenerationError::Encoding(msg) if msg.contains("person")));
    }

    #[test]
    fn test_oversized_image_rejected() {
        let person = png_fixture(64, 64, 11);
        let clothing = png_fixture(64, 64, 13);
        let request = GenerationRequest::new(&person, &clothing, style());
        let err = RequestBuilder::new(50, 16).build(&request).unwrap_err();
        assert!(matches!(err, GenerationError::Encoding(msg) if msg.contains("limit")));
    }
}
