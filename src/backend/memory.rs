use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    backend::traits::BackendClient,
    error::{Result, ServiceError},
    models::{extension_for_mime, NewOutfit, NewToken, Outfit, Token},
};

/// In-process backend, for tests and offline runs.
#[derive(Default)]
pub struct InMemoryBackend {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    outfits: RwLock<Vec<Outfit>>,
    tokens: RwLock<Vec<Token>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes previously uploaded under `url`.
    pub fn object(&self, url: &str) -> Option<Vec<u8>> {
        self.objects.read().get(url).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }
}

#[async_trait]
impl BackendClient for InMemoryBackend {
    async fn upload_image(&self, image: &[u8], mime_type: &str, user_id: &str) -> Result<String> {
        if image.is_empty() {
            return Err(ServiceError::Request("cannot upload an empty image".into()));
        }
        let url = format!(
            "memory://{}/{}.{}",
            user_id,
            Uuid::new_v4(),
            extension_for_mime(mime_type)
        );
        self.objects.write().insert(url.clone(), image.to_vec());
        Ok(url)
    }

    async fn save_outfit_record(&self, outfit: NewOutfit) -> Result<Outfit> {
        let record = Outfit {
            id: Uuid::new_v4(),
            user_id: outfit.user_id,
            image_url: outfit.image_url,
            clothing_type: outfit.clothing_type,
            fit_style: outfit.fit_style,
            clothing_state: outfit.clothing_state,
            created_at: Utc::now(),
        };
        self.outfits.write().push(record.clone());
        Ok(record)
    }

    async fn list_outfits(&self, user_id: &str) -> Result<Vec<Outfit>> {
        let mut outfits: Vec<Outfit> = self
            .outfits
            .read()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        outfits.reverse();
        outfits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(outfits)
    }

    async fn delete_outfit(&self, id: Uuid) -> Result<()> {
        let mut outfits = self.outfits.write();
        let before = outfits.len();
        outfits.retain(|o| o.id != id);
        if outfits.len() == before {
            return Err(ServiceError::NotFound(format!("outfit {}", id)));
        }
        Ok(())
    }

    async fn list_tokens(&self, user_id: &str) -> Result<Vec<Token>> {
        let mut tokens: Vec<Token> = self
            .tokens
            .read()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tokens.reverse();
        tokens.sort_by(|a, b| b.earned_date.cmp(&a.earned_date));
        Ok(tokens)
    }

    async fn add_token(&self, token: NewToken) -> Result<Token> {
        let now = Utc::now();
        let record = Token {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_name: token.token_name,
            token_value: token.token_value,
            token_type: token.token_type,
            description: token.description,
            earned_date: now,
            created_at: now,
            updated_at: now,
        };
        self.tokens.write().push(record.clone());
        Ok(record)
    }
}
