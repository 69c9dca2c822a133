//! Caller-side workflow around an accepted try-on: saving it to the user's
//! wardrobe and maintaining the token ledger.
//!
//! Collaborators are passed in explicitly so the same code runs against the
//! REST backend in the app and the in-memory ones in tests.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    backend::BackendClient,
    error::{Result, ServiceError},
    identity::IdentityProvider,
    models::{total_value, GeneratedImage, NewOutfit, NewToken, Outfit, StyleOptions, Token, TokenKind},
};

#[derive(Clone)]
pub struct Wardrobe {
    identity: Arc<dyn IdentityProvider>,
    backend: Arc<dyn BackendClient>,
}

impl Wardrobe {
    pub fn new(identity: Arc<dyn IdentityProvider>, backend: Arc<dyn BackendClient>) -> Self {
        Self { identity, backend }
    }

    fn user_id(&self) -> Result<String> {
        self.identity
            .current_user_id()
            .ok_or(ServiceError::Unauthenticated)
    }

    /// Uploads the composite and records it with the style it was made with.
    pub async fn keep(&self, image: &GeneratedImage, style: StyleOptions) -> Result<Outfit> {
        let user_id = self.user_id()?;

        let image_url = self
            .backend
            .upload_image(&image.data, &image.mime_type, &user_id)
            .await?;

        let outfit = match self
            .backend
            .save_outfit_record(NewOutfit::new(&user_id, image_url.clone(), style))
            .await
        {
            Ok(outfit) => outfit,
            Err(e) => {
                log::warn!(
                    "Outfit record for {} failed, uploaded image left at {}: {}",
                    user_id,
                    image_url,
                    e
                );
                return Err(e);
            }
        };

        log::info!("Saved outfit {} for {}", outfit.id, user_id);
        Ok(outfit)
    }

    pub async fn outfits(&self) -> Result<Vec<Outfit>> {
        let user_id = self.user_id()?;
        self.backend.list_outfits(&user_id).await
    }

    /// Deletes one of the signed-in user's outfits.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let user_id = self.user_id()?;
        let owned = self
            .backend
            .list_outfits(&user_id)
            .await?
            .iter()
            .any(|o| o.id == id);
        if !owned {
            return Err(ServiceError::NotFound(format!("outfit {}", id)));
        }
        self.backend.delete_outfit(id).await
    }

    pub async fn tokens(&self) -> Result<Vec<Token>> {
        let user_id = self.user_id()?;
        self.backend.list_tokens(&user_id).await
    }

    pub async fn token_total(&self) -> Result<f64> {
        Ok(total_value(&self.tokens().await?))
    }

    pub async fn award_token(
        &self,
        name: impl Into<String>,
        value: f64,
        kind: TokenKind,
        description: Option<String>,
    ) -> Result<Token> {
        let user_id = self.user_id()?;
        self.backend
            .add_token(NewToken {
                user_id,
                token_name: name.into(),
                token_value: value,
                token_type: kind,
                description,
            })
            .await
    }
}
