use crate::{
    error::Result,
    models::{NewOutfit, NewToken, Outfit, Token},
};
use async_trait::async_trait;
use uuid::Uuid;

/// Object storage plus the outfit and token tables.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Stores the image under the user's prefix and returns its public URL.
    async fn upload_image(&self, image: &[u8], mime_type: &str, user_id: &str) -> Result<String>;

    async fn save_outfit_record(&self, outfit: NewOutfit) -> Result<Outfit>;

    /// Newest first.
    async fn list_outfits(&self, user_id: &str) -> Result<Vec<Outfit>>;

    async fn delete_outfit(&self, id: Uuid) -> Result<()>;

    /// Newest `earned_date` first.
    async fn list_tokens(&self, user_id: &str) -> Result<Vec<Token>>;

    async fn add_token(&self, token: NewToken) -> Result<Token>;
}
