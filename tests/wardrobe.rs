use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use veer::{
    models::{group_by_kind, NewOutfit, NewToken, Outfit, Token},
    AuthUser, BackendClient, ClothingState, ClothingType, FitStyle, GeneratedImage,
    IdentityProvider, InMemoryBackend, InMemoryIdentity, ServiceError, StyleOptions, TokenKind,
    Wardrobe,
};

fn composite() -> GeneratedImage {
    GeneratedImage {
        mime_type: "image/png".into(),
        data: vec![0x89, b'P', b'N', b'G', 1, 2, 3],
        width: 20,
        height: 30,
    }
}

fn signed_in(id: &str) -> Arc<InMemoryIdentity> {
    Arc::new(InMemoryIdentity::signed_in(AuthUser {
        id: id.into(),
        email: format!("{}@example.com", id),
        first_name: None,
        last_name: None,
    }))
}

/// Stores images but refuses every outfit record.
struct RecordsDown {
    inner: InMemoryBackend,
}

#[async_trait]
impl BackendClient for RecordsDown {
    async fn upload_image(
        &self,
        image: &[u8],
        mime_type: &str,
        user_id: &str,
    ) -> veer::Result<String> {
        self.inner.upload_image(image, mime_type, user_id).await
    }

    async fn save_outfit_record(&self, _outfit: NewOutfit) -> veer::Result<Outfit> {
        Err(ServiceError::Response("insert into outfits failed (503)".into()))
    }

    async fn list_outfits(&self, user_id: &str) -> veer::Result<Vec<Outfit>> {
        self.inner.list_outfits(user_id).await
    }

    async fn delete_outfit(&self, id: Uuid) -> veer::Result<()> {
        self.inner.delete_outfit(id).await
    }

    async fn list_tokens(&self, user_id: &str) -> veer::Result<Vec<Token>> {
        self.inner.list_tokens(user_id).await
    }

    async fn add_token(&self, token: NewToken) -> veer::Result<Token> {
        self.inner.add_token(token).await
    }
}

#[tokio::test]
async fn test_keep_surfaces_record_failure_after_upload() {
    let backend = Arc::new(RecordsDown {
        inner: InMemoryBackend::new(),
    });
    let wardrobe = Wardrobe::new(signed_in("user_1"), backend.clone());

    let err = wardrobe
        .keep(&composite(), StyleOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Response(_)));
    assert_eq!(backend.inner.object_count(), 1);
    assert!(wardrobe.outfits().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_keep_requires_sign_in() {
    let backend = Arc::new(InMemoryBackend::new());
    let wardrobe = Wardrobe::new(Arc::new(InMemoryIdentity::new()), backend.clone());

    let err = wardrobe
        .keep(&composite(), StyleOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));
    assert_eq!(backend.object_count(), 0);
}

#[tokio::test]
async fn test_keep_uploads_then_records_style() {
    let backend = Arc::new(InMemoryBackend::new());
    let wardrobe = Wardrobe::new(signed_in("user_1"), backend.clone());
    let style = StyleOptions::new(ClothingType::Dress, FitStyle::Tight, ClothingState::Closed);

    let outfit: Outfit = wardrobe.keep(&composite(), style).await.unwrap();

    assert_eq!(outfit.user_id, "user_1");
    assert_eq!(outfit.style(), style);
    assert!(outfit.image_url.ends_with(".png"));
    assert_eq!(backend.object(&outfit.image_url).unwrap(), composite().data);

    let outfits = wardrobe.outfits().await.unwrap();
    assert_eq!(outfits.len(), 1);
    assert_eq!(outfits[0].id, outfit.id);
}

#[tokio::test]
async fn test_remove_only_own_outfits() {
    let backend = Arc::new(InMemoryBackend::new());
    let alice = Wardrobe::new(signed_in("alice"), backend.clone());
    let bob = Wardrobe::new(signed_in("bob"), backend.clone());

    let outfit = alice.keep(&composite(), StyleOptions::default()).await.unwrap();

    assert!(matches!(
        bob.remove(outfit.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        alice.remove(Uuid::new_v4()).await,
        Err(ServiceError::NotFound(_))
    ));

    alice.remove(outfit.id).await.unwrap();
    assert!(alice.outfits().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_token_ledger() {
    let backend = Arc::new(InMemoryBackend::new());
    let wardrobe = Wardrobe::new(signed_in("user_1"), backend.clone());

    wardrobe
        .award_token("First look", 10.0, TokenKind::Style, Some("First try-on".into()))
        .await
        .unwrap();
    wardrobe
        .award_token("Daily check-in", 1.5, TokenKind::Daily, None)
        .await
        .unwrap();

    let total = wardrobe.token_total().await.unwrap();
    assert!((total - 11.5).abs() < f64::EPSILON);

    let tokens = wardrobe.tokens().await.unwrap();
    let groups = group_by_kind(&tokens);
    assert_eq!(groups[&TokenKind::Style][0].token_name, "First look");
    assert_eq!(groups[&TokenKind::Daily].len(), 1);

    assert!(backend.list_tokens("someone_else").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sign_out_locks_wardrobe() {
    let identity = Arc::new(InMemoryIdentity::new());
    let backend = Arc::new(InMemoryBackend::new());
    let wardrobe = Wardrobe::new(identity.clone(), backend);

    identity.sign_up("ada@example.com", "correct horse").await.unwrap();
    wardrobe.keep(&composite(), StyleOptions::default()).await.unwrap();
    assert_eq!(wardrobe.outfits().await.unwrap().len(), 1);

    identity.sign_out().await.unwrap();
    assert!(matches!(
        wardrobe.outfits().await,
        Err(ServiceError::Unauthenticated)
    ));
}
