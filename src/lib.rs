//! Virtual try-on core.
//!
//! [`TryOnClient::compose`] turns a person photo and a clothing photo into a
//! composite through the Gemini image model, retrying transient upstream
//! failures with exponential backoff. The [`identity`], [`backend`] and
//! [`wardrobe`] modules describe the collaborators the app wires around it.

pub mod backend;
pub mod config;
pub mod error;
pub mod gemini;
pub mod identity;
pub mod logger;
pub mod models;
pub mod wardrobe;

pub use backend::{BackendClient, InMemoryBackend, SupabaseBackend};
pub use config::{ApiKeyPlacement, GeminiConfig, RetryPolicy, SupabaseConfig};
pub use error::{GenerationError, GenerationResult, Result, ServiceError};
pub use gemini::{MockTransport, RawResponse, ReqwestTransport, Transport, TryOnClient};
pub use identity::{IdentityProvider, InMemoryIdentity};
pub use models::{
    AuthUser, ClothingState, ClothingType, FitStyle, GeneratedImage, GenerationRequest, Outfit,
    StyleOptions, Token, TokenKind,
};
pub use tokio_util::sync::CancellationToken;
pub use wardrobe::Wardrobe;
