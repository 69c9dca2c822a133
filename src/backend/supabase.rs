use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    backend::traits::BackendClient,
    config::SupabaseConfig,
    error::{Result, ServiceError},
    models::{extension_for_mime, NewOutfit, NewToken, Outfit, Token},
};

const OUTFITS_TABLE: &str = "outfits";
const TOKENS_TABLE: &str = "tokens";

/// Backend over Supabase's PostgREST and storage HTTP APIs.
pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseBackend {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let base_url = config
            .url
            .ok_or_else(|| ServiceError::Config("Supabase URL is required".into()))?;

        let anon_key = config
            .anon_key
            .ok_or_else(|| ServiceError::Config("Supabase anon key is required".into()))?;

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            bucket: config.bucket,
        })
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn build_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        let bearer: header::HeaderValue = format!("Bearer {}", self.anon_key)
            .parse()
            .map_err(|_| ServiceError::Config("Supabase key is not a valid header value".into()))?;
        let apikey: header::HeaderValue = self
            .anon_key
            .parse()
            .map_err(|_| ServiceError::Config("Supabase key is not a valid header value".into()))?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert("apikey", apikey);
        Ok(headers)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    async fn check(response: Response, what: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        log::warn!("Supabase {} failed with {}: {}", what, status, error_text);
        Err(ServiceError::Response(format!(
            "{} failed ({}): {}",
            what, status, error_text
        )))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Response(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.table_url(table))
            .headers(self.build_headers()?)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| ServiceError::Request(format!("Supabase request failed: {}", e)))?;

        let response = Self::check(response, &format!("insert into {}", table)).await?;
        let mut rows: Vec<T> = Self::parse(response).await?;
        if rows.is_empty() {
            return Err(ServiceError::Response(format!(
                "insert into {} returned no rows",
                table
            )));
        }
        Ok(rows.swap_remove(0))
    }

    async fn select_for_user<T: DeserializeOwned>(
        &self,
        table: &str,
        user_id: &str,
        order_column: &str,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .headers(self.build_headers()?)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", format!("{}.desc", order_column)),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::Request(format!("Supabase request failed: {}", e)))?;

        let response = Self::check(response, &format!("select from {}", table)).await?;
        Self::parse(response).await
    }
}

#[async_trait]
impl BackendClient for SupabaseBackend {
    async fn upload_image(&self, image: &[u8], mime_type: &str, user_id: &str) -> Result<String> {
        let path = format!(
            "{}/{}.{}",
            user_id,
            Uuid::new_v4(),
            extension_for_mime(mime_type)
        );

        log::info!("Uploading {} KB try-on image to {}", image.len() / 1024, path);

        let response = self
            .client
            .post(self.object_url(&path))
            .headers(self.build_headers()?)
            .header(header::CONTENT_TYPE, mime_type)
            .header("x-upsert", "false")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| ServiceError::Request(format!("Supabase upload failed: {}", e)))?;

        Self::check(response, "image upload").await?;
        Ok(self.public_url(&path))
    }

    async fn save_outfit_record(&self, outfit: NewOutfit) -> Result<Outfit> {
        self.insert(OUTFITS_TABLE, &outfit).await
    }

    async fn list_outfits(&self, user_id: &str) -> Result<Vec<Outfit>> {
        self.select_for_user(OUTFITS_TABLE, user_id, "created_at").await
    }

    async fn delete_outfit(&self, id: Uuid) -> Result<()> {
        let response = self
            .client
            .delete(self.table_url(OUTFITS_TABLE))
            .headers(self.build_headers()?)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| ServiceError::Request(format!("Supabase request failed: {}", e)))?;

        let response = Self::check(response, "delete outfit").await?;
        let deleted: Vec<serde_json::Value> = Self::parse(response).await?;
        if deleted.is_empty() {
            return Err(ServiceError::NotFound(format!("outfit {}", id)));
        }
        Ok(())
    }

    async fn list_tokens(&self, user_id: &str) -> Result<Vec<Token>> {
        self.select_for_user(TOKENS_TABLE, user_id, "earned_date").await
    }

    async fn add_token(&self, token: NewToken) -> Result<Token> {
        self.insert(TOKENS_TABLE, &token).await
    }
}
