//! `reqwest` client for a remote content API.
//!
//! Routes used:
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | GET | `/api/content/{ref}` | fetch content |
//! | POST | `/api/content?action=&access=` | create content |
//! | PUT | `/api/content/{id}?action=&access=` | store a new version |
//! | DELETE | `/api/content/{ref}?force=` | delete content |
//! | GET | `/api/content/{ref}/children` | list children |
//! | GET | `/api/health` | reachability |

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ContentApiConfig;
use crate::error::{ContentError, ContentResult};
use crate::models::{AccessLevel, ContentReference, ProductPage, SaveAction};
use crate::repository::ContentRepository;

#[derive(Clone, Debug)]
pub struct HttpContentClient {
    client: Client,
    base_url: String,
}

impl HttpContentClient {
    pub fn new(config: &ContentApiConfig) -> ContentResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| ContentError::Transport(format!("Invalid API key header: {}", e)))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Map a non-success response onto the error taxonomy
    async fn check(
        response: Response,
        reference: ContentReference,
        op: &'static str,
    ) -> ContentResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, %reference, op, body = %body, "Content API returned an error");
        Err(match status {
            StatusCode::NOT_FOUND => ContentError::NotFound(reference),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                ContentError::AccessDenied(reference)
            }
            StatusCode::NOT_IMPLEMENTED => ContentError::Unsupported(op),
            StatusCode::BAD_REQUEST => ContentError::InvalidReference(reference.to_string()),
            _ => ContentError::Backend(format!("{} returned {}: {}", op, status, body)),
        })
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        reference: ContentReference,
        op: &'static str,
    ) -> ContentResult<T> {
        Ok(Self::check(response, reference, op).await?.json::<T>().await?)
    }
}

#[async_trait]
impl ContentRepository for HttpContentClient {
    #[instrument(skip(self), fields(content = %reference))]
    async fn get(&self, reference: ContentReference) -> ContentResult<ProductPage> {
        if reference.is_empty() {
            return Err(ContentError::InvalidReference(reference.to_string()));
        }
        let response = self
            .client
            .get(self.url(&format!("content/{}", reference)))
            .send()
            .await?;
        Self::read_json(response, reference, "get").await
    }

    #[instrument(skip(self, page), fields(content = %page.content_link))]
    async fn save(
        &self,
        page: ProductPage,
        action: SaveAction,
        access: AccessLevel,
    ) -> ContentResult<ContentReference> {
        let reference = page.content_link;
        let query = [("action", action.to_string()), ("access", access.to_string())];
        let request = if page.is_new() {
            self.client.post(self.url("content"))
        } else {
            self.client.put(self.url(&format!("content/{}", reference.id)))
        };

        let response = request.query(&query).json(&page).send().await?;
        Self::read_json(response, reference, "save").await
    }

    #[instrument(skip(self), fields(content = %reference))]
    async fn delete(&self, reference: ContentReference, force_delete: bool) -> ContentResult<()> {
        if reference.is_empty() {
            return Err(ContentError::InvalidReference(reference.to_string()));
        }
        let response = self
            .client
            .delete(self.url(&format!("content/{}", reference)))
            .query(&[("force", force_delete)])
            .send()
            .await?;
        Self::check(response, reference, "delete").await?;
        Ok(())
    }

    fn supports_children(&self) -> bool {
        true
    }

    #[instrument(skip(self), fields(parent = %parent))]
    async fn children(&self, parent: ContentReference) -> ContentResult<Vec<ProductPage>> {
        let response = self
            .client
            .get(self.url(&format!("content/{}/children", parent)))
            .send()
            .await?;
        Self::read_json(response, parent, "children").await
    }

    async fn ping(&self) -> ContentResult<()> {
        let response = self.client.get(self.url("health")).send().await?;
        Self::check(response, ContentReference::EMPTY, "ping").await?;
        Ok(())
    }
}
