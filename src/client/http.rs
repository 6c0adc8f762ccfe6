//! REST client for a remote gateway.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::{require_id, EntityApi};
use crate::config::Config;
use crate::errors::{AppError, ErrorResponse};
use crate::models::{Employee, Entity};

pub type HttpEmployeeApi = HttpEntityApi<Employee>;

/// [`EntityApi`] backed by `GET/POST/PUT/PATCH/DELETE /api/<resource>`.
pub struct HttpEntityApi<E> {
    client: Client,
    base_url: Url,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for HttpEntityApi<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> HttpEntityApi<E> {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid base URL {:?}: {}", base_url, e)))?;
        Ok(Self {
            client,
            base_url,
            _entity: PhantomData,
        })
    }

    /// Client for the configured remote gateway, if one is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, AppError> {
        config.api_base_url.as_deref().map(Self::new).transpose()
    }

    /// `<base>/api/<resource>[/<segment>...]`, each segment percent-encoded.
    fn url(&self, extra: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .push(E::RESOURCE)
            .extend(extra);
        Ok(url)
    }
}

/// Decode a successful body, or turn the problem body into an [`AppError`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(read_problem(response).await)
}

async fn read_problem(response: Response) -> AppError {
    let status = response.status();
    let problem = response.json::<ErrorResponse>().await.ok();
    AppError::from_problem(status, problem)
}

#[async_trait]
impl<E: Entity> EntityApi<E> for HttpEntityApi<E> {
    async fn fetch_collection(&self) -> Result<Vec<E>, AppError> {
        let url = self.url(&[])?;
        tracing::debug!(%url, "Fetching {} collection", E::ENTITY_NAME);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<E, AppError> {
        let url = self.url(&[id])?;
        tracing::debug!(%url, "Fetching {}", E::ENTITY_NAME);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn create(&self, entity: &E) -> Result<E, AppError> {
        let response = self.client.post(self.url(&[])?).json(entity).send().await?;
        read_json(response).await
    }

    async fn update(&self, entity: &E) -> Result<E, AppError> {
        let id = require_id(entity)?.to_string();
        let response = self
            .client
            .put(self.url(&[id.as_str()])?)
            .json(entity)
            .send()
            .await?;
        read_json(response).await
    }

    async fn partial_update(&self, entity: &E) -> Result<E, AppError> {
        let id = require_id(entity)?.to_string();
        let response = self
            .client
            .patch(self.url(&[id.as_str()])?)
            .header(reqwest::header::CONTENT_TYPE, "application/merge-patch+json")
            .body(serde_json::to_vec(entity)?)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let id = id.to_string();
        let response = self
            .client
            .delete(self.url(&[id.as_str()])?)
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(read_problem(response).await)
    }
}
