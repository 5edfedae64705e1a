//! # HTTP Gateway
//!
//! `reqwest`-backed implementation of [`ProductApi`] for the Spring-style
//! product endpoints:
//!
//! | Operation | Request | Success |
//! |-----------|---------|---------|
//! | list      | `GET {base}?page&size&sort` or `GET {base}/search?...&q` | 200 + page JSON |
//! | create    | `POST {base}` with `{name, price}` | 201 + `Location` |
//! | update    | `PUT {base}/{id}` with `{name, price}` | 200 / 204 |
//! | delete    | `DELETE {base}/{id}` | 204 |
//!
//! A 400 on create or update carries a JSON object of field messages and is
//! decoded into [`GatewayError::Validation`].

use super::{Created, GatewayError, ProductApi};
use crate::model::{FieldErrors, PageResult, ProductDraft, ProductId, QueryParameters};
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::{debug, instrument, warn};

/// Gateway talking to a live backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL for a listing request, routed to `/search` only when there is text.
    pub fn list_url(&self, params: &QueryParameters) -> Url {
        let mut url = if params.is_search() {
            self.child("search")
        } else {
            self.base.clone()
        };
        url.query_pairs_mut()
            .clear()
            .extend_pairs(params.query_pairs());
        url
    }

    fn item_url(&self, id: &ProductId) -> Url {
        self.child(id.as_str())
    }

    fn child(&self, segment: &str) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        // Bases are validated at configuration time; a non-hierarchical URL
        // simply keeps its path.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }
}

#[async_trait]
impl ProductApi for HttpGateway {
    #[instrument(skip(self), fields(page = params.page, search = params.is_search()))]
    async fn list_products(&self, params: &QueryParameters) -> Result<PageResult, GatewayError> {
        let url = self.list_url(params);
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "List request failed");
            return Err(GatewayError::http_status(status.as_u16()));
        }
        response
            .json::<PageResult>()
            .await
            .map_err(GatewayError::network)
    }

    #[instrument(skip(self))]
    async fn create_product(&self, draft: &ProductDraft) -> Result<Created, GatewayError> {
        debug!(url = %self.base, "POST");
        let response = self
            .client
            .post(self.base.clone())
            .json(draft)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let response = check_mutation(response).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        debug!(?location, "Created");
        Ok(Created { location })
    }

    #[instrument(skip(self))]
    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<(), GatewayError> {
        let url = self.item_url(id);
        debug!(%url, "PUT");
        let response = self
            .client
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(GatewayError::network)?;

        check_mutation(response).await.map(drop)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError> {
        let url = self.item_url(id);
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(GatewayError::network)?;

        check_status(response).await.map(drop)
    }
}

/// Maps a create/update response onto the error taxonomy.
async fn check_mutation(response: Response) -> Result<Response, GatewayError> {
    if response.status() == StatusCode::BAD_REQUEST {
        // An undecodable body still counts as a validation failure.
        let errors = response.json::<FieldErrors>().await.unwrap_or_default();
        warn!(fields = ?errors.keys().collect::<Vec<_>>(), "Validation failed");
        return Err(GatewayError::Validation(errors));
    }
    check_status(response).await
}

async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        body
    };
    warn!(status = status.as_u16(), %message, "Request failed");
    Err(GatewayError::Request {
        status: status.as_u16(),
        message,
    })
}

/// Extracts the identifier from a `Location` pointer such as
/// `http://host/api/products/42` or `/api/products/42`.
///
/// Returns `None` for a missing or trailing-slash segment.
pub fn parse_id_from_location(location: &str) -> Option<ProductId> {
    let path = match Url::parse(location) {
        Ok(url) => url.path().to_owned(),
        Err(_) => location
            .split(['?', '#'])
            .next()
            .unwrap_or(location)
            .to_owned(),
    };
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(ProductId::new)
}
