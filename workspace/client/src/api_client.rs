pub mod alert;
pub mod budget;
pub mod category;
pub mod finance_ai;
pub mod money_note;

use common::ApiResponse;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, trace, warn};

use crate::error::{ApiError, ErrorBody, Result};
use crate::settings::ClientSettings;

const JSON_MIME: &str = "application/json";

/// What goes in the request body.
enum Payload {
    Empty,
    Json(Value),
    /// Sent without the default JSON headers so the client can set the boundary.
    Multipart(Form),
}

/// Thin async facade over the backend REST API.
///
/// One attempt per call: no retry, no backoff, no queuing. Every failure comes
/// back as an [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl ApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));
        headers
    }

    fn build(&self, method: Method, url: &str, query: &[(&str, String)], payload: Payload) -> RequestBuilder {
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }

        match payload {
            Payload::Empty => request.headers(Self::default_headers()),
            Payload::Json(body) => request.headers(Self::default_headers()).json(&body),
            Payload::Multipart(form) => request.multipart(form),
        }
    }

    /// Sends one request and returns the JSON body, or `None` when the
    /// response is not JSON or has no body.
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        payload: Payload,
    ) -> Result<Option<Value>> {
        let url = self.settings.api_url(endpoint);
        debug!("{} request to: {}", method, url);

        let response = self
            .build(method.clone(), &url, query, payload)
            .send()
            .await
            .map_err(|e| {
                let api_error = ApiError::from(e);
                error!("{} {} - Request failed: {:?}", method, endpoint, api_error);
                api_error
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} {} - Non-OK response: {}", method, endpoint, status);
            let text = response.text().await.unwrap_or_default();
            let api_error = ApiError::Server {
                status: status.as_u16(),
                body: ErrorBody::parse(&text),
            };
            error!("{} {} - API error: {}", method, endpoint, api_error);
            return Err(api_error);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains(JSON_MIME));
        if !is_json {
            info!("{} {} - Success (no JSON body)", method, endpoint);
            return Ok(None);
        }

        trace!("{} {} - Response received, parsing JSON", method, endpoint);
        let text = response.text().await?;
        if text.trim().is_empty() {
            info!("{} {} - Success (empty body)", method, endpoint);
            return Ok(None);
        }

        let value = serde_json::from_str(&text).map_err(|e| {
            error!("{} {} - Failed to parse response: {}", method, endpoint, e);
            ApiError::Decode(e.to_string())
        })?;

        info!("{} {} - Success", method, endpoint);
        Ok(Some(value))
    }

    /// Unwraps the `{ success, data }` envelope.
    fn decode_data<T: DeserializeOwned>(body: Option<Value>) -> Result<T> {
        let value = body.ok_or_else(|| ApiError::Decode("expected a JSON body".to_string()))?;
        let response: ApiResponse<T> =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(response.data)
    }

    fn encode<B: Serialize>(body: &B) -> Result<Payload> {
        serde_json::to_value(body)
            .map(Payload::Json)
            .map_err(|e| ApiError::Request(format!("Failed to serialize request: {}", e)))
    }

    pub(crate) async fn get<T>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.send(Method::GET, endpoint, query, Payload::Empty).await?;
        Self::decode_data(body)
    }

    pub(crate) async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Option<Value>> {
        let payload = Self::encode(body)?;
        self.send(Method::POST, endpoint, &[], payload).await
    }

    pub(crate) async fn put<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Option<Value>> {
        let payload = Self::encode(body)?;
        self.send(Method::PUT, endpoint, &[], payload).await
    }

    pub(crate) async fn delete(&self, endpoint: &str) -> Result<Option<Value>> {
        self.send(Method::DELETE, endpoint, &[], Payload::Empty).await
    }

    pub(crate) async fn post_multipart(&self, endpoint: &str, form: Form) -> Result<Option<Value>> {
        self.send(Method::POST, endpoint, &[], Payload::Multipart(form)).await
    }
}
