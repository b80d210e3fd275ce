//! Stateless HTTP request builder and response parser for the thesis API.
//!
//! # Design
//! `ThesisApi` holds only the immutable connection settings and carries no
//! mutable state between calls. Every call is split into a `build*` step
//! that produces an `HttpRequest` and a `parse` step that consumes an
//! `HttpResponse`. The caller (the async transport in `thesis-client`)
//! executes the round-trip in between, so header layering, timeouts and
//! error classification stay deterministic and testable without a network.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ClientConfig, UPLOAD_TIMEOUT};
use crate::error::ApiError;
use crate::http::{
    merge_headers, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody,
    RequestOptions,
};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Builds request descriptors and parses responses for one service root.
#[derive(Debug, Clone)]
pub struct ThesisApi {
    base_url: String,
    default_headers: Vec<(String, String)>,
    timeout: Duration,
}

impl ThesisApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.normalized_base_url().to_string(),
            default_headers: config.headers.clone(),
            timeout: config.effective_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with an optional JSON body.
    pub fn build<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(|b| serde_json::to_string(b).map_err(ApiError::serialization))
            .transpose()?;

        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }
        merge_headers(&mut headers, &self.default_headers);
        merge_headers(&mut headers, &options.headers);

        Ok(HttpRequest {
            method,
            path: self.url(path),
            query: options.query,
            headers,
            body: body.map(RequestBody::Json),
            timeout: options.timeout.unwrap_or(self.timeout),
        })
    }

    /// Build a multipart POST. The multipart content type overrides any
    /// configured default; per-call headers and timeout override both.
    pub fn build_upload(&self, path: &str, form: MultipartForm, options: RequestOptions) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        merge_headers(
            &mut headers,
            &[("content-type".to_string(), MULTIPART_CONTENT_TYPE.to_string())],
        );
        merge_headers(&mut headers, &options.headers);

        HttpRequest {
            method: HttpMethod::Post,
            path: self.url(path),
            query: options.query,
            headers,
            body: Some(RequestBody::Multipart(form)),
            timeout: options.timeout.unwrap_or(UPLOAD_TIMEOUT),
        }
    }

    /// Decode a 2xx body as `T`, or classify the failure.
    ///
    /// An empty 2xx body decodes as JSON `null`.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(ApiError::from_response(&response));
        }
        let decoded = if response.body.trim().is_empty() {
            T::deserialize(Value::Null)
        } else {
            serde_json::from_str(&response.body)
        };
        decoded.map_err(|e| ApiError::decode(&response, e))
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}
