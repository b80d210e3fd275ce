//! Async transport: executes core request descriptors over `reqwest`.
//!
//! # Design
//! `HttpClient` is the single chokepoint for network I/O. Each verb method
//! asks `ThesisApi` for an `HttpRequest`, runs it through the shared
//! `reqwest::Client`, converts the reply into an `HttpResponse` and hands it
//! back to `ThesisApi::parse`. A failure that produced no response becomes
//! `ApiError::network`, so callers never see a `reqwest::Error`.
//!
//! The cookie store is enabled so the session cookie set by `/login`
//! accompanies every later call.

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thesis_core::client::MULTIPART_CONTENT_TYPE;
use thesis_core::http::PartValue;
use thesis_core::{
    ApiError, ClientConfig, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody,
    RequestOptions, ThesisApi,
};
use tracing::{debug_span, Instrument};

/// Shared HTTP transport. Cloning is cheap and shares the connection pool
/// and cookie jar.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    api: ThesisApi,
}

impl HttpClient {
    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns the generic error kind if the underlying HTTP client cannot be
    /// constructed (e.g. the TLS backend fails to initialise).
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            api: ThesisApi::new(config),
        })
    }

    pub fn api(&self) -> &ThesisApi {
        &self.api
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = self.api.build::<()>(HttpMethod::Get, path, None, options)?;
        self.send(request).await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.api.build(HttpMethod::Post, path, body, options)?;
        self.send(request).await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.api.build(HttpMethod::Put, path, body, options)?;
        self.send(request).await
    }

    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.api.build(HttpMethod::Patch, path, body, options)?;
        self.send(request).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = self.api.build::<()>(HttpMethod::Delete, path, None, options)?;
        self.send(request).await
    }

    /// Multipart POST with the longer upload timeout.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = self.api.build_upload(path, form, options);
        self.send(request).await
    }

    /// Execute a prepared request and parse the reply.
    pub async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        let span = debug_span!(
            "thesis_request",
            method = request.method.as_str(),
            path = %request.path,
        );

        async move {
            let response = match self.execute(request).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!("request failed before a response arrived: {err}");
                    return Err(err);
                }
            };

            let status = response.status;
            let result = self.api.parse(response);
            match &result {
                Ok(_) => tracing::debug!(status, "request succeeded"),
                Err(err) => tracing::warn!(status, kind = ?err.kind(), "request failed: {err}"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            query,
            headers,
            body,
            timeout,
        } = request;

        let mut builder = self.inner.request(to_method(method), &path).timeout(timeout);
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        let multipart = matches!(body, Some(RequestBody::Multipart(_)));
        builder = match body {
            Some(RequestBody::Json(text)) => builder.body(text),
            Some(RequestBody::Multipart(form)) => builder.multipart(to_form(form)?),
            None => builder,
        };

        let mut http_request = builder.build().map_err(network)?;
        for (name, value) in &headers {
            // reqwest already set `multipart/form-data; boundary=...`.
            if multipart
                && name.eq_ignore_ascii_case(CONTENT_TYPE.as_str())
                && value == MULTIPART_CONTENT_TYPE
            {
                continue;
            }
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::network(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::network(format!("invalid value for header {name}: {e}")))?;
            http_request.headers_mut().insert(name, value);
        }

        let response = self.inner.execute(http_request).await.map_err(network)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(network)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn network(err: reqwest::Error) -> ApiError {
    ApiError::network(err.to_string())
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn to_form(form: MultipartForm) -> Result<Form, ApiError> {
    let mut out = Form::new();
    for part in form.parts {
        out = match part.value {
            PartValue::Text(text) => out.text(part.name, text),
            PartValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let file = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&content_type)
                    .map_err(network)?;
                out.part(part.name, file)
            }
        };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_one_to_one() {
        assert_eq!(to_method(HttpMethod::Get), Method::GET);
        assert_eq!(to_method(HttpMethod::Patch), Method::PATCH);
        assert_eq!(to_method(HttpMethod::Delete), Method::DELETE);
    }

    #[test]
    fn invalid_mime_is_a_generic_error() {
        let form = MultipartForm::new().file("file", "a.bin", "not a mime", vec![0]);
        let err = to_form(form).unwrap_err();
        assert_eq!(err.kind(), thesis_core::ErrorKind::Api);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn client_builds_with_default_config() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(client.api().base_url(), "http://localhost:8080");
    }
}
