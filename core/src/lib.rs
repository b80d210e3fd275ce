//! I/O-free core of the thesis management API client.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The async transport in
//! `thesis-client` executes the round-trip, which keeps everything here
//! deterministic and testable.
//!
//! # Design
//! - `ThesisApi` is stateless; it holds only the immutable configuration.
//! - Every failure is classified once, in `ThesisApi::parse` or
//!   `ApiError::network`, into one of the five `ApiError` kinds.
//! - `messages::error_message` turns an endpoint identifier and status code
//!   into a user-facing string, independent of the error kind.
//! - DTOs are defined independently from the mock-server crate; end-to-end
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod labels;
pub mod messages;
pub mod types;

pub use client::ThesisApi;
pub use config::{ClientConfig, DEFAULT_TIMEOUT, UPLOAD_TIMEOUT};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, RequestOptions};
pub use messages::error_message;
pub use types::*;
