//! Async client for the thesis management API.
//!
//! # Overview
//! `thesis-core` describes requests and classifies responses; this crate
//! executes them with `reqwest`. [`ThesisClient`] bundles one service per
//! resource family over a single cookie-carrying transport.
//!
//! ```no_run
//! # async fn demo() -> Result<(), thesis_client::ApiError> {
//! use thesis_client::{create_client, LoginRequest, Pagination};
//!
//! let client = create_client("http://localhost:8080")?;
//! client
//!     .auth()
//!     .login(&LoginRequest { username: "s001".into(), password: "password".into() })
//!     .await?;
//! let page = client.topics().list(Pagination::new(1, 10)).await?;
//! println!("{} topics", page.total);
//! # Ok(())
//! # }
//! ```
//!
//! Every failure surfaces as [`ApiError`]; use
//! [`ApiError::user_message`] for a display string keyed by endpoint.

mod facade;
pub mod services;
pub mod transport;

pub use facade::{create_client, ThesisClient};
pub use transport::HttpClient;

pub use thesis_core::*;
