use serde::de::IgnoredAny;
use thesis_core::{
    ApiError, LoginRequest, RequestOptions, UserGetResponse, UserPatchRequest, UserPostRequest,
};

use crate::transport::HttpClient;

/// Session and user-account endpoints.
///
/// Login and logout are opaque: the server sets or clears the session
/// cookie, which the transport's cookie store carries from then on.
#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpClient,
}

impl AuthService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        self.http
            .post::<IgnoredAny, _>("/login", Some(request), RequestOptions::new())
            .await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.http
            .post::<IgnoredAny, ()>("/logout", None, RequestOptions::new())
            .await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<UserGetResponse, ApiError> {
        self.http.get("/user", RequestOptions::new()).await
    }

    pub async fn update_current_user(&self, request: &UserPatchRequest) -> Result<(), ApiError> {
        self.http
            .patch::<IgnoredAny, _>("/user", Some(request), RequestOptions::new())
            .await?;
        Ok(())
    }

    /// Admin only.
    pub async fn create_user(&self, request: &UserPostRequest) -> Result<UserGetResponse, ApiError> {
        self.http.post("/user", Some(request), RequestOptions::new()).await
    }
}
