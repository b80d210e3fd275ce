use std::fmt::Display;

use serde::de::IgnoredAny;
use thesis_core::{
    ApiError, AssignmentRecordPatchRequest, AssignmentsGetResponse, AssignmentsPostRequest,
    Pagination, RequestOptions,
};

use super::paged;
use crate::transport::HttpClient;

/// Students apply for topics; teachers approve or reject the applications.
#[derive(Debug, Clone)]
pub struct AssignmentService {
    http: HttpClient,
}

impl AssignmentService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, pagination: Pagination) -> Result<AssignmentsGetResponse, ApiError> {
        self.http.get("/assignments", paged(pagination)).await
    }

    pub async fn create(&self, request: &AssignmentsPostRequest) -> Result<(), ApiError> {
        self.http
            .post::<IgnoredAny, _>("/assignments", Some(request), RequestOptions::new())
            .await?;
        Ok(())
    }

    /// `student` is interpolated as-is, so either a numeric id or a login
    /// name works.
    pub async fn update_status(
        &self,
        student: impl Display,
        topic_id: i64,
        request: &AssignmentRecordPatchRequest,
    ) -> Result<(), ApiError> {
        self.http
            .patch::<IgnoredAny, _>(
                &format!("/assignments/{student}/{topic_id}"),
                Some(request),
                RequestOptions::new(),
            )
            .await?;
        Ok(())
    }
}
