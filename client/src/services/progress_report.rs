use serde::de::IgnoredAny;
use thesis_core::{
    ApiError, ProgressReportDetails, ProgressReportRecordPatchRequest,
    ProgressReportsGetResponse, ProgressReportsPostRequest, RequestOptions,
};

use crate::transport::HttpClient;

#[derive(Debug, Clone)]
pub struct ProgressReportService {
    http: HttpClient,
}

impl ProgressReportService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<ProgressReportsGetResponse, ApiError> {
        self.http.get("/progress_reports", RequestOptions::new()).await
    }

    pub async fn create(&self, request: &ProgressReportsPostRequest) -> Result<(), ApiError> {
        self.http
            .post::<IgnoredAny, _>("/progress_reports", Some(request), RequestOptions::new())
            .await?;
        Ok(())
    }

    pub async fn update(
        &self,
        report_id: i64,
        request: &ProgressReportRecordPatchRequest,
    ) -> Result<ProgressReportDetails, ApiError> {
        self.http
            .patch(
                &format!("/progress_reports/{report_id}"),
                Some(request),
                RequestOptions::new(),
            )
            .await
    }
}
