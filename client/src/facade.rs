use thesis_core::{ApiError, ClientConfig, PingResponse, RequestOptions};

use crate::services::{
    AssignmentService, AuthService, FinalDefenseService, ProgressReportService, TopicService,
};
use crate::transport::HttpClient;

/// Entry point: one transport shared by every resource service.
///
/// The session cookie lives in the transport, so one `ThesisClient` is one
/// logged-in user. Clones share that session.
#[derive(Debug, Clone)]
pub struct ThesisClient {
    http: HttpClient,
    auth: AuthService,
    topics: TopicService,
    assignments: AssignmentService,
    progress_reports: ProgressReportService,
    final_defenses: FinalDefenseService,
}

impl ThesisClient {
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = HttpClient::new(config)?;
        tracing::debug!(base_url = http.api().base_url(), "thesis client ready");

        Ok(Self {
            auth: AuthService::new(http.clone()),
            topics: TopicService::new(http.clone()),
            assignments: AssignmentService::new(http.clone()),
            progress_reports: ProgressReportService::new(http.clone()),
            final_defenses: FinalDefenseService::new(http.clone()),
            http,
        })
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn topics(&self) -> &TopicService {
        &self.topics
    }

    pub fn assignments(&self) -> &AssignmentService {
        &self.assignments
    }

    pub fn progress_reports(&self) -> &ProgressReportService {
        &self.progress_reports
    }

    pub fn final_defenses(&self) -> &FinalDefenseService {
        &self.final_defenses
    }

    /// Raw transport, for endpoints without a dedicated service method.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Liveness check.
    pub async fn ping(&self) -> Result<PingResponse, ApiError> {
        self.http.get("/ping", RequestOptions::new()).await
    }
}

/// Client with default timeout and no extra headers.
pub fn create_client(base_url: impl Into<String>) -> Result<ThesisClient, ApiError> {
    ThesisClient::new(&ClientConfig::new(base_url))
}
