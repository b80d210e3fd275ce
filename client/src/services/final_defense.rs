use serde::de::IgnoredAny;
use thesis_core::{
    ApiError, FinalDefenseBoardPatch, FinalDefenseDetails, FinalDefenseTeacherPatch,
    FinalDefensesGetResponse, FinalDefensesPostRequest, RequestOptions,
};

use crate::transport::HttpClient;

/// Final defense applications and verdicts.
#[derive(Debug, Clone)]
pub struct FinalDefenseService {
    http: HttpClient,
}

impl FinalDefenseService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<FinalDefensesGetResponse, ApiError> {
        self.http.get("/final_defenses", RequestOptions::new()).await
    }

    pub async fn create(&self, request: &FinalDefensesPostRequest) -> Result<(), ApiError> {
        self.http
            .post::<IgnoredAny, _>("/final_defenses", Some(request), RequestOptions::new())
            .await?;
        Ok(())
    }

    /// Supervisor approval of the application.
    pub async fn update_as_teacher(
        &self,
        defense_id: i64,
        request: &FinalDefenseTeacherPatch,
    ) -> Result<FinalDefenseDetails, ApiError> {
        self.http
            .patch(&format!("/final_defenses/{defense_id}"), Some(request), RequestOptions::new())
            .await
    }

    pub async fn update_as_defense_board(
        &self,
        defense_id: i64,
        request: &FinalDefenseBoardPatch,
    ) -> Result<FinalDefenseDetails, ApiError> {
        self.http
            .patch(&format!("/final_defenses/{defense_id}"), Some(request), RequestOptions::new())
            .await
    }
}
