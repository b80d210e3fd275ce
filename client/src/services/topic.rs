use serde::Serialize;
use thesis_core::{
    ApiError, Pagination, RequestOptions, TopicAdminPatch, TopicCreateResponse, TopicDetails,
    TopicOfficePatch, TopicTeacherPatch, TopicsGetResponse, TopicsPostRequest,
};

use super::paged;
use crate::transport::HttpClient;

/// Thesis topic listing, search and maintenance.
///
/// The three `update_as_*` methods hit the same endpoint; they differ only
/// in which fields the caller's role is allowed to send.
#[derive(Debug, Clone)]
pub struct TopicService {
    http: HttpClient,
}

impl TopicService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, pagination: Pagination) -> Result<TopicsGetResponse, ApiError> {
        self.http.get("/topics", paged(pagination)).await
    }

    /// Keyword search. A `None` keyword is omitted from the query.
    pub async fn search(
        &self,
        keyword: Option<&str>,
        pagination: Pagination,
    ) -> Result<TopicsGetResponse, ApiError> {
        let mut options = RequestOptions::new().query_opt("keyword", keyword);
        options.query.extend(pagination.to_query());
        self.http.get("/topics/search", options).await
    }

    pub async fn get(&self, topic_id: i64) -> Result<TopicDetails, ApiError> {
        self.http
            .get(&format!("/topics/{topic_id}"), RequestOptions::new())
            .await
    }

    pub async fn create(&self, request: &TopicsPostRequest) -> Result<TopicCreateResponse, ApiError> {
        self.http.post("/topics", Some(request), RequestOptions::new()).await
    }

    pub async fn update_as_teacher(
        &self,
        topic_id: i64,
        patch: &TopicTeacherPatch,
    ) -> Result<TopicDetails, ApiError> {
        self.update(topic_id, patch).await
    }

    pub async fn update_as_office(
        &self,
        topic_id: i64,
        patch: &TopicOfficePatch,
    ) -> Result<TopicDetails, ApiError> {
        self.update(topic_id, patch).await
    }

    pub async fn update_as_admin(
        &self,
        topic_id: i64,
        patch: &TopicAdminPatch,
    ) -> Result<TopicDetails, ApiError> {
        self.update(topic_id, patch).await
    }

    async fn update<B: Serialize>(&self, topic_id: i64, patch: &B) -> Result<TopicDetails, ApiError> {
        self.http
            .patch(&format!("/topics/{topic_id}"), Some(patch), RequestOptions::new())
            .await
    }
}
