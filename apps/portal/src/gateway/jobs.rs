use async_trait::async_trait;
use reqwest::Method;

use super::{Gateway, GatewayError};
use crate::models::auth::ApiMessage;
use crate::models::job::{Job, JobId, JobPage, JobSearchParams};

/// Public job board endpoints.
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    async fn search_jobs(&self, params: &JobSearchParams) -> Result<JobPage, GatewayError>;
    async fn get_job(&self, id: JobId) -> Result<Job, GatewayError>;
    async fn save_job(&self, id: JobId) -> Result<ApiMessage, GatewayError>;
    async fn unsave_job(&self, id: JobId) -> Result<ApiMessage, GatewayError>;
}

impl Gateway {
    /// GET /jobs?search&location&salary_min&skill&page&limit
    pub async fn search_jobs(&self, params: &JobSearchParams) -> Result<JobPage, GatewayError> {
        let req = self.request(Method::GET, "/jobs").query(&params.to_query());
        self.execute(req).await
    }

    /// GET /jobs/{id}
    pub async fn get_job(&self, id: JobId) -> Result<Job, GatewayError> {
        self.execute(self.request(Method::GET, &format!("/jobs/{id}")))
            .await
    }

    /// POST /jobs/{id}/save
    pub async fn save_job(&self, id: JobId) -> Result<ApiMessage, GatewayError> {
        self.execute(self.request(Method::POST, &format!("/jobs/{id}/save")))
            .await
    }

    /// DELETE /jobs/{id}/save
    pub async fn unsave_job(&self, id: JobId) -> Result<ApiMessage, GatewayError> {
        self.execute(self.request(Method::DELETE, &format!("/jobs/{id}/save")))
            .await
    }
}

#[async_trait]
impl JobBoardApi for Gateway {
    async fn search_jobs(&self, params: &JobSearchParams) -> Result<JobPage, GatewayError> {
        Gateway::search_jobs(self, params).await
    }

    async fn get_job(&self, id: JobId) -> Result<Job, GatewayError> {
        Gateway::get_job(self, id).await
    }

    async fn save_job(&self, id: JobId) -> Result<ApiMessage, GatewayError> {
        Gateway::save_job(self, id).await
    }

    async fn unsave_job(&self, id: JobId) -> Result<ApiMessage, GatewayError> {
        Gateway::unsave_job(self, id).await
    }
}
