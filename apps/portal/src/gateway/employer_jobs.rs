use async_trait::async_trait;
use reqwest::Method;

use super::{Gateway, GatewayError};
use crate::models::auth::ApiMessage;
use crate::models::job::{EmployerJobsQuery, JobId, JobPage, JobPayload};
use crate::models::skill::{NamePayload, Skill};

/// Employer job management endpoints.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list_employer_jobs(&self, query: &EmployerJobsQuery) -> Result<JobPage, GatewayError>;
    async fn create_job(&self, payload: &JobPayload) -> Result<ApiMessage, GatewayError>;
    async fn update_job(&self, id: JobId, payload: &JobPayload) -> Result<ApiMessage, GatewayError>;
    async fn delete_job(&self, id: JobId) -> Result<ApiMessage, GatewayError>;
}

/// Skill lookup and inline creation, used by the skill selector.
#[async_trait]
pub trait SkillCatalog: Send + Sync {
    async fn available_skills(&self) -> Result<Vec<Skill>, GatewayError>;

    /// Returns the existing skill with this name, or creates it.
    async fn create_or_get_skill(&self, name: &str) -> Result<Skill, GatewayError>;
}

impl Gateway {
    /// GET /employer/jobs?page&limit&sort&order
    pub async fn list_employer_jobs(&self, query: &EmployerJobsQuery) -> Result<JobPage, GatewayError> {
        let req = self.request(Method::GET, "/employer/jobs").query(query);
        self.execute(req).await
    }

    /// POST /employer/jobs
    pub async fn create_job(&self, payload: &JobPayload) -> Result<ApiMessage, GatewayError> {
        let req = self.request(Method::POST, "/employer/jobs").json(payload);
        self.execute(req).await
    }

    /// PUT /employer/jobs/{id}
    pub async fn update_job(&self, id: JobId, payload: &JobPayload) -> Result<ApiMessage, GatewayError> {
        let req = self
            .request(Method::PUT, &format!("/employer/jobs/{id}"))
            .json(payload);
        self.execute(req).await
    }

    /// DELETE /employer/jobs/{id}
    pub async fn delete_job(&self, id: JobId) -> Result<ApiMessage, GatewayError> {
        self.execute(self.request(Method::DELETE, &format!("/employer/jobs/{id}")))
            .await
    }

    /// GET /skills
    pub async fn available_skills(&self) -> Result<Vec<Skill>, GatewayError> {
        self.execute(self.request(Method::GET, "/skills")).await
    }

    /// POST /skills/create-or-get
    pub async fn create_or_get_skill(&self, name: &str) -> Result<Skill, GatewayError> {
        let req = self
            .request(Method::POST, "/skills/create-or-get")
            .json(&NamePayload { name });
        self.execute(req).await
    }
}

#[async_trait]
impl JobStore for Gateway {
    async fn list_employer_jobs(&self, query: &EmployerJobsQuery) -> Result<JobPage, GatewayError> {
        Gateway::list_employer_jobs(self, query).await
    }

    async fn create_job(&self, payload: &JobPayload) -> Result<ApiMessage, GatewayError> {
        Gateway::create_job(self, payload).await
    }

    async fn update_job(&self, id: JobId, payload: &JobPayload) -> Result<ApiMessage, GatewayError> {
        Gateway::update_job(self, id, payload).await
    }

    async fn delete_job(&self, id: JobId) -> Result<ApiMessage, GatewayError> {
        Gateway::delete_job(self, id).await
    }
}

#[async_trait]
impl SkillCatalog for Gateway {
    async fn available_skills(&self) -> Result<Vec<Skill>, GatewayError> {
        Gateway::available_skills(self).await
    }

    async fn create_or_get_skill(&self, name: &str) -> Result<Skill, GatewayError> {
        Gateway::create_or_get_skill(self, name).await
    }
}
