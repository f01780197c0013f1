use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;

use super::{Gateway, GatewayError};
use crate::models::profile::{
    CandidateProfile, EmployerProfile, UpdateCandidateProfileRequest, UpdateEmployerProfileRequest,
    UploadCvResponse,
};

/// Multipart field name the backend reads the CV from.
const CV_FIELD: &str = "cv";

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_candidate_profile(&self, id: &str) -> Result<CandidateProfile, GatewayError>;
    async fn update_candidate_profile(
        &self,
        id: &str,
        update: &UpdateCandidateProfileRequest,
    ) -> Result<CandidateProfile, GatewayError>;
    async fn upload_candidate_cv(
        &self,
        id: &str,
        file_name: &str,
        content: Bytes,
    ) -> Result<UploadCvResponse, GatewayError>;
    async fn get_employer_profile(&self, id: &str) -> Result<EmployerProfile, GatewayError>;
    async fn update_employer_profile(
        &self,
        id: &str,
        update: &UpdateEmployerProfileRequest,
    ) -> Result<EmployerProfile, GatewayError>;
}

impl Gateway {
    /// GET /api/candidates/{id}
    pub async fn get_candidate_profile(&self, id: &str) -> Result<CandidateProfile, GatewayError> {
        self.execute(self.request(Method::GET, &format!("/api/candidates/{id}")))
            .await
    }

    /// PUT /api/candidates/{id}
    pub async fn update_candidate_profile(
        &self,
        id: &str,
        update: &UpdateCandidateProfileRequest,
    ) -> Result<CandidateProfile, GatewayError> {
        let req = self
            .request(Method::PUT, &format!("/api/candidates/{id}"))
            .json(update);
        self.execute(req).await
    }

    /// POST /api/candidates/{id}/upload-cv (multipart)
    pub async fn upload_candidate_cv(
        &self,
        id: &str,
        file_name: &str,
        content: Bytes,
    ) -> Result<UploadCvResponse, GatewayError> {
        let len = content.len() as u64;
        let part = Part::stream_with_length(content, len)
            .file_name(file_name.to_string())
            .mime_str(content_type(file_name))?;
        let form = Form::new().part(CV_FIELD, part);

        info!(file_name, len, "uploading CV");
        let req = self
            .request(Method::POST, &format!("/api/candidates/{id}/upload-cv"))
            .multipart(form);
        self.execute(req).await
    }

    /// GET /api/employers/{id}
    pub async fn get_employer_profile(&self, id: &str) -> Result<EmployerProfile, GatewayError> {
        self.execute(self.request(Method::GET, &format!("/api/employers/{id}")))
            .await
    }

    /// PUT /api/employers/{id}
    pub async fn update_employer_profile(
        &self,
        id: &str,
        update: &UpdateEmployerProfileRequest,
    ) -> Result<EmployerProfile, GatewayError> {
        let req = self
            .request(Method::PUT, &format!("/api/employers/{id}"))
            .json(update);
        self.execute(req).await
    }
}

fn content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ProfileStore for Gateway {
    async fn get_candidate_profile(&self, id: &str) -> Result<CandidateProfile, GatewayError> {
        Gateway::get_candidate_profile(self, id).await
    }

    async fn update_candidate_profile(
        &self,
        id: &str,
        update: &UpdateCandidateProfileRequest,
    ) -> Result<CandidateProfile, GatewayError> {
        Gateway::update_candidate_profile(self, id, update).await
    }

    async fn upload_candidate_cv(
        &self,
        id: &str,
        file_name: &str,
        content: Bytes,
    ) -> Result<UploadCvResponse, GatewayError> {
        Gateway::upload_candidate_cv(self, id, file_name, content).await
    }

    async fn get_employer_profile(&self, id: &str) -> Result<EmployerProfile, GatewayError> {
        Gateway::get_employer_profile(self, id).await
    }

    async fn update_employer_profile(
        &self,
        id: &str,
        update: &UpdateEmployerProfileRequest,
    ) -> Result<EmployerProfile, GatewayError> {
        Gateway::update_employer_profile(self, id, update).await
    }
}
