use std::path::Path;

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::FormError;
use crate::forms::lifecycle::{SubmitGate, Ticket};
use crate::forms::validation::{require, validate_email};
use crate::forms::Notice;
use crate::gateway::{GatewayError, ProfileStore};
use crate::models::profile::{CandidateFields, EmployerFields, ProfileFields, ProfileUpdate};
use crate::models::user::Role;

const UPDATE_FAILED: &str = "Failed to update profile. Please try again.";
const UPLOAD_FAILED: &str = "Failed to upload CV. Please try again.";

#[derive(Debug)]
pub struct ProfileSubmission {
    pub update: ProfileUpdate,
    ticket: Ticket,
}

/// Profile edit form for the signed-in user.
#[derive(Debug)]
pub struct ProfileForm {
    user_id: String,
    pub fields: ProfileFields,
    gate: SubmitGate,
}

impl ProfileForm {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            fields: ProfileFields::empty(role),
            gate: SubmitGate::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.fields.role()
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_busy()
    }

    /// Replaces the fields with the stored profile.
    pub async fn load(&mut self, store: &dyn ProfileStore) -> Result<(), FormError> {
        let loaded = match self.role() {
            Role::Candidate => store
                .get_candidate_profile(&self.user_id)
                .await
                .map(|p| ProfileFields::Candidate(CandidateFields::from(p))),
            Role::Employer => store
                .get_employer_profile(&self.user_id)
                .await
                .map(|p| ProfileFields::Employer(EmployerFields::from(p))),
        };

        if !self.gate.liveness().is_alive() {
            return Err(FormError::Unmounted);
        }
        match loaded {
            Ok(fields) => {
                self.fields = fields;
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "failed to load profile");
                Err(FormError::from_gateway(&e, "Failed to load profile"))
            }
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require(self.fields.full_name(), "Full name is required")?;
        if let ProfileFields::Employer(f) = &self.fields {
            require(&f.company_name, "Company name is required")?;
        }
        let email = self.fields.email().trim();
        if !email.is_empty() {
            validate_email(email)?;
        }
        Ok(())
    }

    pub fn begin_submit(&mut self) -> Result<ProfileSubmission, FormError> {
        self.validate()?;
        let ticket = self.gate.try_begin()?;
        Ok(ProfileSubmission {
            update: self.fields.to_update(),
            ticket,
        })
    }

    /// The edited values stay in place on success; the server's copy is not
    /// reloaded over them.
    pub fn complete(
        &mut self,
        submission: ProfileSubmission,
        result: Result<(), GatewayError>,
    ) -> Result<Notice, FormError> {
        self.gate.finish(submission.ticket)?;
        match result {
            Ok(()) => {
                info!(user_id = %self.user_id, role = %self.role(), "profile updated");
                Ok(Notice::success("Profile updated successfully!"))
            }
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "profile update failed");
                Err(FormError::from_gateway(&e, UPDATE_FAILED))
            }
        }
    }

    pub async fn submit(&mut self, store: &dyn ProfileStore) -> Result<Notice, FormError> {
        let submission = self.begin_submit()?;
        let result = match &submission.update {
            ProfileUpdate::Candidate(req) => store
                .update_candidate_profile(&self.user_id, req)
                .await
                .map(|_| ()),
            ProfileUpdate::Employer(req) => store
                .update_employer_profile(&self.user_id, req)
                .await
                .map(|_| ()),
        };
        self.complete(submission, result)
    }

    /// Uploads a CV and records the returned URL. Candidates only.
    pub async fn upload_cv(
        &mut self,
        store: &dyn ProfileStore,
        file_name: &str,
        content: Bytes,
    ) -> Result<Notice, FormError> {
        if self.role() != Role::Candidate {
            return Err(FormError::validation("Only candidates can upload a CV"));
        }
        if content.is_empty() {
            return Err(FormError::validation("Please choose a file to upload"));
        }

        let ticket = self.gate.try_begin()?;
        let result = store.upload_candidate_cv(&self.user_id, file_name, content).await;
        self.gate.finish(ticket)?;

        match result {
            Ok(uploaded) => {
                info!(user_id = %self.user_id, file_name, "CV uploaded");
                if let (ProfileFields::Candidate(f), Some(url)) = (&mut self.fields, uploaded.cv_url) {
                    f.cv_url = Some(url);
                }
                Ok(Notice::success("CV uploaded successfully!"))
            }
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "CV upload failed");
                Err(FormError::from_gateway(&e, UPLOAD_FAILED))
            }
        }
    }

    /// Reads `path` from disk and uploads it under its file name.
    pub async fn upload_cv_file(&mut self, store: &dyn ProfileStore, path: &Path) -> Result<Notice, FormError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cv")
            .to_string();
        let content = tokio::fs::read(path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "could not read CV file");
            FormError::validation(format!("Could not read {}", path.display()))
        })?;
        self.upload_cv(store, &file_name, Bytes::from(content)).await
    }

    pub fn unmount(&self) {
        self.gate.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::profile::{
        CandidateProfile, EmployerProfile, UpdateCandidateProfileRequest, UpdateEmployerProfileRequest,
        UploadCvResponse,
    };

    #[derive(Default)]
    struct FakeProfiles {
        updates: AtomicUsize,
        uploads: Mutex<Vec<(String, usize)>>,
        last_candidate_update: Mutex<Option<UpdateCandidateProfileRequest>>,
    }

    #[async_trait]
    impl ProfileStore for FakeProfiles {
        async fn get_candidate_profile(&self, _id: &str) -> Result<CandidateProfile, GatewayError> {
            Ok(CandidateProfile {
                full_name: "Jane Doe".to_string(),
                email: Some("jane@example.com".to_string()),
                headline: Some("Rust developer".to_string()),
                ..Default::default()
            })
        }

        async fn update_candidate_profile(
            &self,
            _id: &str,
            update: &UpdateCandidateProfileRequest,
        ) -> Result<CandidateProfile, GatewayError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            *self.last_candidate_update.lock().unwrap() = Some(update.clone());
            // The server echoes a stale copy; the form must not apply it.
            Ok(CandidateProfile {
                full_name: "Stale Name".to_string(),
                ..Default::default()
            })
        }

        async fn upload_candidate_cv(
            &self,
            _id: &str,
            file_name: &str,
            content: Bytes,
        ) -> Result<UploadCvResponse, GatewayError> {
            self.uploads
                .lock()
                .unwrap()
                .push((file_name.to_string(), content.len()));
            Ok(UploadCvResponse {
                message: None,
                cv_url: Some("https://cdn.example.com/cv.pdf".to_string()),
            })
        }

        async fn get_employer_profile(&self, _id: &str) -> Result<EmployerProfile, GatewayError> {
            Err(GatewayError::Api {
                status: 404,
                message: None,
            })
        }

        async fn update_employer_profile(
            &self,
            _id: &str,
            _update: &UpdateEmployerProfileRequest,
        ) -> Result<EmployerProfile, GatewayError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(EmployerProfile::default())
        }
    }

    #[tokio::test]
    async fn test_load_fills_candidate_fields() {
        let store = FakeProfiles::default();
        let mut form = ProfileForm::new("7", Role::Candidate);
        form.load(&store).await.unwrap();

        assert_eq!(form.fields.full_name(), "Jane Doe");
        match &form.fields {
            ProfileFields::Candidate(f) => assert_eq!(f.headline, "Rust developer"),
            other => panic!("unexpected fields {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_failure_keeps_empty_fields() {
        let store = FakeProfiles::default();
        let mut form = ProfileForm::new("7", Role::Employer);
        let err = form.load(&store).await.unwrap_err();
        assert_eq!(err, FormError::Server("Failed to load profile".to_string()));
        assert_eq!(form.fields, ProfileFields::empty(Role::Employer));
    }

    #[tokio::test]
    async fn test_employer_requires_company_name() {
        let store = FakeProfiles::default();
        let mut form = ProfileForm::new("3", Role::Employer);
        if let ProfileFields::Employer(f) = &mut form.fields {
            f.full_name = "Sam Boss".to_string();
        }

        let err = form.submit(&store).await.unwrap_err();
        assert_eq!(err.to_string(), "Company name is required");
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_optional_email_rejected() {
        let mut form = ProfileForm::new("7", Role::Candidate);
        if let ProfileFields::Candidate(f) = &mut form.fields {
            f.full_name = "Jane".to_string();
            f.email = "jane@".to_string();
        }
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Please enter a valid email address"
        );
    }

    #[tokio::test]
    async fn test_submit_keeps_edited_values() {
        let store = FakeProfiles::default();
        let mut form = ProfileForm::new("7", Role::Candidate);
        form.load(&store).await.unwrap();
        if let ProfileFields::Candidate(f) = &mut form.fields {
            f.full_name = "Jane Q. Doe".to_string();
            f.bio = "  ".to_string();
        }

        let notice = form.submit(&store).await.unwrap();
        assert_eq!(notice.message, "Profile updated successfully!");
        assert_eq!(form.fields.full_name(), "Jane Q. Doe");

        let sent = store.last_candidate_update.lock().unwrap().clone().unwrap();
        assert_eq!(sent.full_name.as_deref(), Some("Jane Q. Doe"));
        assert_eq!(sent.bio, None);
    }

    #[tokio::test]
    async fn test_upload_cv_file_records_url() {
        let store = FakeProfiles::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 fake").unwrap();

        let mut form = ProfileForm::new("7", Role::Candidate);
        let notice = form.upload_cv_file(&store, &path).await.unwrap();
        assert_eq!(notice.message, "CV uploaded successfully!");

        let uploads = store.uploads.lock().unwrap().clone();
        assert_eq!(uploads, vec![("resume.pdf".to_string(), 13)]);
        match &form.fields {
            ProfileFields::Candidate(f) => {
                assert_eq!(f.cv_url.as_deref(), Some("https://cdn.example.com/cv.pdf"))
            }
            other => panic!("unexpected fields {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_employer_cannot_upload_cv() {
        let store = FakeProfiles::default();
        let mut form = ProfileForm::new("3", Role::Employer);
        let err = form
            .upload_cv(&store, "cv.pdf", Bytes::from_static(b"data"))
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_cv_file_is_validation_error() {
        let store = FakeProfiles::default();
        let mut form = ProfileForm::new("7", Role::Candidate);
        let err = form
            .upload_cv_file(&store, Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));
    }
}
