use tracing::{info, warn};

use crate::errors::FormError;
use crate::forms::lifecycle::{SubmitGate, Ticket};
use crate::forms::validation::{lines_to_list, require};
use crate::forms::Notice;
use crate::gateway::{GatewayError, JobStore, SkillCatalog};
use crate::models::auth::ApiMessage;
use crate::models::job::{Job, JobId, JobPayload};
use crate::models::profile::non_blank;
use crate::models::skill::Skill;
use crate::selector::SkillSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFormMode {
    Create,
    Edit(JobId),
}

impl JobFormMode {
    fn success_message(&self) -> &'static str {
        match self {
            JobFormMode::Create => "Job posted successfully",
            JobFormMode::Edit(_) => "Job updated successfully",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            JobFormMode::Create => "Failed to post job",
            JobFormMode::Edit(_) => "Failed to update job",
        }
    }
}

/// Text inputs of the job form. Skills live in the embedded selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub salary_range: String,
    pub emp_type: String,
    pub responsibilities: Vec<String>,
}

impl JobDraft {
    pub fn from_job(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
            company: job.company.clone().unwrap_or_default(),
            location: job.location.clone(),
            salary_range: job.salary_range.clone().unwrap_or_default(),
            emp_type: job.emp_type.clone().unwrap_or_default(),
            responsibilities: job.responsibilities.clone(),
        }
    }

    /// Responsibilities are edited as one line each.
    pub fn set_responsibilities_text(&mut self, text: &str) {
        self.responsibilities = lines_to_list(text);
    }

    pub fn responsibilities_text(&self) -> String {
        self.responsibilities.join("\n")
    }

    /// Title, description, location, in that order.
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.title, "Job title is required")?;
        require(&self.description, "Job description is required")?;
        require(&self.location, "Job location is required")?;
        Ok(())
    }
}

/// An admitted job submission. Hand it back to `JobForm::complete`.
#[derive(Debug)]
pub struct JobSubmission {
    pub mode: JobFormMode,
    pub payload: JobPayload,
    ticket: Ticket,
}

/// Job post/edit form controller.
#[derive(Debug)]
pub struct JobForm {
    mode: JobFormMode,
    pub draft: JobDraft,
    pub skills: SkillSelector,
    gate: SubmitGate,
}

impl JobForm {
    pub fn create(available: Vec<Skill>) -> Self {
        Self {
            mode: JobFormMode::Create,
            draft: JobDraft::default(),
            skills: SkillSelector::new(available),
            gate: SubmitGate::new(),
        }
    }

    /// Starts from the job's current values. The job's own skills are always
    /// known to the selector, even before the full list is loaded.
    pub fn edit(job: &Job, mut available: Vec<Skill>) -> Self {
        for skill in &job.skills {
            if !available.iter().any(|s| s.id == skill.id) {
                available.push(skill.clone());
            }
        }
        Self {
            mode: JobFormMode::Edit(job.id),
            draft: JobDraft::from_job(job),
            skills: SkillSelector::new(available).with_selection(job.skills.iter().map(|s| s.id)),
            gate: SubmitGate::new(),
        }
    }

    pub fn mode(&self) -> JobFormMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_busy()
    }

    /// Fetches the skill list into the selector. The selector shows a loading
    /// state meanwhile; on failure it keeps whatever it had.
    pub async fn load_skills(&mut self, catalog: &dyn SkillCatalog) -> Result<(), FormError> {
        self.skills.set_loading(true);
        let result = catalog.available_skills().await;
        self.skills.set_loading(false);

        if !self.gate.liveness().is_alive() {
            return Err(FormError::Unmounted);
        }
        match result {
            Ok(list) => {
                self.skills.set_available(list);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load skills");
                Err(FormError::from_gateway(&e, "Failed to load skills"))
            }
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        self.draft.validate()
    }

    /// Builds the request body. Blank optional fields are left out; on create
    /// so are empty responsibilities and skills.
    pub fn payload(&self) -> JobPayload {
        let d = &self.draft;
        let creating = self.mode == JobFormMode::Create;
        let responsibilities = d.responsibilities.clone();
        let skill_ids = self.skills.selected_ids().to_vec();

        JobPayload {
            title: d.title.trim().to_string(),
            description: d.description.trim().to_string(),
            company: non_blank(&d.company),
            location: d.location.trim().to_string(),
            salary_range: non_blank(&d.salary_range),
            emp_type: non_blank(&d.emp_type),
            responsibilities: if creating && responsibilities.is_empty() {
                None
            } else {
                Some(responsibilities)
            },
            skill_ids: if creating && skill_ids.is_empty() {
                None
            } else {
                Some(skill_ids)
            },
        }
    }

    /// Validates and admits one submission. No request is made here.
    pub fn begin_submit(&mut self) -> Result<JobSubmission, FormError> {
        self.validate()?;
        let ticket = self.gate.try_begin()?;
        Ok(JobSubmission {
            mode: self.mode,
            payload: self.payload(),
            ticket,
        })
    }

    /// Applies the server's answer. A created job clears the form; an edit
    /// keeps the values. Failures keep everything for a retry.
    pub fn complete(
        &mut self,
        submission: JobSubmission,
        result: Result<ApiMessage, GatewayError>,
    ) -> Result<Notice, FormError> {
        let mode = submission.mode;
        self.gate.finish(submission.ticket)?;

        match result {
            Ok(_) => {
                info!(?mode, title = %submission.payload.title, "job saved");
                if mode == JobFormMode::Create {
                    self.reset();
                }
                Ok(Notice::success(mode.success_message()))
            }
            Err(e) => {
                warn!(?mode, error = %e, "job submission failed");
                Err(FormError::from_gateway(&e, mode.failure_message()))
            }
        }
    }

    pub async fn submit(&mut self, store: &dyn JobStore) -> Result<Notice, FormError> {
        let submission = self.begin_submit()?;
        let result = match submission.mode {
            JobFormMode::Create => store.create_job(&submission.payload).await,
            JobFormMode::Edit(id) => store.update_job(id, &submission.payload).await,
        };
        self.complete(submission, result)
    }

    pub fn reset(&mut self) {
        self.draft = JobDraft::default();
        self.skills.clear_selection();
    }

    pub fn unmount(&self) {
        self.gate.unmount();
        self.skills.unmount();
    }
}
