use tracing::{debug, info, warn};

use crate::errors::FormError;
use crate::forms::{Notice, SubmitGate};
use crate::gateway::JobBoardApi;
use crate::models::job::{Job, JobId, JobPage, JobSearchParams};

const PAGE_SIZE: u32 = 10;

/// Search inputs of the job board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilters {
    pub search: String,
    pub location: String,
    pub salary_min: Option<u64>,
    pub skill: String,
}

impl JobFilters {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.location.trim().is_empty()
            || self.salary_min.is_some_and(|s| s > 0)
            || !self.skill.trim().is_empty()
    }
}

/// Public job listing with filters, pagination and save/unsave.
#[derive(Debug)]
pub struct JobBoard {
    filters: JobFilters,
    page: u32,
    results: JobPage,
    loaded: bool,
    loading: bool,
    gate: SubmitGate,
}

impl Default for JobBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBoard {
    pub fn new() -> Self {
        Self {
            filters: JobFilters::default(),
            page: 1,
            results: JobPage::default(),
            loaded: false,
            loading: false,
            gate: SubmitGate::new(),
        }
    }

    pub fn filters(&self) -> &JobFilters {
        &self.filters
    }

    /// Edits the filters. Any change sends the board back to page 1.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut JobFilters)) {
        let before = self.filters.clone();
        edit(&mut self.filters);
        if self.filters != before {
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = JobFilters::default();
        self.page = 1;
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Pages are 1-based. Once a search has loaded they are also capped at
    /// the last page; before that any page can be requested.
    pub fn set_page(&mut self, page: u32) {
        let last = if self.loaded {
            self.results.total_pages.max(1)
        } else {
            u32::MAX
        };
        self.page = page.clamp(1, last);
    }

    pub fn jobs(&self) -> &[Job] {
        &self.results.jobs
    }

    pub fn total(&self) -> u64 {
        self.results.total
    }

    pub fn total_pages(&self) -> u32 {
        self.results.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn params(&self) -> JobSearchParams {
        let text = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        JobSearchParams {
            search: text(&self.filters.search),
            location: text(&self.filters.location),
            salary_min: self.filters.salary_min,
            skill: text(&self.filters.skill),
            page: Some(self.page),
            limit: Some(PAGE_SIZE),
        }
    }

    /// Fetches the current page. On failure the previous results stay.
    pub async fn search(&mut self, api: &dyn JobBoardApi) -> Result<(), FormError> {
        let params = self.params();
        self.loading = true;
        let result = api.search_jobs(&params).await;
        self.loading = false;

        if !self.gate.liveness().is_alive() {
            return Err(FormError::Unmounted);
        }
        match result {
            Ok(page) => {
                debug!(total = page.total, page = self.page, "job search loaded");
                self.results = page;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "job search failed");
                Err(FormError::from_gateway(&e, "Failed to load jobs"))
            }
        }
    }

    /// Flips the saved state of a listed job. Jobs not on the current page
    /// count as unsaved.
    pub async fn toggle_saved(&mut self, api: &dyn JobBoardApi, job_id: JobId) -> Result<Notice, FormError> {
        let saved = self
            .results
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .and_then(|j| j.is_saved)
            .unwrap_or(false);
        self.set_saved(api, job_id, !saved).await
    }

    /// Saves or unsaves a job, then reloads the page. A failed reload does not
    /// undo the reported success.
    pub async fn set_saved(&mut self, api: &dyn JobBoardApi, job_id: JobId, saved: bool) -> Result<Notice, FormError> {
        let ticket = self.gate.try_begin()?;
        let result = if saved {
            api.save_job(job_id).await
        } else {
            api.unsave_job(job_id).await
        };
        self.gate.finish(ticket)?;

        if let Err(e) = result {
            warn!(job_id, error = %e, "save toggle failed");
            return Err(FormError::from_gateway(&e, "Failed to update saved jobs"));
        }
        info!(job_id, saved, "saved state changed");

        if let Err(e) = self.search(api).await {
            warn!(error = %e, "reload after save toggle failed");
        }
        Ok(Notice::success(if saved {
            "Job saved"
        } else {
            "Job removed from saved jobs"
        }))
    }

    pub fn unmount(&self) {
        self.gate.unmount();
    }
}
