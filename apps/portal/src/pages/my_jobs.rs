use tracing::{info, warn};

use crate::errors::FormError;
use crate::forms::{Notice, SubmitGate, Ticket};
use crate::gateway::{GatewayError, JobStore};
use crate::models::auth::ApiMessage;
use crate::models::job::{EmployerJobsQuery, Job, JobId, JobPage, SortField, SortOrder};

#[derive(Debug)]
pub struct PendingDelete {
    pub job_id: JobId,
    ticket: Ticket,
}

/// The employer's own postings: sortable, paginated, deletable.
#[derive(Debug, Default)]
pub struct MyJobs {
    query: EmployerJobsQuery,
    results: JobPage,
    loading: bool,
    deleting: Option<JobId>,
    gate: SubmitGate,
}

impl MyJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &EmployerJobsQuery {
        &self.query
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

    /// The job whose delete request is in flight.
    pub fn deleting(&self) -> Option<JobId> {
        self.deleting
    }

    pub fn set_sort(&mut self, sort: SortField) {
        self.query.sort = sort;
        self.query.page = 1;
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.query.order = order;
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    pub async fn refresh(&mut self, store: &dyn JobStore) -> Result<(), FormError> {
        self.loading = true;
        let result = store.list_employer_jobs(&self.query).await;
        self.loading = false;

        if !self.gate.liveness().is_alive() {
            return Err(FormError::Unmounted);
        }
        match result {
            Ok(page) => {
                self.results = page;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load employer jobs");
                Err(FormError::from_gateway(&e, "Failed to load your jobs"))
            }
        }
    }

    /// Called after the add-job form succeeded: back to the first page.
    pub async fn job_added(&mut self, store: &dyn JobStore) -> Result<(), FormError> {
        self.query.page = 1;
        self.refresh(store).await
    }

    pub fn begin_delete(&mut self, job_id: JobId) -> Result<PendingDelete, FormError> {
        let ticket = self.gate.try_begin()?;
        self.deleting = Some(job_id);
        Ok(PendingDelete { job_id, ticket })
    }

    pub fn finish_delete(
        &mut self,
        pending: PendingDelete,
        result: Result<ApiMessage, GatewayError>,
    ) -> Result<Notice, FormError> {
        self.deleting = None;
        self.gate.finish(pending.ticket)?;
        match result {
            Ok(_) => {
                info!(job_id = pending.job_id, "job deleted");
                Ok(Notice::success("Job deleted successfully"))
            }
            Err(e) => {
                warn!(job_id = pending.job_id, error = %e, "job delete failed");
                Err(FormError::from_gateway(&e, "Failed to delete job"))
            }
        }
    }

    /// Deletes a posting and reloads the list. A failed reload does not undo
    /// the reported success.
    pub async fn delete(&mut self, store: &dyn JobStore, job_id: JobId) -> Result<Notice, FormError> {
        let pending = self.begin_delete(job_id)?;
        let result = store.delete_job(job_id).await;
        let notice = self.finish_delete(pending, result)?;

        if let Err(e) = self.refresh(store).await {
            warn!(error = %e, "reload after delete failed");
        }
        Ok(notice)
    }

    pub fn unmount(&self) {
        self.gate.unmount();
    }
}
