use tracing::{info, warn};

use crate::errors::{FormError, GENERIC_FAILURE};
use crate::forms::lifecycle::{SubmitGate, Ticket};
use crate::forms::validation::require;
use crate::forms::Notice;
use crate::gateway::admin::CatalogKind;
use crate::gateway::{AdminCatalog, GatewayError};
use crate::models::auth::ApiMessage;

#[derive(Debug)]
pub struct CatalogSubmission {
    pub name: String,
    ticket: Ticket,
}

/// Admin dialog for adding a skill/category, or renaming one (`target` set).
#[derive(Debug)]
pub struct CatalogEntryForm {
    kind: CatalogKind,
    target: Option<i64>,
    pub name: String,
    gate: SubmitGate,
}

impl CatalogEntryForm {
    pub fn add(kind: CatalogKind) -> Self {
        Self {
            kind,
            target: None,
            name: String::new(),
            gate: SubmitGate::new(),
        }
    }

    pub fn edit(kind: CatalogKind, id: i64, current_name: impl Into<String>) -> Self {
        Self {
            kind,
            target: Some(id),
            name: current_name.into(),
            gate: SubmitGate::new(),
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && !self.gate.is_busy()
    }

    pub fn begin_submit(&mut self) -> Result<CatalogSubmission, FormError> {
        require(&self.name, "Name is required")?;
        let ticket = self.gate.try_begin()?;
        Ok(CatalogSubmission {
            name: self.name.trim().to_string(),
            ticket,
        })
    }

    pub fn complete(
        &mut self,
        submission: CatalogSubmission,
        result: Result<ApiMessage, GatewayError>,
    ) -> Result<Notice, FormError> {
        self.gate.finish(submission.ticket)?;
        match result {
            Ok(_) => {
                info!(kind = self.kind.label(), name = %submission.name, "catalog entry saved");
                Ok(Notice::success(self.success_message()))
            }
            Err(e) => {
                warn!(kind = self.kind.label(), error = %e, "catalog entry rejected");
                Err(match FormError::from_gateway(&e, GENERIC_FAILURE) {
                    FormError::Server(msg) if e.server_message().is_some() => {
                        FormError::Server(format!("Error: {msg}"))
                    }
                    other => other,
                })
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn AdminCatalog, token: &str) -> Result<Notice, FormError> {
        let submission = self.begin_submit()?;
        let result = match self.target {
            None => api.add_entry(token, self.kind, &submission.name).await,
            Some(id) => api.edit_entry(token, self.kind, id, &submission.name).await,
        };
        self.complete(submission, result)
    }

    fn success_message(&self) -> &'static str {
        match (self.kind, self.target) {
            (CatalogKind::Skill, None) => "New skill added successfully",
            (CatalogKind::Category, None) => "New category added successfully",
            (CatalogKind::Skill, Some(_)) => "Skill name edited successfully",
            (CatalogKind::Category, Some(_)) => "Category name edited successfully",
        }
    }
}
