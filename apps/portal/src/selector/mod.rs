//! Skill selector: tag-style multi-select with inline creation.
//!
//! Known options are the server's list plus anything created in this session.
//! The selection is an ordered set: always a subset of the known ids, never
//! holding an id twice. The widget itself enforces that, so hosts can read
//! `selected_ids()` without deduplicating.

use tracing::{info, warn};

use crate::errors::FormError;
use crate::forms::lifecycle::{SubmitGate, Ticket};
use crate::forms::Notice;
use crate::gateway::{GatewayError, SkillCatalog};
use crate::models::skill::{Skill, SkillId};

pub mod dropdown;

pub use dropdown::Dropdown;

const CREATE_FAILED: &str = "Failed to create skill";

/// An admitted inline-create request. Hand it back to `finish_create`.
#[derive(Debug)]
pub struct CreateRequest {
    pub name: String,
    ticket: Ticket,
}

#[derive(Debug, Default)]
pub struct SkillSelector {
    available: Vec<Skill>,
    created: Vec<Skill>,
    selected: Vec<SkillId>,
    search: String,
    open: bool,
    disabled: bool,
    loading: bool,
    gate: SubmitGate,
}

impl SkillSelector {
    pub fn new(available: Vec<Skill>) -> Self {
        Self {
            available,
            ..Default::default()
        }
    }

    /// Pre-selects `ids`, skipping unknown and repeated ones.
    pub fn with_selection(mut self, ids: impl IntoIterator<Item = SkillId>) -> Self {
        for id in ids {
            self.insert(id);
        }
        self
    }

    /// Replaces the server-provided options. Selected options missing from
    /// the new list are carried over so the selection stays valid.
    pub fn set_available(&mut self, available: Vec<Skill>) {
        let carried: Vec<Skill> = self
            .selected_options()
            .filter(|s| !available.iter().any(|a| a.id == s.id))
            .filter(|s| !self.created.iter().any(|c| c.id == s.id))
            .cloned()
            .collect();
        self.available = available;
        self.available.extend(carried);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_creating(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Typing opens the dropdown.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.open = true;
    }

    pub fn focus(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Server options followed by session-created ones.
    pub fn known_options(&self) -> impl Iterator<Item = &Skill> + '_ {
        self.available.iter().chain(self.created.iter())
    }

    pub fn session_created(&self) -> &[Skill] {
        &self.created
    }

    pub fn is_known(&self, id: SkillId) -> bool {
        self.known_options().any(|s| s.id == id)
    }

    pub fn selected_ids(&self) -> &[SkillId] {
        &self.selected
    }

    pub fn is_selected(&self, id: SkillId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected options, in selection order.
    pub fn selected_options(&self) -> impl Iterator<Item = &Skill> + '_ {
        self.selected
            .iter()
            .filter_map(move |id| self.known_options().find(|s| s.id == *id))
    }

    /// Unselected known options whose name contains the search text,
    /// case-insensitively. Recomputed from scratch on every call.
    pub fn suggestions(&self) -> impl Iterator<Item = &Skill> + '_ {
        let needle = self.search.to_lowercase();
        let loading = self.loading;
        self.known_options().filter(move |s| {
            !loading && !self.selected.contains(&s.id) && s.name.to_lowercase().contains(&needle)
        })
    }

    /// True when some known option's name equals the whole search text.
    pub fn search_matches_existing(&self) -> bool {
        self.known_options().any(|s| s.name_matches(&self.search))
    }

    pub fn can_create(&self) -> bool {
        self.check_create().is_ok()
    }

    pub fn create_label(&self) -> Option<String> {
        self.can_create()
            .then(|| format!("Create new skill: \"{}\"", self.search.trim()))
    }

    pub fn dropdown(&self) -> Dropdown<'_> {
        Dropdown::build(self)
    }

    /// Appends `id` to the selection, then clears the search and closes the
    /// dropdown. Returns `false` (and changes nothing) for unknown or
    /// already-selected ids and while disabled.
    pub fn select(&mut self, id: SkillId) -> bool {
        if self.disabled || !self.insert(id) {
            return false;
        }
        self.search.clear();
        self.open = false;
        true
    }

    /// Removes exactly `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: SkillId) -> bool {
        if self.disabled {
            return false;
        }
        let before = self.selected.len();
        self.selected.retain(|s| *s != id);
        self.selected.len() != before
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.search.clear();
    }

    fn insert(&mut self, id: SkillId) -> bool {
        if !self.is_known(id) || self.is_selected(id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    fn check_create(&self) -> Result<(), FormError> {
        if self.gate.is_busy() {
            return Err(FormError::Busy);
        }
        if self.disabled || self.loading {
            return Err(FormError::validation("Skill selection is not available right now"));
        }
        if self.search.trim().is_empty() {
            return Err(FormError::validation("Type a skill name first"));
        }
        if self.search_matches_existing() {
            return Err(FormError::validation("Skill already exists"));
        }
        Ok(())
    }

    /// Admits one inline create for the trimmed search text.
    pub fn begin_create(&mut self) -> Result<CreateRequest, FormError> {
        self.check_create()?;
        let ticket = self.gate.try_begin()?;
        Ok(CreateRequest {
            name: self.search.trim().to_string(),
            ticket,
        })
    }

    /// Applies the create-or-get result. On success the option becomes known
    /// and selected; on failure the selection is left exactly as it was.
    pub fn finish_create(
        &mut self,
        request: CreateRequest,
        result: Result<Skill, GatewayError>,
    ) -> Result<Notice, FormError> {
        self.gate.finish(request.ticket)?;

        match result {
            Ok(skill) => {
                if !self.is_known(skill.id) {
                    self.created.push(skill.clone());
                }
                self.insert(skill.id);
                self.search.clear();
                self.open = false;
                info!(skill_id = skill.id, name = %skill.name, "skill added to selection");
                Ok(Notice::success(format!(
                    "Skill \"{}\" added successfully",
                    skill.name
                )))
            }
            Err(e) => {
                warn!(name = %request.name, error = %e, "skill creation failed");
                Err(FormError::from_gateway(&e, CREATE_FAILED))
            }
        }
    }

    /// Runs one inline create against `catalog`. No automatic retry.
    pub async fn create(&mut self, catalog: &dyn SkillCatalog) -> Result<Notice, FormError> {
        let request = self.begin_create()?;
        let result = catalog.create_or_get_skill(&request.name).await;
        self.finish_create(request, result)
    }

    /// Marks the widget gone; late create results are discarded.
    pub fn unmount(&self) {
        self.gate.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    fn skills() -> Vec<Skill> {
        vec![
            Skill::new(1, "Rust"),
            Skill::new(2, "TypeScript"),
            Skill::new(3, "PostgreSQL"),
            Skill::new(4, "Rustdoc"),
        ]
    }

    struct FakeCatalog {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeCatalog {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SkillCatalog for FakeCatalog {
        async fn available_skills(&self) -> Result<Vec<Skill>, GatewayError> {
            Ok(skills())
        }

        async fn create_or_get_skill(&self, name: &str) -> Result<Skill, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GatewayError::Api {
                    status: 400,
                    message: Some("Skill name too long".to_string()),
                });
            }
            Ok(Skill::new(100, name))
        }
    }

    fn names<'a>(it: impl Iterator<Item = &'a Skill>) -> Vec<&'a str> {
        it.map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_suggestions_filter_case_insensitively() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("rUs");
        assert_eq!(names(sel.suggestions()), vec!["Rust", "Rustdoc"]);
    }

    #[test]
    fn test_suggestions_never_include_selected() {
        let mut sel = SkillSelector::new(skills()).with_selection([1, 3]);
        for search in ["", "r", "rust", "post", "SQL", "zzz"] {
            sel.set_search(search);
            assert!(sel.suggestions().all(|s| !sel.is_selected(s.id)), "search {search:?}");
        }
    }

    #[test]
    fn test_suggestions_are_restartable() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("t");
        let first: Vec<_> = sel.suggestions().map(|s| s.id).collect();
        let second: Vec<_> = sel.suggestions().map(|s| s.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_appends_and_clears_search() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("type");
        assert!(sel.select(2));
        assert!(sel.select(1));
        assert_eq!(sel.selected_ids(), &[2, 1]);
        assert_eq!(sel.search(), "");
        assert!(!sel.is_open());
    }

    #[test]
    fn test_select_twice_keeps_one() {
        let mut sel = SkillSelector::new(skills());
        assert!(sel.select(1));
        assert!(!sel.select(1));
        assert_eq!(sel.selected_ids(), &[1]);
    }

    #[test]
    fn test_select_unknown_id_rejected() {
        let mut sel = SkillSelector::new(skills());
        assert!(!sel.select(999));
        assert!(sel.selected_ids().is_empty());
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut sel = SkillSelector::new(skills()).with_selection([1, 2]);
        assert!(!sel.remove(3));
        assert_eq!(sel.selected_ids(), &[1, 2]);
        assert!(sel.remove(1));
        assert!(!sel.remove(1));
        assert_eq!(sel.selected_ids(), &[2]);
    }

    #[test]
    fn test_disabled_blocks_changes() {
        let mut sel = SkillSelector::new(skills()).with_selection([1]);
        sel.set_disabled(true);
        assert!(!sel.select(2));
        assert!(!sel.remove(1));
        assert_eq!(sel.selected_ids(), &[1]);
    }

    #[test]
    fn test_existing_name_suppresses_create() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("postgresql");
        assert!(sel.search_matches_existing());
        assert!(!sel.can_create());
        assert_eq!(sel.create_label(), None);

        sel.set_search("Go");
        assert_eq!(sel.create_label().as_deref(), Some("Create new skill: \"Go\""));
    }

    #[test]
    fn test_trailing_space_still_offers_create() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("Rust ");
        assert!(!sel.search_matches_existing());
        assert_eq!(sel.create_label().as_deref(), Some("Create new skill: \"Rust\""));
    }

    #[test]
    fn test_blank_search_cannot_create() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("   ");
        assert!(matches!(sel.begin_create(), Err(FormError::Validation(_))));
    }

    #[test]
    fn test_only_one_create_in_flight() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("Go");
        let first = sel.begin_create().unwrap();
        assert_eq!(first.name, "Go");
        assert!(sel.is_creating());
        assert_eq!(sel.begin_create().unwrap_err(), FormError::Busy);

        sel.finish_create(first, Ok(Skill::new(50, "Go"))).unwrap();
        assert!(!sel.is_creating());
    }

    #[tokio::test]
    async fn test_successful_create_is_known_and_selected() {
        let catalog = FakeCatalog::ok();
        let mut sel = SkillSelector::new(skills()).with_selection([1]);
        sel.set_search("  Kubernetes ");

        let notice = sel.create(&catalog).await.unwrap();
        assert_eq!(notice.message, "Skill \"Kubernetes\" added successfully");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert!(sel.is_known(100));
        assert_eq!(sel.selected_ids(), &[1, 100]);
        assert_eq!(sel.session_created(), &[Skill::new(100, "Kubernetes")]);
        assert_eq!(sel.search(), "");
    }

    #[tokio::test]
    async fn test_failed_create_leaves_selection_unchanged() {
        let catalog = FakeCatalog::failing();
        let mut sel = SkillSelector::new(skills()).with_selection([2, 3]);
        let before = sel.selected_ids().to_vec();
        sel.set_search("Elixir");

        let err = sel.create(&catalog).await.unwrap_err();
        assert_eq!(err, FormError::Server("Skill name too long".to_string()));
        assert_eq!(sel.selected_ids(), before.as_slice());
        assert!(sel.session_created().is_empty());
        assert!(!sel.is_creating());
        // search text is kept so the user can retry by hand
        assert_eq!(sel.search(), "Elixir");
    }

    #[test]
    fn test_create_returning_existing_option_not_duplicated() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("rust lang");
        let req = sel.begin_create().unwrap();
        sel.finish_create(req, Ok(Skill::new(1, "Rust"))).unwrap();
        assert!(sel.session_created().is_empty());
        assert_eq!(sel.selected_ids(), &[1]);
        assert_eq!(sel.known_options().filter(|s| s.id == 1).count(), 1);
    }

    #[test]
    fn test_late_result_after_unmount_discarded() {
        let mut sel = SkillSelector::new(skills());
        sel.set_search("Zig");
        let req = sel.begin_create().unwrap();
        sel.unmount();
        let err = sel.finish_create(req, Ok(Skill::new(77, "Zig"))).unwrap_err();
        assert_eq!(err, FormError::Unmounted);
        assert!(!sel.is_selected(77));
    }

    #[test]
    fn test_loading_hides_suggestions_and_blocks_create() {
        let mut sel = SkillSelector::new(skills());
        sel.set_loading(true);
        sel.set_search("New Skill");
        assert_eq!(sel.suggestions().count(), 0);
        assert!(!sel.can_create());
    }

    #[test]
    fn test_reload_keeps_selected_options_known() {
        let mut sel = SkillSelector::new(skills()).with_selection([3]);
        sel.set_available(vec![Skill::new(1, "Rust")]);
        assert!(sel.is_known(3));
        assert_eq!(sel.selected_ids(), &[3]);
        assert_eq!(
            names(sel.selected_options()),
            vec!["PostgreSQL"]
        );
    }
}
