use crate::models::skill::Skill;

use super::SkillSelector;

/// What the selector's dropdown should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown<'a> {
    Hidden,
    Suggestions {
        items: Vec<&'a Skill>,
        create_label: Option<String>,
    },
    /// The search names an option that is already selected.
    AlreadySelected,
}

impl<'a> Dropdown<'a> {
    pub(super) fn build(selector: &'a SkillSelector) -> Self {
        if !selector.is_open() || selector.is_loading() {
            return Dropdown::Hidden;
        }

        let items: Vec<&Skill> = selector.suggestions().collect();
        let offer_create = !selector.search().trim().is_empty() && !selector.search_matches_existing();

        if !items.is_empty() || offer_create {
            return Dropdown::Suggestions {
                items,
                create_label: selector.create_label(),
            };
        }

        if !selector.search().is_empty() && selector.search_matches_existing() {
            return Dropdown::AlreadySelected;
        }

        Dropdown::Hidden
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Dropdown::Hidden)
    }
}
