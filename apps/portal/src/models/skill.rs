use serde::{Deserialize, Serialize};

pub type SkillId = i64;
pub type CategoryId = i64;

/// A selectable skill. Ids are unique server-side; names are not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
}

impl Skill {
    pub fn new(id: SkillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Case-insensitive equality with the whole of `text`, surrounding
    /// whitespace included. Used only to suppress "create" in the UI.
    pub fn name_matches(&self, text: &str) -> bool {
        self.name.to_lowercase() == text.to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct NamePayload<'a> {
    pub name: &'a str,
}
