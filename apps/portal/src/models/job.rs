use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::skill::{Skill, SkillId};

pub type JobId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub emp_type: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_saved: Option<bool>,
}

/// One page of jobs, shared by the public board and the employer dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobPage {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Filters for `GET /jobs`. Unset, empty or zero values are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSearchParams {
    pub search: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<u64>,
    pub skill: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl JobSearchParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_text(&mut query, "search", &self.search);
        push_text(&mut query, "location", &self.location);
        push_number(&mut query, "salary_min", self.salary_min);
        push_text(&mut query, "skill", &self.skill);
        push_number(&mut query, "page", self.page.map(u64::from));
        push_number(&mut query, "limit", self.limit.map(u64::from));
        query
    }
}

fn push_text(query: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        query.push((key, v.to_string()));
    }
}

fn push_number(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<u64>) {
    if let Some(v) = value.filter(|v| *v > 0) {
        query.push((key, v.to_string()));
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortField::CreatedAt => "created_at",
            SortField::Title => "title",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Query for the employer's own postings.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct EmployerJobsQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for EmployerJobsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

/// Create/update body for employer job endpoints.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct JobPayload {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emp_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_ids: Option<Vec<SkillId>>,
}
