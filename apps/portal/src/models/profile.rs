use serde::{Deserialize, Serialize};

use crate::models::skill::Skill;
use crate::models::user::Role;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub cv_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployerProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateCandidateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateEmployerProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadCvResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cv_url: Option<String>,
}

/// Editable candidate fields, as plain text inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFields {
    pub full_name: String,
    pub email: String,
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub phone: String,
    /// Read-only; changed through CV upload.
    pub cv_url: Option<String>,
}

/// Editable employer fields, as plain text inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployerFields {
    pub full_name: String,
    pub email: String,
    pub company_name: String,
    pub website: String,
    pub industry: String,
    pub location: String,
    pub description: String,
}

/// Profile form state. The editable field set depends on the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFields {
    Candidate(CandidateFields),
    Employer(EmployerFields),
}

/// A role-specific update body produced from `ProfileFields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdate {
    Candidate(UpdateCandidateProfileRequest),
    Employer(UpdateEmployerProfileRequest),
}

impl ProfileFields {
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Candidate => ProfileFields::Candidate(CandidateFields::default()),
            Role::Employer => ProfileFields::Employer(EmployerFields::default()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ProfileFields::Candidate(_) => Role::Candidate,
            ProfileFields::Employer(_) => Role::Employer,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            ProfileFields::Candidate(f) => &f.full_name,
            ProfileFields::Employer(f) => &f.full_name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            ProfileFields::Candidate(f) => &f.email,
            ProfileFields::Employer(f) => &f.email,
        }
    }

    /// Blank inputs become absent fields in the update body.
    pub fn to_update(&self) -> ProfileUpdate {
        match self {
            ProfileFields::Candidate(f) => ProfileUpdate::Candidate(UpdateCandidateProfileRequest {
                full_name: non_blank(&f.full_name),
                email: non_blank(&f.email),
                headline: non_blank(&f.headline),
                bio: non_blank(&f.bio),
                location: non_blank(&f.location),
                phone: non_blank(&f.phone),
            }),
            ProfileFields::Employer(f) => ProfileUpdate::Employer(UpdateEmployerProfileRequest {
                full_name: non_blank(&f.full_name),
                email: non_blank(&f.email),
                company_name: non_blank(&f.company_name),
                website: non_blank(&f.website),
                industry: non_blank(&f.industry),
                location: non_blank(&f.location),
                description: non_blank(&f.description),
            }),
        }
    }
}

impl From<CandidateProfile> for CandidateFields {
    fn from(p: CandidateProfile) -> Self {
        Self {
            full_name: p.full_name,
            email: p.email.unwrap_or_default(),
            headline: p.headline.unwrap_or_default(),
            bio: p.bio.unwrap_or_default(),
            location: p.location.unwrap_or_default(),
            phone: p.phone.unwrap_or_default(),
            cv_url: p.cv_url,
        }
    }
}

impl From<EmployerProfile> for EmployerFields {
    fn from(p: EmployerProfile) -> Self {
        Self {
            full_name: p.full_name,
            email: p.email.unwrap_or_default(),
            company_name: p.company_name.unwrap_or_default(),
            website: p.website.unwrap_or_default(),
            industry: p.industry.unwrap_or_default(),
            location: p.location.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
        }
    }
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
