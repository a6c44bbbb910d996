use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp;

/// A job posting as returned by the service. Wire names are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct JobPosting {
    #[serde(rename = "id")]
    pub id: String,
    pub role_name: String,
    pub company_name: String,
    pub job_description: String,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub application_link: Option<String>,
    #[serde(default)]
    pub referral_status: Option<String>,
    #[serde(with = "timestamp")]
    pub posting_date: DateTime<Utc>,
}

/// Body of `POST /jobs/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct JobPostCreate {
    pub role_name: String,
    pub company_name: String,
    pub job_description: String,
    pub department_name: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub application_link: Option<String>,
    pub referral_status: Option<String>,
}

/// Body of `PUT /jobs/{id}`. Absent fields are left untouched by the
/// service; `Some(None)` on an optional field is sent as `null` and clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct JobPostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub department_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub application_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub referral_status: Option<Option<String>>,
}

/// A present `null` becomes `Some(None)`; a missing key stays `None` via `default`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A validated form replaces every field, so unset optionals are cleared.
impl From<JobPostCreate> for JobPostUpdate {
    fn from(job: JobPostCreate) -> Self {
        JobPostUpdate {
            role_name: Some(job.role_name),
            company_name: Some(job.company_name),
            job_description: Some(job.job_description),
            department_name: Some(job.department_name),
            location: Some(job.location),
            contact_email: Some(job.contact_email),
            application_link: Some(job.application_link),
            referral_status: Some(job.referral_status),
        }
    }
}

/// Referral availability offered by the admin job form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferralStatus {
    Yes,
    #[default]
    No,
    Maybe,
    Ask,
}

impl ReferralStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralStatus::Yes => "yes",
            ReferralStatus::No => "no",
            ReferralStatus::Maybe => "maybe",
            ReferralStatus::Ask => "ask",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Some(ReferralStatus::Yes),
            "no" => Some(ReferralStatus::No),
            "maybe" => Some(ReferralStatus::Maybe),
            "ask" => Some(ReferralStatus::Ask),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferralStatus::Yes => "Yes",
            ReferralStatus::No => "No",
            ReferralStatus::Maybe => "Maybe",
            ReferralStatus::Ask => "Ask for referral",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SuggestionList {
    pub suggestions: Vec<String>,
}

#[cfg(test)]
pub(crate) fn sample_job(id: &str, role: &str, company: &str) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        role_name: role.to_string(),
        company_name: company.to_string(),
        job_description: format!("{role} at {company}"),
        department_name: None,
        location: Some("Berlin".to_string()),
        contact_email: None,
        application_link: None,
        referral_status: Some("no".to_string()),
        posting_date: Utc::now(),
    }
}
