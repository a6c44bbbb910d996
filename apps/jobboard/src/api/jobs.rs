use std::fmt;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};

use super::{require_token, ApiClient};
use crate::errors::AppError;
use crate::listing::{JobFilters, JobSource};
use crate::models::{JobPostCreate, JobPostUpdate, JobPosting, SuggestionList};

/// Autocomplete lists served by `GET /jobs/suggestions/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SuggestionKind {
    RoleNames,
    CompanyNames,
    Locations,
    DepartmentNames,
}

impl SuggestionKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            SuggestionKind::RoleNames => "role-names",
            SuggestionKind::CompanyNames => "company-names",
            SuggestionKind::Locations => "locations",
            SuggestionKind::DepartmentNames => "department-names",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl ApiClient {
    /// GET /jobs/?RoleName&CompanyName&Location&DepartmentName&skip&limit
    pub async fn list_jobs(
        &self,
        filters: &JobFilters,
        token: Option<&str>,
    ) -> Result<Vec<JobPosting>, AppError> {
        let token = require_token(token, "fetch jobs")?;
        let endpoint = "/jobs/";
        debug!(
            "Listing jobs (skip {:?}, limit {:?})",
            filters.skip(),
            filters.limit()
        );
        let request = self
            .request(Method::GET, endpoint, Some(token))
            .query(&filters.query_pairs());
        let response = self.execute(request, endpoint).await?;
        Self::read_json(response).await
    }

    /// GET /jobs/{id}
    pub async fn get_job(&self, job_id: &str, token: Option<&str>) -> Result<JobPosting, AppError> {
        let token = require_token(token, "fetch job details")?;
        let endpoint = format!("/jobs/{job_id}");
        let response = self
            .execute(self.request(Method::GET, &endpoint, Some(token)), &endpoint)
            .await?;
        Self::read_json(response).await
    }

    /// POST /jobs/
    pub async fn create_job(
        &self,
        job: &JobPostCreate,
        token: Option<&str>,
    ) -> Result<JobPosting, AppError> {
        let token = require_token(token, "create a job")?;
        let endpoint = "/jobs/";
        let response = self
            .execute(
                self.request(Method::POST, endpoint, Some(token)).json(job),
                endpoint,
            )
            .await?;
        let created: JobPosting = Self::read_json(response).await?;
        info!("Created job {} ({})", created.id, created.role_name);
        Ok(created)
    }

    /// PUT /jobs/{id}
    pub async fn update_job(
        &self,
        job_id: &str,
        job: &JobPostUpdate,
        token: Option<&str>,
    ) -> Result<JobPosting, AppError> {
        let token = require_token(token, "update a job")?;
        let endpoint = format!("/jobs/{job_id}");
        let response = self
            .execute(
                self.request(Method::PUT, &endpoint, Some(token)).json(job),
                &endpoint,
            )
            .await?;
        let updated: JobPosting = Self::read_json(response).await?;
        info!("Updated job {}", updated.id);
        Ok(updated)
    }

    /// DELETE /jobs/{id}
    pub async fn delete_job(&self, job_id: &str, token: Option<&str>) -> Result<(), AppError> {
        let token = require_token(token, "delete a job")?;
        let endpoint = format!("/jobs/{job_id}");
        let response = self
            .execute(self.request(Method::DELETE, &endpoint, Some(token)), &endpoint)
            .await?;
        Self::read_empty(response).await?;
        info!("Deleted job {}", job_id);
        Ok(())
    }

    /// GET /jobs/suggestions/{kind}
    pub async fn suggestions(
        &self,
        kind: SuggestionKind,
        token: Option<&str>,
    ) -> Result<SuggestionList, AppError> {
        let token = require_token(token, "load suggestions")?;
        let endpoint = format!("/jobs/suggestions/{}", kind.path_segment());
        let response = self
            .execute(self.request(Method::GET, &endpoint, Some(token)), &endpoint)
            .await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl JobSource for ApiClient {
    async fn fetch_jobs(
        &self,
        filters: &JobFilters,
        token: Option<&str>,
    ) -> Result<Vec<JobPosting>, AppError> {
        self.list_jobs(filters, token).await
    }
}
