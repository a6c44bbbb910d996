//! Admin job mutations. Every successful write is followed by a full
//! refetch of the dashboard listing; nothing is patched locally.

use async_trait::async_trait;
use tracing::info;

use crate::api::{require_token, ApiClient};
use crate::errors::AppError;
use crate::forms::JobForm;
use crate::listing::{JobFilters, JobListing, JobSource, ADMIN_PAGE_LIMIT};
use crate::models::{JobPostCreate, JobPostUpdate, JobPosting};

/// Write side of the job service.
#[async_trait]
pub trait JobStore: JobSource {
    async fn create(&self, job: &JobPostCreate, token: &str) -> Result<JobPosting, AppError>;
    async fn update(
        &self,
        job_id: &str,
        job: &JobPostUpdate,
        token: &str,
    ) -> Result<JobPosting, AppError>;
    async fn delete(&self, job_id: &str, token: &str) -> Result<(), AppError>;
}

#[async_trait]
impl JobStore for ApiClient {
    async fn create(&self, job: &JobPostCreate, token: &str) -> Result<JobPosting, AppError> {
        self.create_job(job, Some(token)).await
    }

    async fn update(
        &self,
        job_id: &str,
        job: &JobPostUpdate,
        token: &str,
    ) -> Result<JobPosting, AppError> {
        self.update_job(job_id, job, Some(token)).await
    }

    async fn delete(&self, job_id: &str, token: &str) -> Result<(), AppError> {
        self.delete_job(job_id, Some(token)).await
    }
}

/// Explicit yes/no before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Pre-answered confirmation, e.g. from `--yes`.
pub struct Preconfirmed(pub bool);

impl Confirm for Preconfirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Admin dashboard: the unpaged job list plus the mutations on it.
pub struct AdminDashboard {
    listing: JobListing,
}

impl Default for AdminDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self {
            listing: JobListing::new(JobFilters::new(), ADMIN_PAGE_LIMIT),
        }
    }

    pub fn jobs(&self) -> &[JobPosting] {
        self.listing.jobs()
    }

    pub async fn load<S>(&mut self, store: &S, token: Option<&str>) -> Result<(), AppError>
    where
        S: JobStore + ?Sized,
    {
        self.listing.refresh(store, token).await
    }

    pub async fn create<S>(
        &mut self,
        store: &S,
        form: &JobForm,
        token: Option<&str>,
    ) -> Result<JobPosting, AppError>
    where
        S: JobStore + ?Sized,
    {
        let token = require_token(token, "create a job")?;
        let body = form.validate()?;
        let created = store.create(&body, token).await?;
        info!("Job \"{}\" has been successfully created", created.role_name);
        self.load(store, Some(token)).await?;
        Ok(created)
    }

    pub async fn update<S>(
        &mut self,
        store: &S,
        job_id: &str,
        form: &JobForm,
        token: Option<&str>,
    ) -> Result<JobPosting, AppError>
    where
        S: JobStore + ?Sized,
    {
        let token = require_token(token, "update a job")?;
        let body = JobPostUpdate::from(form.validate()?);
        let updated = store.update(job_id, &body, token).await?;
        info!("Job \"{}\" has been successfully updated", updated.role_name);
        self.load(store, Some(token)).await?;
        Ok(updated)
    }

    /// Deletes after confirmation. Returns false when the user declined,
    /// in which case nothing is sent.
    pub async fn delete<S, C>(
        &mut self,
        store: &S,
        job_id: &str,
        confirm: &C,
        token: Option<&str>,
    ) -> Result<bool, AppError>
    where
        S: JobStore + ?Sized,
        C: Confirm + ?Sized,
    {
        let token = require_token(token, "delete a job")?;
        let prompt = format!(
            "This action cannot be undone. This will permanently delete job {job_id}. Continue?"
        );
        if !confirm.confirm(&prompt) {
            info!("Deletion of job {} cancelled", job_id);
            return Ok(false);
        }
        store.delete(job_id, token).await?;
        self.load(store, Some(token)).await?;
        Ok(true)
    }
}
