//! Job service for business logic operations.
//!
//! Wraps a `JobStore` with the rules the API relies on: duplicate ids are
//! rejected before any write, missing rows become `NotFound`, and empty
//! patches are refused.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Job, JobChangeset, JobFilter, NewJob};
use crate::repositories::JobStore;

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Creates a job with a caller-supplied id.
    ///
    /// # Errors
    /// `Duplicate` when a job with the same id already exists; nothing is written.
    pub async fn create_job(&self, new_job: NewJob) -> AppResult<Job> {
        if self.store.exists(new_job.id).await? {
            tracing::debug!(job_id = new_job.id, "Rejecting duplicate job id");
            return Err(AppError::Duplicate {
                entity: "job".to_string(),
                field: "id".to_string(),
                value: new_job.id.to_string(),
            });
        }

        let job = self.store.insert(new_job).await?;
        tracing::info!(job_id = job.id, title = %job.title, "Job created");
        Ok(job)
    }

    pub async fn list_jobs(&self, filter: JobFilter) -> AppResult<Vec<Job>> {
        self.store.find_all(&filter).await
    }

    pub async fn get_job(&self, id: i32) -> AppResult<Job> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("job", "id", id))
    }

    pub async fn get_job_by_title(&self, title: &str) -> AppResult<Job> {
        self.store
            .find_by_title(title)
            .await?
            .ok_or_else(|| AppError::not_found("job", "title", title))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    /// - `BadRequest` when the changeset carries no fields
    /// - `NotFound` when no job has the id
    pub async fn update_job(&self, id: i32, changes: JobChangeset) -> AppResult<Job> {
        if changes.is_empty() {
            return Err(AppError::bad_request("No data"));
        }

        let job = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("job", "id", id))?;
        tracing::info!(job_id = id, "Job updated");
        Ok(job)
    }

    pub async fn delete_job(&self, id: i32) -> AppResult<()> {
        if self.store.delete(id).await? == 0 {
            return Err(AppError::not_found("job", "id", id));
        }
        tracing::info!(job_id = id, "Job deleted");
        Ok(())
    }

    /// Checks that the backing store answers queries.
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
