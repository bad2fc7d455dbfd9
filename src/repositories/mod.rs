//! Repository layer for data access operations.
//!
//! `JobStore` is the seam between the service and storage. The PostgreSQL
//! implementation is `JobRepository`; tests run against an in-memory store.

mod job_repo;
#[cfg(test)]
pub(crate) mod memory;

pub use job_repo::JobRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{Job, JobChangeset, JobFilter, NewJob};

/// Storage operations over the jobs table. Each call is a single statement.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn exists(&self, id: i32) -> AppResult<bool>;

    /// Insert a job and return the stored row.
    async fn insert(&self, new_job: NewJob) -> AppResult<Job>;

    /// List jobs matching the filter, ordered by title then id.
    async fn find_all(&self, filter: &JobFilter) -> AppResult<Vec<Job>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Job>>;

    /// Exact title match; the lowest id wins when titles repeat.
    async fn find_by_title(&self, title: &str) -> AppResult<Option<Job>>;

    /// Apply a partial update. `None` when no row has the id.
    async fn update(&self, id: i32, changes: JobChangeset) -> AppResult<Option<Job>>;

    /// Delete by id, returning the number of rows removed.
    async fn delete(&self, id: i32) -> AppResult<usize>;

    async fn ping(&self) -> AppResult<()>;
}

/// Aggregates all repositories for convenient access.
#[derive(Clone)]
pub struct Repositories {
    pub jobs: Arc<dyn JobStore>,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            jobs: Arc::new(JobRepository::new(pool)),
        }
    }

    /// Build from an existing store, e.g. the in-memory one in tests.
    pub fn with_job_store(jobs: Arc<dyn JobStore>) -> Self {
        Self { jobs }
    }
}
