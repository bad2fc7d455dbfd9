//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod job_service;

pub use job_service::JobService;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since the stores sit behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub jobs: JobService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            jobs: JobService::new(repos.jobs),
        }
    }
}
