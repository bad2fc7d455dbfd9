//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `job` - Job request/response DTOs and response envelopes
//! - `health` - Health check DTOs
//! - `error` - Common error response DTOs

mod error;
mod health;
mod job;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use job::{
    CreateJobRequest, DeletedResponse, JobEnvelope, JobListEnvelope, JobQuery, JobResponse,
    UpdateJobRequest,
};
