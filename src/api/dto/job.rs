//! Job-related DTOs for API requests and responses.
//!
//! Field names are camelCase on the wire; `company_handle` is exposed as
//! `companyHandle`.

use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Job, JobChangeset, JobFilter, NewJob};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a job.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "title": "Software Engineer",
    "salary": 120000,
    "equity": 0.05,
    "companyHandle": "acme"
}))]
pub struct CreateJobRequest {
    pub id: i32,

    #[validate(length(min = 1, message = "Title cannot be empty"))]
    #[schema(min_length = 1)]
    pub title: String,

    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    #[schema(minimum = 0)]
    pub salary: Option<i32>,

    #[validate(range(min = 0.0, max = 1.0, message = "Equity must be between 0 and 1"))]
    #[schema(minimum = 0, maximum = 1)]
    pub equity: Option<f64>,

    #[validate(length(min = 1, max = 25, message = "Company handle must be between 1 and 25 characters"))]
    #[schema(min_length = 1, max_length = 25)]
    pub company_handle: String,
}

impl CreateJobRequest {
    pub fn into_new_job(self) -> AppResult<NewJob> {
        Ok(NewJob {
            id: self.id,
            title: self.title,
            salary: self.salary,
            equity: self.equity.map(equity_to_decimal).transpose()?,
            company_handle: self.company_handle,
        })
    }
}

/// Request body for partially updating a job.
///
/// Only `title`, `salary` and `equity` may be changed; any other key is
/// rejected. An absent key leaves the column untouched, while an explicit
/// `null` clears `salary` or `equity`. `title` cannot be null.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateJobRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    #[schema(value_type = Option<String>, min_length = 1)]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    #[schema(value_type = Option<i32>, minimum = 0)]
    pub salary: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0.0, max = 1.0, message = "Equity must be between 0 and 1"))]
    #[schema(value_type = Option<f64>, minimum = 0, maximum = 1)]
    pub equity: Option<Option<f64>>,
}

impl UpdateJobRequest {
    pub fn into_changeset(self) -> AppResult<JobChangeset> {
        let title = match self.title {
            Some(None) => {
                return Err(AppError::Validation {
                    field: "title".to_string(),
                    reason: "Title cannot be null".to_string(),
                });
            }
            other => other.flatten(),
        };

        Ok(JobChangeset {
            title,
            salary: self.salary,
            equity: self
                .equity
                .map(|equity| equity.map(equity_to_decimal).transpose())
                .transpose()?,
        })
    }
}

/// Marks a key as present, so `null` becomes `Some(None)` while a missing
/// key stays `None` through `#[serde(default)]`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters for listing jobs.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct JobQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,

    /// Minimum salary
    #[validate(range(min = 0, message = "minSalary cannot be negative"))]
    pub min_salary: Option<i32>,

    /// `true` keeps only jobs with a positive equity
    pub has_equity: Option<bool>,
}

impl From<JobQuery> for JobFilter {
    fn from(query: JobQuery) -> Self {
        JobFilter {
            title: query.title.filter(|t| !t.is_empty()),
            min_salary: query.min_salary,
            has_equity: query.has_equity,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity.and_then(|e| e.to_f64()),
            company_handle: job.company_handle,
        }
    }
}

/// `{"job": {...}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobEnvelope {
    pub job: JobResponse,
}

/// `{"jobs": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobListEnvelope {
    pub jobs: Vec<JobResponse>,
}

/// `{"deleted": id}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: i32,
}

/// Convert through the decimal text form so 0.1 stays 0.1.
fn equity_to_decimal(value: f64) -> AppResult<BigDecimal> {
    BigDecimal::from_str(&value.to_string()).map_err(|e| AppError::Validation {
        field: "equity".to_string(),
        reason: e.to_string(),
    })
}
