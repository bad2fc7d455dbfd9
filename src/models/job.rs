use bigdecimal::BigDecimal;
use diesel::prelude::*;

/// Job row as stored in the `jobs` table
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

/// NewJob model for inserting new records.
///
/// The id is supplied by the caller, not generated.
#[derive(Debug, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::jobs)]
pub struct NewJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

/// Partial update of a job. `None` fields are left untouched; `Some(None)`
/// on a nullable column writes NULL.
///
/// `id` and `company_handle` are deliberately absent.
#[derive(Debug, AsChangeset, Clone, Default, PartialEq)]
#[diesel(table_name = crate::schema::jobs)]
pub struct JobChangeset {
    pub title: Option<String>,
    pub salary: Option<Option<i32>>,
    pub equity: Option<Option<BigDecimal>>,
}

impl JobChangeset {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.salary.is_none() && self.equity.is_none()
    }
}

/// Optional filters for listing jobs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Only jobs paying at least this much
    pub min_salary: Option<i32>,
    /// `Some(true)` keeps jobs with a positive equity; `Some(false)` is no filter
    pub has_equity: Option<bool>,
}

impl From<NewJob> for Job {
    fn from(new_job: NewJob) -> Self {
        Job {
            id: new_job.id,
            title: new_job.title,
            salary: new_job.salary,
            equity: new_job.equity,
            company_handle: new_job.company_handle,
        }
    }
}
