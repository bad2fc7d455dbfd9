//! Job repository for async database operations.
//!
//! Provides CRUD operations for the jobs table using diesel_async.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{Job, JobChangeset, JobFilter, NewJob};
use crate::repositories::JobStore;
use crate::schema::jobs;

/// Job repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct JobRepository {
    pool: AsyncDbPool,
}

impl JobRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

/// Build the list query for the given filters, ordered by title then id.
pub(crate) fn filtered_query(filter: &JobFilter) -> jobs::BoxedQuery<'static, Pg> {
    let mut query = jobs::table.into_boxed();

    if let Some(min_salary) = filter.min_salary {
        query = query.filter(jobs::salary.ge(min_salary));
    }

    if filter.has_equity == Some(true) {
        query = query.filter(jobs::equity.gt(BigDecimal::from(0)));
    }

    if let Some(title) = &filter.title {
        query = query.filter(jobs::title.ilike(format!("%{}%", escape_like(title))));
    }

    query.order((jobs::title.asc(), jobs::id.asc()))
}

/// Unique violations name the `jobs` table; report them against the `job`
/// entity like the service's own duplicate check does.
fn insert_error(error: diesel::result::Error) -> AppError {
    match DatabaseErrorConverter::convert_diesel_error(error, "insert job") {
        AppError::Duplicate { field, value, .. } => AppError::Duplicate {
            entity: "job".to_string(),
            field,
            value,
        },
        other => other,
    }
}

/// Escape LIKE wildcards so user input only matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl JobStore for JobRepository {
    async fn exists(&self, job_id: i32) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        diesel::select(diesel::dsl::exists(jobs::table.find(job_id)))
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "check job exists"))
    }

    async fn insert(&self, new_job: NewJob) -> AppResult<Job> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(jobs::table)
            .values(&new_job)
            .returning(Job::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(insert_error)
    }

    async fn find_all(&self, filter: &JobFilter) -> AppResult<Vec<Job>> {
        let mut conn = self.pool.get().await?;

        filtered_query(filter)
            .load::<Job>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list jobs"))
    }

    async fn find_by_id(&self, job_id: i32) -> AppResult<Option<Job>> {
        let mut conn = self.pool.get().await?;

        jobs::table
            .find(job_id)
            .select(Job::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find job by id"))
    }

    async fn find_by_title(&self, job_title: &str) -> AppResult<Option<Job>> {
        let mut conn = self.pool.get().await?;

        jobs::table
            .filter(jobs::title.eq(job_title))
            .order(jobs::id.asc())
            .select(Job::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find job by title"))
    }

    async fn update(&self, job_id: i32, changes: JobChangeset) -> AppResult<Option<Job>> {
        let mut conn = self.pool.get().await?;

        diesel::update(jobs::table.find(job_id))
            .set(&changes)
            .returning(Job::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update job"))
    }

    async fn delete(&self, job_id: i32) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(jobs::table.find(job_id))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete job"))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping database"))
    }
}
