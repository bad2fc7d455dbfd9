//! Job request handlers.
//!
//! Reads are public. Create, update and delete require a bearer token whose
//! claims carry the admin flag.

use axum::{Extension, Json, extract::State, http::StatusCode, middleware};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::JOB_TAG;
use crate::api::dto::{
    CreateJobRequest, DeletedResponse, ErrorResponse, JobEnvelope, JobListEnvelope, JobQuery,
    JobResponse, UpdateJobRequest,
};
use crate::api::middleware::{AuthUser, admin_middleware, auth_middleware};
use crate::error::{AppError, AppResult};
use crate::models::JobFilter;
use crate::state::AppState;
use crate::utils::{PathParam, ValidatedJson, ValidatedQuery};

/// Creates job-related routes.
///
/// The state is needed up front so the auth layer can read the JWT secret.
pub fn job_routes(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(list_jobs))
        .routes(routes!(get_job));

    let admin = OpenApiRouter::new()
        .routes(routes!(create_job))
        .routes(routes!(update_job))
        .routes(routes!(delete_job))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(admin)
}

/// GET /api/jobs - List jobs, optionally filtered
#[utoipa::path(
    get,
    path = "/",
    tag = JOB_TAG,
    params(JobQuery),
    responses(
        (status = 200, description = "Jobs ordered by title", body = JobListEnvelope),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "No job matches (only when configured)", body = ErrorResponse)
    )
)]
async fn list_jobs(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<JobQuery>,
) -> AppResult<Json<JobListEnvelope>> {
    let filter = JobFilter::from(query);
    let jobs = state.services.jobs.list_jobs(filter).await?;

    if jobs.is_empty() && state.api_config.empty_list_not_found {
        return Err(AppError::not_found("job", "filter", "any"));
    }

    Ok(Json(JobListEnvelope {
        jobs: jobs.into_iter().map(JobResponse::from).collect(),
    }))
}

/// POST /api/jobs - Create a job
#[utoipa::path(
    post,
    path = "/",
    tag = JOB_TAG,
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobEnvelope),
        (status = 400, description = "Invalid body or duplicate id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateJobRequest>,
) -> AppResult<(StatusCode, Json<JobEnvelope>)> {
    tracing::debug!(username = %user.username, job_id = req.id, "Creating job");
    let job = state.services.jobs.create_job(req.into_new_job()?).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobEnvelope {
            job: JobResponse::from(job),
        }),
    ))
}

/// GET /api/jobs/{id} - Get a job by id, or by exact title
///
/// A key made only of an integer is looked up as the id first, falling back
/// to titles when no job has that id; anything else is matched against
/// titles.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = JOB_TAG,
    params(
        ("id" = String, Path, description = "Job id, or the job's exact title")
    ),
    responses(
        (status = 200, description = "Job found", body = JobEnvelope),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
async fn get_job(
    State(state): State<AppState>,
    PathParam(key): PathParam<String>,
) -> AppResult<Json<JobEnvelope>> {
    let jobs = &state.services.jobs;
    let job = match key.parse::<i32>() {
        Ok(id) => match jobs.get_job(id).await {
            Err(AppError::NotFound { .. }) => jobs.get_job_by_title(&key).await?,
            found => found?,
        },
        Err(_) => jobs.get_job_by_title(&key).await?,
    };

    Ok(Json(JobEnvelope {
        job: JobResponse::from(job),
    }))
}

/// PATCH /api/jobs/{id} - Partially update a job
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = JOB_TAG,
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = JobEnvelope),
        (status = 400, description = "Invalid, empty or unknown fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
    ValidatedJson(req): ValidatedJson<UpdateJobRequest>,
) -> AppResult<Json<JobEnvelope>> {
    tracing::debug!(username = %user.username, job_id = id, "Updating job");
    let job = state
        .services
        .jobs
        .update_job(id, req.into_changeset()?)
        .await?;

    Ok(Json(JobEnvelope {
        job: JobResponse::from(job),
    }))
}

/// DELETE /api/jobs/{id} - Delete a job
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = JOB_TAG,
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted", body = DeletedResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<DeletedResponse>> {
    tracing::debug!(username = %user.username, job_id = id, "Deleting job");
    state.services.jobs.delete_job(id).await?;
    Ok(Json(DeletedResponse { deleted: id }))
}
