use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{ApplicationResponse, JobQuery},
    repo_types::{Job, NewJob},
    services::{self, ApplicationForm, ResumeUpload},
};
use crate::{
    error::{AppError, AppResult},
    search::INVALID_QUERY,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/jobs", get(list_jobs))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route("/jobs", post(create_job)).route(
        "/jobs/apply",
        post(apply).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

#[instrument(skip(state, query))]
pub async fn list_jobs(
    State(state): State<AppState>,
    query: Result<Query<JobQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Job>>> {
    let Query(q) = query.map_err(|e| AppError::rejected(INVALID_QUERY, e))?;
    debug!(query = ?q, "job search");
    let jobs = state.store.find_jobs(&q.predicates()).await?;
    Ok(Json(jobs))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Job>)> {
    let Json(mut job) = payload.map_err(|e| AppError::rejected("Error creating job", e))?;

    job.title = job.title.trim().to_string();
    job.company_name = job.company_name.trim().to_string();
    let missing: Vec<&'static str> = [("Job Title", &job.title), ("Company Name", &job.company_name)]
        .into_iter()
        .filter_map(|(name, v)| v.is_empty().then_some(name))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::missing_fields("Error creating job", missing));
    }

    let job = state.store.insert_job(&job).await?;
    info!(job_id = %job.id, "job created");
    Ok((StatusCode::CREATED, Json(job)))
}

fn upload_error(e: MultipartError) -> AppError {
    warn!(error = %e, "multipart read failed");
    AppError::bad_request("Error uploading file")
}

/// POST /jobs/apply (multipart): text fields plus one `resume` file part.
#[instrument(skip(state, mp))]
pub async fn apply(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApplicationResponse>)> {
    let mut mp = mp.map_err(|e| {
        warn!(error = %e, "not a multipart body");
        AppError::bad_request("Error uploading file")
    })?;

    let mut form = ApplicationForm::default();
    while let Some(field) = mp.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let body = field.bytes().await.map_err(upload_error)?;
            form.resume = Some(ResumeUpload {
                file_name,
                content_type,
                body,
            });
        } else {
            let value = field.text().await.map_err(upload_error)?;
            if !form.set_text(&name, value) {
                warn!(field = %name, "ignoring unknown application field");
            }
        }
    }

    let job_application = services::submit_application(
        state.store.as_ref(),
        state.content.as_ref(),
        form,
        OffsetDateTime::now_utc(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            message: "Application submitted successfully",
            job_application,
        }),
    ))
}
