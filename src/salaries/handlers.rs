use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::repo_types::Salary;
use crate::{
    error::{AppError, AppResult},
    search::{Predicate, INVALID_QUERY},
    state::AppState,
};

/// Unlike the job and company searches, `job_title` must match exactly.
#[derive(Debug, Default, Deserialize)]
pub struct SalaryQuery {
    pub job_title: Option<String>,
}

impl SalaryQuery {
    pub fn predicates(&self) -> Vec<Predicate> {
        Predicate::equals(&["job_title"], self.job_title.as_deref())
            .into_iter()
            .collect()
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/salaries", get(list_salaries))
}

#[instrument(skip(state, query))]
pub async fn list_salaries(
    State(state): State<AppState>,
    query: Result<Query<SalaryQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Salary>>> {
    let Query(q) = query.map_err(|e| AppError::rejected(INVALID_QUERY, e))?;
    debug!(query = ?q, "salary search");
    let salaries = state.store.find_salaries(&q.predicates()).await?;
    Ok(Json(salaries))
}
