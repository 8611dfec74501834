use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::repo_types::Company;
use crate::{
    error::{AppError, AppResult},
    search::{Predicate, INVALID_QUERY},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct CompanyQuery {
    pub company_name: Option<String>,
    /// Matches country, city or state.
    pub location: Option<String>,
    pub industry: Option<String>,
}

impl CompanyQuery {
    pub fn predicates(&self) -> Vec<Predicate> {
        [
            Predicate::contains(&["company_name"], self.company_name.as_deref()),
            Predicate::contains(&["country", "city", "state"], self.location.as_deref()),
            Predicate::contains(&["industry"], self.industry.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/companies", get(list_companies))
}

#[instrument(skip(state, query))]
pub async fn list_companies(
    State(state): State<AppState>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Company>>> {
    let Query(q) = query.map_err(|e| AppError::rejected(INVALID_QUERY, e))?;
    debug!(query = ?q, "company search");
    let companies = state.store.find_companies(&q.predicates()).await?;
    Ok(Json(companies))
}
