use serde::{Deserialize, Serialize};

use super::repo_types::JobApplication;
use crate::search::Predicate;

/// `GET /jobs` search parameters; all substring, case-insensitive.
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    pub job_name: Option<String>,
    pub location: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
}

impl JobQuery {
    pub fn predicates(&self) -> Vec<Predicate> {
        [
            Predicate::contains(&["title"], self.job_name.as_deref()),
            Predicate::contains(&["location"], self.location.as_deref()),
            Predicate::contains(&["company_name"], self.company_name.as_deref()),
            Predicate::contains(&["industry"], self.industry.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub message: &'static str,
    #[serde(rename = "jobApplication")]
    pub job_application: JobApplication,
}
