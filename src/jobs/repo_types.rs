use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Job posting fields. Field names follow the documents the client was built against.
/// `company_name` is a denormalized copy of the company's name, not a reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct NewJob {
    #[serde(rename = "Job Title", default)]
    pub title: String,
    #[serde(rename = "Job Description")]
    pub description: Option<String>,
    #[serde(rename = "Salary Estimate")]
    pub salary_estimate: Option<String>,
    #[serde(rename = "Company Name", default)]
    pub company_name: String,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Headquarters")]
    pub headquarters: Option<String>,
    #[serde(rename = "Size")]
    pub size: Option<String>,
    #[serde(rename = "Founded")]
    pub founded: Option<i32>,
    #[serde(rename = "Type of ownership")]
    pub ownership: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "Revenue")]
    pub revenue: Option<String>,
    #[serde(rename = "Competitors")]
    pub competitors: Option<String>,
    #[serde(rename = "Rating")]
    pub rating: Option<f64>,
    #[serde(rename = "Easy Apply", default)]
    pub easy_apply: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: NewJob,
}

/// Validated application, resume path not yet known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub job_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position_applied: String,
    pub cover_letter: String,
    pub interview_date: String,
    pub resume: String,
}

/// `job_id` is an opaque reference; nothing checks that the job exists.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "job_id")]
    pub job_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position_applied: String,
    pub cover_letter: String,
    pub interview_date: String,
    pub resume: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
