use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// `agency` is the employer's name as free text, like `Job::company_name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct NewSalary {
    #[serde(rename = "Id")]
    pub external_id: Option<i64>,
    pub employee_name: String,
    pub job_title: String,
    pub base_pay: Option<f64>,
    pub overtime_pay: Option<f64>,
    pub other_pay: Option<f64>,
    pub total_pay: Option<f64>,
    pub total_pay_benefits: Option<f64>,
    pub year: Option<i32>,
    pub agency: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Salary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: NewSalary,
}
