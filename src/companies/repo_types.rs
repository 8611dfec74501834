use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct NewCompany {
    pub company_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub employees: Option<i64>,
    pub founded: Option<i32>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "GrowjoRanking")]
    pub growjo_ranking: Option<i64>,
    #[serde(rename = "PreviousRanking")]
    pub previous_ranking: Option<i64>,
    pub estimated_revenues: Option<f64>,
    pub job_openings: Option<i64>,
    pub keywords: Option<String>,
    #[serde(rename = "LeadInvestors")]
    pub lead_investors: Option<String>,
    pub btype: Option<String>,
    /// Numeric valuation; `total_funding` is the display string.
    pub valuation: Option<f64>,
    pub total_funding: Option<String>,
    pub growth_percentage: Option<String>,
    pub url: Option<String>,
    pub linkedin_url: Option<String>,
    pub product_url: Option<String>,
    pub indeed_url: Option<String>,
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: NewCompany,
}
