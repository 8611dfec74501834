use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::repo_types::{Company, NewCompany};
use crate::search::{push_where, Predicate};

const COMPANY_COLUMNS: &str = "id, company_name, city, state, country, employees, founded, \
     industry, growjo_ranking, previous_ranking, estimated_revenues, job_openings, keywords, \
     lead_investors, btype, valuation, total_funding, growth_percentage, url, linkedin_url, \
     product_url, indeed_url, contact_info";

pub async fn find(db: &PgPool, predicates: &[Predicate]) -> Result<Vec<Company>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COMPANY_COLUMNS} FROM companies"));
    push_where(&mut qb, predicates);
    qb.push(" ORDER BY created_at, id");
    qb.build_query_as::<Company>().fetch_all(db).await
}

pub async fn insert(db: &PgPool, c: &NewCompany) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        r#"
        INSERT INTO companies ({COMPANY_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23)
        RETURNING {COMPANY_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&c.company_name)
    .bind(&c.city)
    .bind(&c.state)
    .bind(&c.country)
    .bind(c.employees)
    .bind(c.founded)
    .bind(&c.industry)
    .bind(c.growjo_ranking)
    .bind(c.previous_ranking)
    .bind(c.estimated_revenues)
    .bind(c.job_openings)
    .bind(&c.keywords)
    .bind(&c.lead_investors)
    .bind(&c.btype)
    .bind(c.valuation)
    .bind(&c.total_funding)
    .bind(&c.growth_percentage)
    .bind(&c.url)
    .bind(&c.linkedin_url)
    .bind(&c.product_url)
    .bind(&c.indeed_url)
    .bind(&c.contact_info)
    .fetch_one(db)
    .await
}
