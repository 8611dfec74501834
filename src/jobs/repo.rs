use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::repo_types::{Job, JobApplication, NewJob, NewJobApplication};
use crate::search::{push_where, Predicate};

const JOB_COLUMNS: &str = "id, title, description, salary_estimate, company_name, location, \
     headquarters, size, founded, ownership, industry, sector, revenue, competitors, rating, easy_apply";

pub async fn find(db: &PgPool, predicates: &[Predicate]) -> Result<Vec<Job>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
    push_where(&mut qb, predicates);
    qb.push(" ORDER BY created_at, id");
    qb.build_query_as::<Job>().fetch_all(db).await
}

pub async fn insert(db: &PgPool, job: &NewJob) -> Result<Job, sqlx::Error> {
    sqlx::query_as::<_, Job>(&format!(
        r#"
        INSERT INTO jobs (id, title, description, salary_estimate, company_name, location,
                          headquarters, size, founded, ownership, industry, sector, revenue,
                          competitors, rating, easy_apply)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.salary_estimate)
    .bind(&job.company_name)
    .bind(&job.location)
    .bind(&job.headquarters)
    .bind(&job.size)
    .bind(job.founded)
    .bind(&job.ownership)
    .bind(&job.industry)
    .bind(&job.sector)
    .bind(&job.revenue)
    .bind(&job.competitors)
    .bind(job.rating)
    .bind(job.easy_apply)
    .fetch_one(db)
    .await
}

pub async fn insert_application(
    db: &PgPool,
    app: &NewJobApplication,
) -> Result<JobApplication, sqlx::Error> {
    sqlx::query_as::<_, JobApplication>(
        r#"
        INSERT INTO job_applications (id, job_id, first_name, last_name, email, phone,
                                      position_applied, cover_letter, interview_date, resume)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, job_id, first_name, last_name, email, phone, position_applied,
                  cover_letter, interview_date, resume, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&app.job_id)
    .bind(&app.first_name)
    .bind(&app.last_name)
    .bind(&app.email)
    .bind(&app.phone)
    .bind(&app.position_applied)
    .bind(&app.cover_letter)
    .bind(&app.interview_date)
    .bind(&app.resume)
    .fetch_one(db)
    .await
}
