use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::repo_types::{NewSalary, Salary};
use crate::search::{push_where, Predicate};

const SALARY_COLUMNS: &str = "id, external_id, employee_name, job_title, base_pay, overtime_pay, \
     other_pay, total_pay, total_pay_benefits, year, agency";

pub async fn find(db: &PgPool, predicates: &[Predicate]) -> Result<Vec<Salary>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {SALARY_COLUMNS} FROM salaries"));
    push_where(&mut qb, predicates);
    qb.push(" ORDER BY created_at, id");
    qb.build_query_as::<Salary>().fetch_all(db).await
}

pub async fn insert(db: &PgPool, s: &NewSalary) -> Result<Salary, sqlx::Error> {
    sqlx::query_as::<_, Salary>(&format!(
        r#"
        INSERT INTO salaries ({SALARY_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {SALARY_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(s.external_id)
    .bind(&s.employee_name)
    .bind(&s.job_title)
    .bind(s.base_pay)
    .bind(s.overtime_pay)
    .bind(s.other_pay)
    .bind(s.total_pay)
    .bind(s.total_pay_benefits)
    .bind(s.year)
    .bind(&s.agency)
    .fetch_one(db)
    .await
}
