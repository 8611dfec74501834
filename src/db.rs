use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{
    auth::repo_types::{NewUser, User},
    companies::{
        self,
        repo_types::{Company, NewCompany},
    },
    jobs::{
        self,
        repo_types::{Job, JobApplication, NewJob, NewJobApplication},
    },
    salaries::{
        self,
        repo_types::{NewSalary, Salary},
    },
    search::Predicate,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for a unique field")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Database(e),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Access to the persisted collections. Each call is independent; there are no
/// multi-collection transactions except `clear_all`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_jobs(&self, predicates: &[Predicate]) -> StoreResult<Vec<Job>>;
    async fn insert_job(&self, job: &NewJob) -> StoreResult<Job>;
    async fn insert_application(&self, app: &NewJobApplication) -> StoreResult<JobApplication>;

    async fn find_companies(&self, predicates: &[Predicate]) -> StoreResult<Vec<Company>>;
    async fn insert_company(&self, company: &NewCompany) -> StoreResult<Company>;

    async fn find_salaries(&self, predicates: &[Predicate]) -> StoreResult<Vec<Salary>>;
    async fn insert_salary(&self, salary: &NewSalary) -> StoreResult<Salary>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User>;

    /// Empties every collection. Used by seeding only.
    async fn clear_all(&self) -> StoreResult<()>;
}

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_jobs(&self, predicates: &[Predicate]) -> StoreResult<Vec<Job>> {
        Ok(jobs::repo::find(&self.db, predicates).await?)
    }

    async fn insert_job(&self, job: &NewJob) -> StoreResult<Job> {
        Ok(jobs::repo::insert(&self.db, job).await?)
    }

    async fn insert_application(&self, app: &NewJobApplication) -> StoreResult<JobApplication> {
        Ok(jobs::repo::insert_application(&self.db, app).await?)
    }

    async fn find_companies(&self, predicates: &[Predicate]) -> StoreResult<Vec<Company>> {
        Ok(companies::repo::find(&self.db, predicates).await?)
    }

    async fn insert_company(&self, company: &NewCompany) -> StoreResult<Company> {
        Ok(companies::repo::insert(&self.db, company).await?)
    }

    async fn find_salaries(&self, predicates: &[Predicate]) -> StoreResult<Vec<Salary>> {
        Ok(salaries::repo::find(&self.db, predicates).await?)
    }

    async fn insert_salary(&self, salary: &NewSalary) -> StoreResult<Salary> {
        Ok(salaries::repo::insert(&self.db, salary).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.db, email).await?)
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        Ok(User::create(&self.db, user).await?)
    }

    async fn clear_all(&self) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        for table in ["job_applications", "jobs", "salaries", "companies", "users"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
