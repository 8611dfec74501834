//! In-memory record store and request helpers for handler tests.

use std::{path::Path, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::repo_types::{NewUser, User},
    companies::repo_types::{Company, NewCompany},
    config::{AppConfig, Environment, JwtConfig},
    db::{RecordStore, StoreError, StoreResult},
    jobs::repo_types::{Job, JobApplication, NewJob, NewJobApplication},
    salaries::repo_types::{NewSalary, Salary},
    search::{Predicate, TextMatch},
    state::AppState,
    storage::{ContentStore, LocalDiskStorage},
};

impl TextMatch {
    fn matches(&self, value: &str) -> bool {
        match self {
            TextMatch::Contains(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
            TextMatch::Equals(expected) => value == expected,
        }
    }
}

fn filter<T: Clone>(
    rows: &[T],
    predicates: &[Predicate],
    column: for<'a> fn(&'a T, &str) -> Option<&'a str>,
) -> Vec<T> {
    rows.iter()
        .filter(|row| {
            predicates.iter().all(|p| {
                p.columns
                    .iter()
                    .any(|c| column(row, c).is_some_and(|v| p.matcher.matches(v)))
            })
        })
        .cloned()
        .collect()
}

fn job_column<'a>(job: &'a Job, column: &str) -> Option<&'a str> {
    let f = &job.fields;
    match column {
        "title" => Some(&f.title),
        "company_name" => Some(&f.company_name),
        "location" => f.location.as_deref(),
        "industry" => f.industry.as_deref(),
        _ => None,
    }
}

fn company_column<'a>(company: &'a Company, column: &str) -> Option<&'a str> {
    let f = &company.fields;
    match column {
        "company_name" => Some(&f.company_name),
        "city" => f.city.as_deref(),
        "state" => f.state.as_deref(),
        "country" => f.country.as_deref(),
        "industry" => f.industry.as_deref(),
        _ => None,
    }
}

fn salary_column<'a>(salary: &'a Salary, column: &str) -> Option<&'a str> {
    match column {
        "job_title" => Some(&salary.fields.job_title),
        _ => None,
    }
}

#[derive(Default)]
struct Collections {
    jobs: Vec<Job>,
    companies: Vec<Company>,
    salaries: Vec<Salary>,
    users: Vec<User>,
    applications: Vec<JobApplication>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Collections>,
    fail_reads: bool,
    fail_applications: bool,
    blind_user_lookup: bool,
}

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

impl MemoryStore {
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_applications() -> Self {
        Self {
            fail_applications: true,
            ..Self::default()
        }
    }

    /// Email lookups always miss, so a duplicate is only caught by `insert_user`,
    /// as when two registrations race.
    pub fn racing_registrations() -> Self {
        Self {
            blind_user_lookup: true,
            ..Self::default()
        }
    }

    pub fn push_job(&self, job: NewJob) {
        self.data.lock().unwrap().jobs.push(Job {
            id: Uuid::new_v4(),
            fields: job,
        });
    }

    pub fn push_company(&self, company: NewCompany) {
        self.data.lock().unwrap().companies.push(Company {
            id: Uuid::new_v4(),
            fields: company,
        });
    }

    pub fn push_salary(&self, salary: NewSalary) {
        self.data.lock().unwrap().salaries.push(Salary {
            id: Uuid::new_v4(),
            fields: salary,
        });
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.data.lock().unwrap().jobs.clone()
    }

    pub fn companies(&self) -> Vec<Company> {
        self.data.lock().unwrap().companies.clone()
    }

    pub fn salaries(&self) -> Vec<Salary> {
        self.data.lock().unwrap().salaries.clone()
    }

    pub fn applications(&self) -> Vec<JobApplication> {
        self.data.lock().unwrap().applications.clone()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.data
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn users(&self) -> Vec<User> {
        self.data.lock().unwrap().users.clone()
    }

    pub fn user_count(&self) -> usize {
        self.data.lock().unwrap().users.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_jobs(&self, predicates: &[Predicate]) -> StoreResult<Vec<Job>> {
        if self.fail_reads {
            return Err(unavailable());
        }
        Ok(filter(&self.data.lock().unwrap().jobs, predicates, job_column))
    }

    async fn insert_job(&self, job: &NewJob) -> StoreResult<Job> {
        let job = Job {
            id: Uuid::new_v4(),
            fields: job.clone(),
        };
        self.data.lock().unwrap().jobs.push(job.clone());
        Ok(job)
    }

    async fn insert_application(&self, app: &NewJobApplication) -> StoreResult<JobApplication> {
        if self.fail_applications {
            return Err(unavailable());
        }
        let saved = JobApplication {
            id: Uuid::new_v4(),
            job_id: app.job_id.clone(),
            first_name: app.first_name.clone(),
            last_name: app.last_name.clone(),
            email: app.email.clone(),
            phone: app.phone.clone(),
            position_applied: app.position_applied.clone(),
            cover_letter: app.cover_letter.clone(),
            interview_date: app.interview_date.clone(),
            resume: app.resume.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.data.lock().unwrap().applications.push(saved.clone());
        Ok(saved)
    }

    async fn find_companies(&self, predicates: &[Predicate]) -> StoreResult<Vec<Company>> {
        if self.fail_reads {
            return Err(unavailable());
        }
        Ok(filter(&self.data.lock().unwrap().companies, predicates, company_column))
    }

    async fn insert_company(&self, company: &NewCompany) -> StoreResult<Company> {
        let company = Company {
            id: Uuid::new_v4(),
            fields: company.clone(),
        };
        self.data.lock().unwrap().companies.push(company.clone());
        Ok(company)
    }

    async fn find_salaries(&self, predicates: &[Predicate]) -> StoreResult<Vec<Salary>> {
        if self.fail_reads {
            return Err(unavailable());
        }
        Ok(filter(&self.data.lock().unwrap().salaries, predicates, salary_column))
    }

    async fn insert_salary(&self, salary: &NewSalary) -> StoreResult<Salary> {
        let salary = Salary {
            id: Uuid::new_v4(),
            fields: salary.clone(),
        };
        self.data.lock().unwrap().salaries.push(salary.clone());
        Ok(salary)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        if self.fail_reads {
            return Err(unavailable());
        }
        if self.blind_user_lookup {
            return Ok(None);
        }
        Ok(self.user(email))
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        let mut data = self.data.lock().unwrap();
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        let saved = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: OffsetDateTime::now_utc(),
        };
        data.users.push(saved.clone());
        Ok(saved)
    }

    async fn clear_all(&self) -> StoreResult<()> {
        *self.data.lock().unwrap() = Collections::default();
        Ok(())
    }
}

pub fn config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        host: "127.0.0.1".into(),
        port: 0,
        database_url: "postgres://unused".into(),
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 60,
        },
        client_origin: None,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
    }
}

pub async fn state_with(config: AppConfig, store: Arc<dyn RecordStore>) -> AppState {
    let content = Arc::new(
        LocalDiskStorage::new(&config.upload_dir)
            .await
            .expect("upload dir"),
    ) as Arc<dyn ContentStore>;
    AppState::from_parts(Arc::new(config), store, content)
}

/// Full router over `store`, uploads going to a fresh temp dir kept alive by the caller.
pub async fn app(store: Arc<dyn RecordStore>) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = state_with(config(dir.path()), store).await;
    (build_app(state).expect("router"), dir)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("infallible");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// POST with an arbitrary body and optional content type.
pub async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut req = Request::post(uri);
    if let Some(ct) = content_type {
        req = req.header(header::CONTENT_TYPE, ct);
    }
    send(app, req.body(Body::from(body.to_string())).unwrap()).await
}

const BOUNDARY: &str = "talentsync-test-boundary";

/// Builds a multipart/form-data POST; `file` is (file name, content type, bytes) for `resume`.
pub fn multipart(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}
