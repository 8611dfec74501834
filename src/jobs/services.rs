use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::repo_types::{JobApplication, NewJobApplication};
use crate::{
    db::RecordStore,
    error::{AppError, AppResult},
    storage::ContentStore,
};

pub const ACCEPTED_RESUME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const INCOMPLETE_MESSAGE: &str =
    "Please complete all required fields before submitting your application.";

pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Raw multipart submission, before any validation.
#[derive(Default)]
pub struct ApplicationForm {
    pub job_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position_applied: Option<String>,
    pub cover_letter: Option<String>,
    pub interview_date: Option<String>,
    pub resume: Option<ResumeUpload>,
}

impl ApplicationForm {
    /// Returns false for field names the form does not know.
    pub fn set_text(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "job_id" => &mut self.job_id,
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "positionApplied" => &mut self.position_applied,
            "coverLetter" => &mut self.cover_letter,
            "interviewDate" => &mut self.interview_date,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

struct ValidApplication {
    application: NewJobApplication,
    file_name: Option<String>,
    content_type: &'static str,
    body: Bytes,
}

fn validate(form: ApplicationForm) -> AppResult<ValidApplication> {
    let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();

    let application = NewJobApplication {
        job_id: trimmed(form.job_id),
        first_name: trimmed(form.first_name),
        last_name: trimmed(form.last_name),
        email: trimmed(form.email),
        phone: trimmed(form.phone),
        position_applied: trimmed(form.position_applied),
        cover_letter: trimmed(form.cover_letter),
        interview_date: trimmed(form.interview_date),
        resume: String::new(),
    };

    let mut missing: Vec<&'static str> = [
        ("job_id", &application.job_id),
        ("firstName", &application.first_name),
        ("lastName", &application.last_name),
        ("email", &application.email),
        ("phone", &application.phone),
        ("positionApplied", &application.position_applied),
        ("coverLetter", &application.cover_letter),
        ("interviewDate", &application.interview_date),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.is_empty().then_some(name))
    .collect();

    let resume = form.resume.filter(|r| !r.body.is_empty());
    let resume = match resume {
        Some(r) if missing.is_empty() => r,
        r => {
            if r.is_none() {
                missing.push("resume");
            }
            return Err(AppError::missing_fields(INCOMPLETE_MESSAGE, missing));
        }
    };

    let declared = resume
        .content_type
        .as_deref()
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();
    let content_type = ACCEPTED_RESUME_TYPES
        .iter()
        .copied()
        .find(|accepted| *accepted == declared)
        .ok_or_else(|| {
            warn!(content_type = %declared, "rejected resume type");
            AppError::bad_request("Resume must be a PDF or Word document.")
        })?;

    Ok(ValidApplication {
        application,
        file_name: resume.file_name,
        content_type,
        body: resume.body,
    })
}

/// Upload time in milliseconds, a dash, then the client's file name.
/// Two uploads with the same name in the same millisecond share a key.
pub fn object_name(uploaded_at: OffsetDateTime, file_name: Option<&str>) -> String {
    let millis = uploaded_at.unix_timestamp_nanos() / 1_000_000;
    format!("{millis}-{}", sanitize_file_name(file_name))
}

fn sanitize_file_name(raw: Option<&str>) -> String {
    let base = raw
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        "resume".to_string()
    } else {
        truncate_keeping_extension(base)
    }
}

/// Keeps `{millis}-{name}` under the usual 255-byte file name limit.
const MAX_FILE_NAME_BYTES: usize = 200;
const MAX_EXTENSION_BYTES: usize = 16;

fn truncate_keeping_extension(name: &str) -> String {
    if name.len() <= MAX_FILE_NAME_BYTES {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_BYTES => name.split_at(dot),
        _ => (name, ""),
    };
    let mut end = MAX_FILE_NAME_BYTES - ext.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{ext}", &stem[..end])
}

/// Validates the submission, stores the resume, then inserts the record.
/// If the insert fails the stored resume is removed again.
pub async fn submit_application(
    store: &dyn RecordStore,
    content: &dyn ContentStore,
    form: ApplicationForm,
    now: OffsetDateTime,
) -> AppResult<JobApplication> {
    let ValidApplication {
        mut application,
        file_name,
        content_type,
        body,
    } = validate(form)?;

    let key = object_name(now, file_name.as_deref());
    application.resume = content
        .put_object(&key, body, content_type)
        .await
        .context("store resume")?;

    match store.insert_application(&application).await {
        Ok(saved) => {
            info!(application_id = %saved.id, job_id = %saved.job_id, "application submitted");
            Ok(saved)
        }
        Err(e) => {
            if let Err(cleanup) = content.delete_object(&key).await {
                error!(error = ?cleanup, key, "failed to remove resume after insert failure");
            }
            Err(anyhow::Error::new(e).context("insert job application").into())
        }
    }
}
