//! Document records and upload validation.
//!
//! A document is one uploaded file plus the metadata entered for it: the
//! official number, the type label, a display name and the issue date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Database row ID.
    pub id: i64,
    /// Official document number, e.g. `45/2024`.
    pub number: String,
    /// Type label, e.g. `Công văn`.
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Display name.
    pub name: String,
    /// Public path of the stored file (`/uploads/...`).
    pub file_path: String,
    /// Date the document was officially issued, if known.
    pub issued_date: Option<NaiveDate>,
    /// When the document was uploaded.
    pub created_at: DateTime<Utc>,
    /// Size of the stored file in bytes.
    pub file_size: i64,
    /// Filename as uploaded by the client.
    pub file_name_original: String,
}

impl Document {
    /// Year of the issue date, if any.
    pub fn issued_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.issued_date.map(|d| d.year())
    }
}

/// A document ready for insertion. The database assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub number: String,
    pub doc_type: String,
    pub name: String,
    pub file_path: String,
    pub issued_date: Option<NaiveDate>,
    pub file_size: i64,
    pub file_name_original: String,
}

impl NewDocument {
    /// Combine validated form fields with the stored file's details.
    pub fn from_upload(
        fields: ValidatedUpload,
        file_path: String,
        file_size: i64,
        file_name_original: String,
    ) -> Self {
        Self {
            number: fields.number,
            doc_type: fields.doc_type,
            name: fields.name,
            file_path,
            issued_date: fields.issued_date,
            file_size,
            file_name_original,
        }
    }
}

/// Errors rejecting an upload before anything is stored.
///
/// Messages are shown verbatim to users.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Thiếu file")]
    MissingFile,

    #[error("Thiếu thông tin bắt buộc")]
    MissingFields,

    #[error("Ngày không hợp lệ")]
    InvalidDate(String),
}

/// Raw metadata fields as submitted with an upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadRequest {
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub name: Option<String>,
    pub issued_date: Option<String>,
}

/// Upload metadata after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub number: String,
    pub doc_type: String,
    pub name: String,
    pub issued_date: Option<NaiveDate>,
}

impl UploadRequest {
    /// Trim the required fields and parse the issue date.
    pub fn validate(self) -> Result<ValidatedUpload, UploadError> {
        let number = required(self.number)?;
        let doc_type = required(self.doc_type)?;
        let name = required(self.name)?;
        let issued_date = match self.issued_date {
            Some(raw) => parse_issued_date(&raw)?,
            None => None,
        };

        Ok(ValidatedUpload {
            number,
            doc_type,
            name,
            issued_date,
        })
    }
}

fn required(value: Option<String>) -> Result<String, UploadError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(UploadError::MissingFields)
}

/// Parse an issue date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Blank input means "no date". Timestamps are reduced to their UTC date.
pub fn parse_issued_date(raw: &str) -> Result<Option<NaiveDate>, UploadError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| UploadError::InvalidDate(raw.to_string()))
}
