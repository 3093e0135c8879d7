//! Data models for the document register.

mod document;

pub use document::{
    parse_issued_date, Document, NewDocument, UploadError, UploadRequest, ValidatedUpload,
};
