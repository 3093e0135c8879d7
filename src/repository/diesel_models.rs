//! Diesel ORM models for the documents table.

use diesel::prelude::*;

use crate::schema;

/// Document row from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentRecord {
    pub id: i64,
    pub number: String,
    pub doc_type: String,
    pub name: String,
    pub file_path: String,
    pub issued_date: Option<String>,
    pub created_at: String,
    pub file_size: i64,
    pub file_name_original: String,
}

/// New document row for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::documents)]
pub struct NewDocumentRecord<'a> {
    pub number: &'a str,
    pub doc_type: &'a str,
    pub name: &'a str,
    pub file_path: &'a str,
    pub issued_date: Option<String>,
    pub created_at: String,
    pub file_size: i64,
    pub file_name_original: &'a str,
}
