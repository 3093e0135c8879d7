//! Diesel-based document repository for SQLite.
//!
//! Uses diesel-async's SyncConnectionWrapper for async SQLite support.

use chrono::{NaiveDate, SecondsFormat, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{DocumentRecord, NewDocumentRecord};
use super::parse_datetime;
use super::pool::{AsyncSqlitePool, DieselError};
use crate::models::{Document, NewDocument};
use crate::schema::documents;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Document repository with compile-time checked queries.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: AsyncSqlitePool,
}

impl DieselDocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// All documents, newest upload first.
    pub async fn list(&self) -> Result<Vec<Document>, DieselError> {
        let mut conn = self.pool.get().await?;

        let records: Vec<DocumentRecord> = documents::table
            .select(DocumentRecord::as_select())
            .order((documents::created_at.desc(), documents::id.desc()))
            .load(&mut conn)
            .await?;

        Ok(records.into_iter().map(Self::record_to_document).collect())
    }

    /// Get a document by ID.
    pub async fn get(&self, id: i64) -> Result<Option<Document>, DieselError> {
        let mut conn = self.pool.get().await?;

        documents::table
            .find(id)
            .select(DocumentRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Self::record_to_document))
    }

    /// Count all documents.
    pub async fn count(&self) -> Result<u64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count: i64 = documents::table
            .select(count_star())
            .first(&mut conn)
            .await?;

        Ok(count as u64)
    }

    /// Insert a document and return its new ID.
    pub async fn insert(&self, doc: &NewDocument) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        // Fixed-width timestamps keep text ordering chronological.
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let record = NewDocumentRecord {
            number: &doc.number,
            doc_type: &doc.doc_type,
            name: &doc.name,
            file_path: &doc.file_path,
            issued_date: doc.issued_date.map(|d| d.format(DATE_FORMAT).to_string()),
            created_at,
            file_size: doc.file_size,
            file_name_original: &doc.file_name_original,
        };

        diesel::insert_into(documents::table)
            .values(&record)
            .execute(&mut conn)
            .await?;

        let row: LastInsertRowId = diesel::sql_query("SELECT last_insert_rowid() AS id")
            .get_result(&mut conn)
            .await?;

        tracing::debug!(id = row.id, number = %doc.number, "Inserted document");
        Ok(row.id)
    }

    /// Delete a document row. Returns whether a row existed.
    pub async fn delete(&self, id: i64) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(documents::table.find(id))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    fn record_to_document(record: DocumentRecord) -> Document {
        Document {
            id: record.id,
            number: record.number,
            doc_type: record.doc_type,
            name: record.name,
            file_path: record.file_path,
            issued_date: record
                .issued_date
                .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()),
            created_at: parse_datetime(&record.created_at),
            file_size: record.file_size,
            file_name_original: record.file_name_original,
        }
    }
}

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::diesel_context::DieselDbContext;
    use tempfile::tempdir;

    fn new_doc(number: &str, name: &str, issued: Option<&str>) -> NewDocument {
        NewDocument {
            number: number.to_string(),
            doc_type: "Kế hoạch".to_string(),
            name: name.to_string(),
            file_path: format!("/uploads/{}.pdf", number),
            issued_date: issued.map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).unwrap()),
            file_size: 42,
            file_name_original: format!("KH {} {}.pdf", number, name),
        }
    }

    async fn setup() -> (DieselDocumentRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DieselDbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        (ctx.documents(), dir)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (repo, _dir) = setup().await;

        let id = repo
            .insert(&new_doc("12", "Kế hoạch năm", Some("2024-05-01")))
            .await
            .unwrap();
        let doc = repo.get(id).await.unwrap().unwrap();

        assert_eq!(doc.id, id);
        assert_eq!(doc.number, "12");
        assert_eq!(doc.doc_type, "Kế hoạch");
        assert_eq!(doc.name, "Kế hoạch năm");
        assert_eq!(doc.issued_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(doc.file_size, 42);
        assert_eq!(doc.file_name_original, "KH 12 Kế hoạch năm.pdf");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (repo, _dir) = setup().await;
        assert!(repo.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (repo, _dir) = setup().await;

        let first = repo.insert(&new_doc("1", "A", None)).await.unwrap();
        let second = repo.insert(&new_doc("2", "B", None)).await.unwrap();

        let docs = repo.list().await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, second);
        assert_eq!(docs[1].id, first);
        assert_eq!(docs[0].issued_date, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, _dir) = setup().await;

        let id = repo.insert(&new_doc("1", "A", None)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
