//! Document register commands: list, add and delete.

use std::path::Path;

use console::style;

use super::helpers::{cell, document_line};
use crate::config::Settings;
use crate::extract::extract;
use crate::listing::ListQuery;
use crate::models::{NewDocument, UploadRequest};
use crate::repository::DieselDbContext;
use crate::storage::UploadStore;

/// Open the register without creating a database file.
///
/// `None` when the database has never been created.
async fn open_existing(settings: &Settings) -> anyhow::Result<Option<DieselDbContext>> {
    if settings.database_url.is_none() && !settings.database_path().exists() {
        return Ok(None);
    }
    let ctx = settings.create_db_context();
    ctx.init_schema().await?;
    Ok(Some(ctx))
}

/// Print documents matching `query`.
pub async fn cmd_list(settings: &Settings, query: &ListQuery, json: bool) -> anyhow::Result<()> {
    let docs = match open_existing(settings).await? {
        Some(ctx) => query.apply(&ctx.documents().list().await?),
        None => Vec::new(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }

    if docs.is_empty() {
        println!("{} Không có văn bản nào.", style("!").yellow());
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "{:>5}  {}  {}  {}  {}",
            "ID",
            cell("Số hiệu", 10),
            cell("Loại", 12),
            cell("Trích yếu", 40),
            "Ngày ban hành"
        ))
        .bold()
    );
    for doc in &docs {
        println!("{}", document_line(doc));
    }
    println!("\n{} văn bản", docs.len());

    Ok(())
}

/// Fill fields the user did not give from the filename.
fn with_extracted_defaults(file_name: &str, overrides: UploadRequest) -> UploadRequest {
    let guessed = extract(file_name);
    let or_guess = |given: Option<String>, guess: String| {
        given
            .filter(|v| !v.trim().is_empty())
            .or_else(|| Some(guess).filter(|g| !g.is_empty()))
    };

    UploadRequest {
        number: or_guess(overrides.number, guessed.number),
        doc_type: or_guess(overrides.doc_type, guessed.doc_type),
        name: or_guess(overrides.name, guessed.name),
        issued_date: overrides.issued_date,
    }
}

/// Store a file and register it.
pub async fn cmd_add(
    settings: &Settings,
    file: &Path,
    overrides: UploadRequest,
) -> anyhow::Result<()> {
    let file_name = file
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Not a file: {}", file.display()))?;

    let fields = with_extracted_defaults(&file_name, overrides)
        .validate()
        .map_err(|e| anyhow::anyhow!("{}: {}", file_name, e))?;

    let content = tokio::fs::read(file).await?;

    settings.ensure_directories()?;
    let ctx = settings.create_db_context();
    ctx.init_schema().await?;

    let store = UploadStore::new(settings.uploads_dir.clone());
    let stored = store.save(&file_name, &content).await?;

    let doc = NewDocument::from_upload(fields, stored.file_path.clone(), stored.file_size, file_name);
    let id = match ctx.documents().insert(&doc).await {
        Ok(id) => id,
        Err(e) => {
            if let Err(cleanup) = store.remove(&stored.file_path).await {
                tracing::warn!("Could not remove orphaned upload: {}", cleanup);
            }
            return Err(e.into());
        }
    };

    println!(
        "{} Added #{}: {} {} {}",
        style("✓").green(),
        id,
        doc.doc_type,
        doc.number,
        doc.name
    );
    println!("  {}", stored.file_path);

    Ok(())
}

/// Delete documents and their stored files.
pub async fn cmd_delete(settings: &Settings, ids: &[i64]) -> anyhow::Result<()> {
    let Some(ctx) = open_existing(settings).await? else {
        anyhow::bail!(
            "No database at {}. Run `vanban init` first.",
            settings.database_path().display()
        );
    };
    let repo = ctx.documents();
    let store = UploadStore::new(settings.uploads_dir.clone());

    let mut missing = 0;
    for &id in ids {
        let Some(doc) = repo.get(id).await? else {
            println!("{} #{} không tìm thấy", style("✗").red(), id);
            missing += 1;
            continue;
        };

        if let Err(e) = store.remove(&doc.file_path).await {
            tracing::warn!(id, "Could not remove stored file: {}", e);
        }
        repo.delete(id).await?;
        println!("{} Deleted #{}: {}", style("✓").green(), id, doc.name);
    }

    if missing > 0 {
        anyhow::bail!("{} of {} documents not found", missing, ids.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::YearFilter;
    use tempfile::tempdir;

    fn settings_in(dir: &Path) -> Settings {
        Settings::with_data_dir(dir.join("data"))
    }

    #[test]
    fn test_defaults_from_filename() {
        let request = with_extracted_defaults("CV 45/2024 - Công văn hướng dẫn.pdf", UploadRequest::default());
        assert_eq!(request.number.as_deref(), Some("45/2024"));
        assert_eq!(request.doc_type.as_deref(), Some("Công văn"));
        assert_eq!(request.name.as_deref(), Some("Công văn hướng dẫn"));
    }

    #[test]
    fn test_overrides_win() {
        let overrides = UploadRequest {
            number: Some("99".to_string()),
            doc_type: Some("  ".to_string()),
            ..Default::default()
        };
        let request = with_extracted_defaults("KH 12 Tuyển sinh.pdf", overrides);
        assert_eq!(request.number.as_deref(), Some("99"));
        // Blank override falls back to the guess.
        assert_eq!(request.doc_type.as_deref(), Some("Kế hoạch"));
    }

    #[test]
    fn test_no_guess_leaves_field_missing() {
        let request = with_extracted_defaults("bao_cao_thang.pdf", UploadRequest::default());
        assert_eq!(request.number, None);
        assert_eq!(request.doc_type, None);
        assert!(request.validate().is_err());
    }

    #[tokio::test]
    async fn test_add_list_delete() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path());
        let source = dir.path().join("QĐ 7-24 Nghỉ lễ.pdf");
        std::fs::write(&source, b"%PDF").unwrap();

        let overrides = UploadRequest {
            issued_date: Some("2024-04-20".to_string()),
            ..Default::default()
        };
        cmd_add(&settings, &source, overrides).await.unwrap();

        let ctx = settings.create_db_context();
        let docs = ctx.documents().list().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].doc_type, "Quyết định");
        assert_eq!(docs[0].number, "7");
        assert_eq!(docs[0].file_name_original, "QĐ 7-24 Nghỉ lễ.pdf");

        let query = ListQuery {
            year: Some(YearFilter::Year(2024)),
            ..Default::default()
        };
        cmd_list(&settings, &query, true).await.unwrap();

        let stored = settings
            .uploads_dir
            .join(docs[0].file_path.trim_start_matches("/uploads/"));
        assert!(stored.exists());

        cmd_delete(&settings, &[docs[0].id]).await.unwrap();
        assert!(!stored.exists());
        assert_eq!(ctx.documents().count().await.unwrap(), 0);
        assert!(cmd_delete(&settings, &[docs[0].id]).await.is_err());
    }

    #[tokio::test]
    async fn test_list_and_delete_before_init() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path());

        cmd_list(&settings, &ListQuery::default(), false).await.unwrap();
        cmd_list(&settings, &ListQuery::default(), true).await.unwrap();

        let err = cmd_delete(&settings, &[1]).await.unwrap_err();
        assert!(err.to_string().contains("vanban init"), "{}", err);
        assert!(!settings.database_path().exists());
    }

    #[tokio::test]
    async fn test_list_on_empty_database_file() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path());
        settings.ensure_directories().unwrap();
        std::fs::write(settings.database_path(), b"").unwrap();

        cmd_list(&settings, &ListQuery::default(), true).await.unwrap();
        assert!(cmd_delete(&settings, &[1]).await.is_err());
    }
}
