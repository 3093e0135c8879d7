//! Initialize command.

use console::style;

use crate::config::Settings;

/// Initialize the data directory and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let ctx = settings.create_db_context();
    ctx.init_schema().await?;
    let count = ctx.documents().count().await?;

    println!(
        "{} Initialized vanban in {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!("  Database: {}", settings.database_url());
    println!("  Uploads:  {}", settings.uploads_dir.display());
    if count > 0 {
        println!("  {} existing documents", count);
    }

    Ok(())
}
