//! Filename extraction command.

use std::path::Path;

use console::style;

use crate::extract::extract;

/// Print the guessed metadata for each filename.
///
/// Only the final path component is examined, so paths may be passed directly.
pub fn cmd_extract(files: &[String], json: bool) -> anyhow::Result<()> {
    for file in files {
        let file_name = Path::new(file)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.clone());
        let result = extract(&file_name);

        if json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            println!("{}", style(&file_name).bold());
            println!("  {:<7} {}", "Loại:", result.doc_type);
            println!("  {:<7} {}", "Số:", result.number);
            println!("  {:<7} {}", "Tên:", result.name);
        }
    }

    Ok(())
}
