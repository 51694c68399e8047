use anyhow::{Result, bail};
use src2prompt::cli::{DEFAULT_INPUT_FILE, init_logging};
use src2prompt::restore_files;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(0);

    let dest_root = std::env::current_dir()?;
    let summary = restore_files(Path::new(DEFAULT_INPUT_FILE), &dest_root).await?;

    for path in &summary.written {
        println!("Created file: {path}");
    }

    if !summary.rejected.is_empty() {
        bail!(
            "{} of {} records could not be restored",
            summary.rejected.len(),
            summary.rejected.len() + summary.written.len()
        );
    }

    println!("All files created successfully.");
    Ok(())
}
