//! # src2prompt
//!
//! This crate can be used to:
//!
//! - Bundle the matching files of a source tree into one flat, prompt-friendly
//!   text file
//! - Extract such a bundle back into real files and directories
//!
//! Each bundled file becomes one record:
//!
//! ````text
//! // relative/path/to/file.ts
//! ```
//! <file content>
//! ```
//!
//! ````
//!
//! Which files go in is decided by three filter lists: exclusion globs,
//! force-include globs that override them, and a file name suffix gate.
//!
//! ## Usage
//!
//! ### To write a bundle:
//!
//! ```no_run
//! use src2prompt::{BundleConfig, run_bundle};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BundleConfig::new(std::env::current_dir()?);
//!     let summary = run_bundle(config).await?;
//!     println!("bundled {} files", summary.added.len());
//!     Ok(())
//! }
//! ```
//!
//! ### To extract files from a bundle:
//!
//! ```no_run
//! use src2prompt::restore_files;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = restore_files(Path::new("input.txt"), Path::new(".")).await?;
//!     println!("created {} files", summary.written.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod extractor;
pub mod filewalker;
pub mod filters;
pub mod utils;
pub mod writer;

pub use cli::BundleConfig;
pub use error::{Error, ReadError, Result};
pub use extractor::{RestoreSummary, restore_files};
pub use filewalker::collect_files;
pub use filters::PathFilter;
pub use writer::BundleWriter;

use log::warn;
use std::path::PathBuf;

use crate::utils::slash_path;
use crate::writer::read_file_text;

/// Marker prefix naming the file a record holds.
pub const PATH_MARKER: &str = "// ";

/// Fence line delimiting record content.
pub const FENCE: &str = "```";

/// What a bundling run produced: relative paths written into the bundle,
/// and walked files skipped along with the reason.
#[derive(Debug, Default)]
pub struct BundleSummary {
    pub added: Vec<String>,
    pub skipped: Vec<(PathBuf, ReadError)>,
}

/// Bundles everything under `config.root` that passes the filters into
/// `config.output_path`.
///
/// Files that cannot be read as UTF-8 text are skipped with a warning and
/// reported in the summary; failing to write the output aborts the run.
pub async fn run_bundle(config: BundleConfig) -> Result<BundleSummary> {
    let filter = PathFilter::new(
        config.include_suffixes.clone(),
        &config.exclude_globs,
        &config.force_include_globs,
    )?;

    let mut writer = BundleWriter::create(&config.output_path).await?;

    // The output exists from here on, so it can be canonicalized and kept
    // out of its own contents.
    let output_canonical = config.output_path.canonicalize().ok();

    let files = collect_files(&config.root, &filter, output_canonical.as_deref());

    let mut summary = BundleSummary::default();
    for path in files {
        let rel = path.strip_prefix(&config.root).unwrap_or(&path);
        let rel_str = slash_path(rel);

        match read_file_text(&path) {
            Ok(content) => {
                writer.write_record(&rel_str, &content).await?;
                summary.added.push(rel_str);
            }
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                summary.skipped.push((path, err));
            }
        }
    }

    writer.flush().await?;
    Ok(summary)
}
