use ignore::WalkBuilder;
use log::warn;
use std::path::{Path, PathBuf};

use crate::filters::PathFilter;
use crate::utils::slash_path;

/// Collects the bundle candidates under `root` in a stable order.
///
/// Excluded directories are pruned wholesale so their contents are never
/// visited. `skip_output` is the canonicalized path of the bundle being
/// written; a matching walked file is dropped so the output never swallows
/// itself on a rerun.
pub fn collect_files(
    root: &Path,
    filter: &PathFilter,
    skip_output: Option<&Path>,
) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);

    // Filtering is purely pattern-driven: no gitignore or hidden-file
    // semantics, and a deterministic per-directory order.
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    {
        let filter = filter.clone();
        let root = root.to_path_buf();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !entry.file_type().map_or(false, |t| t.is_dir()) {
                return true;
            }
            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            !filter.is_excluded(&slash_path(rel))
        });
    }

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                if is_output_file(path, skip_output) {
                    continue;
                }

                let rel = path.strip_prefix(root).unwrap_or(path);
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();

                if filter.includes_file(&slash_path(rel), &file_name) {
                    files.push(path.to_path_buf());
                }
            }
            Err(err) => {
                warn!("error walking path: {err}");
            }
        }
    }

    files
}

fn is_output_file(path: &Path, skip_output: Option<&Path>) -> bool {
    let Some(output) = skip_output else {
        return false;
    };
    // Cheap name check first; canonicalize only on a candidate hit.
    path.file_name() == output.file_name()
        && path.canonicalize().map_or(false, |p| p == output)
}
