use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};

/// Compiled include/exclude rules for the bundler.
///
/// Matching happens against root-relative, forward-slash paths. Precedence:
/// a force-include match always wins over an exclude match, and the suffix
/// gate applies on top of both. An empty suffix list admits every file name.
#[derive(Clone, Debug)]
pub struct PathFilter {
    exclude: GlobSet,
    force_include: GlobSet,
    include_suffixes: Vec<String>,
}

impl PathFilter {
    pub fn new(
        include_suffixes: Vec<String>,
        exclude_globs: &[String],
        force_include_globs: &[String],
    ) -> Result<Self> {
        Ok(Self {
            exclude: compile_globset(exclude_globs)?,
            force_include: compile_globset(force_include_globs)?,
            include_suffixes,
        })
    }

    pub fn is_force_included(&self, rel_path: &str) -> bool {
        self.force_include.is_match(rel_path)
    }

    /// Exclusion test used for both files and directory pruning.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        !self.is_force_included(rel_path) && self.exclude.is_match(rel_path)
    }

    pub fn suffix_allowed(&self, file_name: &str) -> bool {
        self.include_suffixes.is_empty()
            || self
                .include_suffixes
                .iter()
                .any(|suffix| file_name.ends_with(suffix))
    }

    /// Whether a walked file belongs in the bundle.
    pub fn includes_file(&self, rel_path: &str, file_name: &str) -> bool {
        !self.is_excluded(rel_path) && self.suffix_allowed(file_name)
    }
}

/// Rewrites a shell-style pattern so it compiles and matches like the
/// loosely written patterns this tool has always accepted: backslashes
/// become `/`, and any run of `*`s collapses to one star (which already
/// crosses directory separators here). `?` and `[...]` classes pass through.
fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.replace('\\', "/");
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;
    let mut class_start = false;
    while let Some(c) = chars.next() {
        match c {
            '[' if !in_class => {
                in_class = true;
                class_start = true;
                out.push(c);
            }
            '!' if in_class && class_start => {
                // negation marker; a ']' right after it is still literal
                out.push(c);
            }
            ']' if in_class && !class_start => {
                in_class = false;
                out.push(c);
            }
            '*' if !in_class => {
                out.push(c);
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            _ => {
                if in_class {
                    class_start = false;
                }
                out.push(c);
            }
        }
    }
    out
}

fn compile_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(&normalize_pattern(pattern)).map_err(|source| Error::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| Error::Pattern {
        pattern: patterns.join(" "),
        source,
    })
}
