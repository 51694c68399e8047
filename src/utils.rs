use std::path::Path;

/// Renders a path with forward slashes on every platform.
///
/// Glob patterns and bundle markers always use `/`; walked paths on Windows
/// come back with `\` and would never match otherwise.
pub fn slash_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    if s.contains('\\') {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}
