//! Path and filename helpers.
//!
//! Resource paths use `/` as separator regardless of platform.

/// Annotation task name for a video file: the file name without its last extension.
///
/// Only an extension without `/` or `.` is stripped, so `a.b.mp4` becomes `a.b`
/// and `clip.` stays unchanged.
pub fn task_name_from_filename(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => {
            let ext = &filename[idx + 1..];
            if ext.is_empty() || ext.contains('/') {
                filename
            } else {
                &filename[..idx]
            }
        }
        None => filename,
    }
}

/// Last segment of a resource path.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Everything before the last `/`, or an empty string for a bare file name.
pub fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}
