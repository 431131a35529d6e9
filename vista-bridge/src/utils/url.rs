//! URL helpers for remote API calls.

/// Join a base URL and a path, with exactly one `/` between them.
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// The JSON API endpoint of a CI resource URL (queue item, build).
///
/// Resource URLs returned by the CI server end with `/`; a missing one is added.
pub fn api_json_url(resource_url: &str) -> String {
    if resource_url.ends_with('/') {
        format!("{resource_url}api/json")
    } else {
        format!("{resource_url}/api/json")
    }
}

/// Request path of a CI job. `/` separates nested folders and every segment
/// is percent-encoded: `a/b c` becomes `job/a/job/b%20c`.
pub fn job_path(job_name: &str) -> String {
    let segments: Vec<String> = job_name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("job/{}", segments.join("/job/"))
}
