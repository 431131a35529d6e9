//! Annotation lookup result types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Project name for tasks that do not belong to a project.
pub const NO_PROJECT: &str = "No Project";

/// Display name used when a project name cannot be fetched.
pub fn placeholder_project_name(project_id: i64) -> String {
    format!("Project #{project_id}")
}

/// One task whose name matches a lookup exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationOccurrence {
    pub task_id: i64,
    pub task_url: String,
    pub project_id: Option<i64>,
    pub project_name: String,
    /// Stage of the task's first job, if it has any jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// Whether a video already has annotation tasks, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationStatus {
    pub exists: bool,
    pub occurrences: Vec<AnnotationOccurrence>,
    /// True iff some project (or the no-project bucket) holds two or more occurrences.
    pub has_duplicate_in_same_project: bool,
    /// Distinct names of the projects holding duplicates. Only set when the flag is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_project_names: Option<Vec<String>>,
}

impl AnnotationStatus {
    pub fn not_found() -> Self {
        Self {
            exists: false,
            occurrences: Vec::new(),
            has_duplicate_in_same_project: false,
            duplicate_project_names: None,
        }
    }

    /// Build a status from exact-match occurrences, computing duplicates.
    pub fn from_occurrences(occurrences: Vec<AnnotationOccurrence>) -> Self {
        if occurrences.is_empty() {
            return Self::not_found();
        }

        let mut per_project: HashMap<Option<i64>, usize> = HashMap::new();
        for occurrence in &occurrences {
            *per_project.entry(occurrence.project_id).or_default() += 1;
        }

        let mut duplicate_names: Vec<String> = Vec::new();
        for occurrence in &occurrences {
            let count = per_project.get(&occurrence.project_id).copied().unwrap_or(0);
            if count > 1 && !duplicate_names.contains(&occurrence.project_name) {
                duplicate_names.push(occurrence.project_name.clone());
            }
        }

        let has_duplicate = !duplicate_names.is_empty();
        Self {
            exists: true,
            occurrences,
            has_duplicate_in_same_project: has_duplicate,
            duplicate_project_names: has_duplicate.then_some(duplicate_names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(task_id: i64, project_id: Option<i64>, project_name: &str) -> AnnotationOccurrence {
        AnnotationOccurrence {
            task_id,
            task_url: format!("http://cvat/tasks/{task_id}"),
            project_id,
            project_name: project_name.to_string(),
            stage: None,
        }
    }

    #[test]
    fn test_empty_is_not_found() {
        assert_eq!(AnnotationStatus::from_occurrences(vec![]), AnnotationStatus::not_found());
    }

    #[test]
    fn test_distinct_projects_have_no_duplicates() {
        let status = AnnotationStatus::from_occurrences(vec![
            occurrence(1, Some(7), "Belts"),
            occurrence(2, Some(8), "Rollers"),
        ]);
        assert!(status.exists);
        assert!(!status.has_duplicate_in_same_project);
        assert_eq!(status.duplicate_project_names, None);
    }

    #[test]
    fn test_same_project_twice_is_duplicate() {
        let status = AnnotationStatus::from_occurrences(vec![
            occurrence(1, Some(7), "Belts"),
            occurrence(2, Some(7), "Belts"),
            occurrence(3, Some(8), "Rollers"),
        ]);
        assert!(status.has_duplicate_in_same_project);
        assert_eq!(status.duplicate_project_names, Some(vec!["Belts".to_string()]));
    }

    #[test]
    fn test_no_project_bucket_counts_as_one_group() {
        let status = AnnotationStatus::from_occurrences(vec![
            occurrence(1, None, NO_PROJECT),
            occurrence(2, None, NO_PROJECT),
        ]);
        assert!(status.has_duplicate_in_same_project);
        assert_eq!(status.duplicate_project_names, Some(vec![NO_PROJECT.to_string()]));
    }

    #[test]
    fn test_duplicate_names_are_unique_across_groups() {
        let status = AnnotationStatus::from_occurrences(vec![
            occurrence(1, Some(7), "Belts"),
            occurrence(2, Some(7), "Belts"),
            occurrence(3, Some(9), "Rollers"),
            occurrence(4, Some(9), "Rollers"),
            occurrence(5, Some(9), "Rollers"),
        ]);
        assert_eq!(
            status.duplicate_project_names,
            Some(vec!["Belts".to_string(), "Rollers".to_string()])
        );
    }

    #[test]
    fn test_serializes_camel_case_without_absent_fields() {
        let json = serde_json::to_value(AnnotationStatus::not_found()).unwrap();
        assert_eq!(json["hasDuplicateInSameProject"], false);
        assert!(json.get("duplicateProjectNames").is_none());
    }
}
