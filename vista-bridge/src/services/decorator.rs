//! Decoration of directory listing entries with annotation and processing state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;

use crate::annotation::{AnnotationService, AnnotationStatus};
use crate::processing::{ProcessingInfo, ProcessingRegistry};
use crate::utils::filename::file_name_of;

/// Extra fields attached to one listed video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoDecoration {
    pub annotation: AnnotationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<ProcessingInfo>,
}

pub struct ListingDecorator {
    annotation: Arc<AnnotationService>,
    registry: Arc<ProcessingRegistry>,
}

impl ListingDecorator {
    pub fn new(annotation: Arc<AnnotationService>, registry: Arc<ProcessingRegistry>) -> Self {
        Self {
            annotation,
            registry,
        }
    }

    /// Decorate each resource path. Remote failures drop the decoration, never the entry.
    #[instrument(skip_all, fields(paths = paths.len()))]
    pub async fn decorate(&self, paths: &[String]) -> HashMap<String, VideoDecoration> {
        let filenames: Vec<String> = paths
            .iter()
            .map(|path| file_name_of(path).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let (annotations, processing) = tokio::join!(
            self.annotation.check_videos_status(&filenames),
            self.registry.get_for_paths_and_refresh(paths)
        );

        let mut processing = processing.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load processing state for listing");
            HashMap::new()
        });

        paths
            .iter()
            .map(|path| {
                let annotation = annotations
                    .get(file_name_of(path))
                    .cloned()
                    .unwrap_or_else(AnnotationStatus::not_found);
                let decoration = VideoDecoration {
                    annotation,
                    processing: processing.remove(path),
                };
                (path.clone(), decoration)
            })
            .collect()
    }
}
