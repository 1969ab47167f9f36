//! Reading the leaderboard's `result.json`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{VizError, VizResult};

#[derive(Debug, Deserialize)]
struct ResultFile {
    #[serde(rename = "_checkpoint", default)]
    checkpoint: Option<CheckpointSection>,
}

#[derive(Debug, Deserialize)]
struct CheckpointSection {
    #[serde(default)]
    progress: Option<Value>,
    #[serde(default)]
    records: Vec<Value>,
}

/// What the run summary prints from a result checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSummary {
    /// `_checkpoint.progress`, usually `[done, total]`.
    pub progress: Option<Value>,
    /// Number of finished route records.
    pub records: usize,
}

impl CheckpointSummary {
    /// `(done, total)` when progress is a two-element integer array.
    pub fn route_progress(&self) -> Option<(u64, u64)> {
        match self.progress.as_ref()?.as_array()?.as_slice() {
            [done, total] => Some((done.as_u64()?, total.as_u64()?)),
            _ => None,
        }
    }
}

pub fn parse_checkpoint(json: &str) -> Result<CheckpointSummary, serde_json::Error> {
    let file: ResultFile = serde_json::from_str(json)?;
    Ok(match file.checkpoint {
        Some(section) => CheckpointSummary {
            progress: section.progress,
            records: section.records.len(),
        },
        None => CheckpointSummary {
            progress: None,
            records: 0,
        },
    })
}

pub fn read_checkpoint(path: &Path) -> VizResult<CheckpointSummary> {
    let text = fs::read_to_string(path).map_err(|e| VizError::io_at("read checkpoint", path, e))?;
    parse_checkpoint(&text).map_err(|e| VizError::checkpoint(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_extracted() {
        let summary = parse_checkpoint(
            r#"{"_checkpoint": {"progress": [1, 3], "records": [{"route_id": "RouteScenario_0"}]}, "entry_status": "Started"}"#,
        )
        .unwrap();
        assert_eq!(summary.route_progress(), Some((1, 3)));
        assert_eq!(summary.records, 1);
    }

    #[test]
    fn test_missing_section_is_not_an_error() {
        let summary = parse_checkpoint(r#"{"entry_status": "Crashed"}"#).unwrap();
        assert_eq!(summary.progress, None);
        assert_eq!(summary.route_progress(), None);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_checkpoint("not json").is_err());
    }
}
