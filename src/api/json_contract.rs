use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationSnapshot;
use crate::error::{DrawingError, DrawingResult};
use crate::render::Renderer;

use super::{DrawingEngine, EngineSnapshot};

pub const ANNOTATIONS_JSON_SCHEMA_V1: u32 = 1;
pub const ENGINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationsJsonContractV1 {
    pub schema_version: u32,
    pub annotations: AnnotationSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: EngineSnapshot,
}

impl AnnotationSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> DrawingResult<String> {
        let payload = AnnotationsJsonContractV1 {
            schema_version: ANNOTATIONS_JSON_SCHEMA_V1,
            annotations: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DrawingError::InvalidData(format!("failed to serialize annotations contract v1: {e}"))
        })
    }

    /// Parses either a v1 envelope or a bare snapshot payload.
    pub fn from_json_compat_str(input: &str) -> DrawingResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<AnnotationSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: AnnotationsJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DrawingError::InvalidData(format!("failed to parse annotations json payload: {e}"))
        })?;
        if payload.schema_version != ANNOTATIONS_JSON_SCHEMA_V1 {
            return Err(DrawingError::InvalidData(format!(
                "unsupported annotations schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.annotations)
    }
}

impl EngineSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> DrawingResult<String> {
        let payload = EngineSnapshotJsonContractV1 {
            schema_version: ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DrawingError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> DrawingResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<EngineSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: EngineSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DrawingError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != ENGINE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(DrawingError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<R: Renderer> DrawingEngine<R> {
    pub fn annotations_json_contract_v1_pretty(&self) -> DrawingResult<String> {
        self.export_annotations().to_json_contract_v1_pretty()
    }

    /// Loads collections from JSON produced by
    /// [`annotations_json_contract_v1_pretty`](Self::annotations_json_contract_v1_pretty)
    /// or a bare snapshot.
    pub fn load_annotations_json(&mut self, input: &str) -> DrawingResult<()> {
        let snapshot = AnnotationSnapshot::from_json_compat_str(input)?;
        self.load_annotations(snapshot)
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> DrawingResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
