//! On-disk plan format.
//!
//! ```json
//! {"name": "10k", "remarks": "…", "entries": [
//!   {"week": 1, "day": 1, "units": [{"duration": 30, "movement_type": "L"}]}
//! ]}
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Entry, ModelError, MovementCatalog, Plan, PlanHeader, Unit};

/// 計畫檔案編解碼錯誤。 / Errors raised while decoding or encoding plan files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed plan file: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("invalid plan header: {0}")]
    Header(#[source] ModelError),
    #[error("invalid entry #{entry}: {source}")]
    Entry {
        /// 1-based position of the entry in the file.
        entry: usize,
        #[source]
        source: ModelError,
    },
    #[error("failed to encode plan: {0}")]
    Encode(#[source] serde_json::Error),
}

/// 計畫檔案格式的抽象。 / Abstraction over the plan file format.
pub trait PlanCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Plan, CodecError>;

    fn encode(&self, plan: &Plan) -> Result<Vec<u8>, CodecError>;

    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;
}

#[derive(Debug, Serialize, Deserialize)]
struct PlanFile {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remarks: Option<String>,
    #[serde(default)]
    entries: Vec<EntryFile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryFile {
    week: u32,
    day: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remarks: Option<String>,
    #[serde(default)]
    units: Vec<UnitFile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UnitFile {
    duration: u32,
    movement_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    running_infos: Option<String>,
}

/// JSON 計畫格式。 / The JSON plan format.
#[derive(Debug, Clone)]
pub struct JsonPlanCodec {
    movements: Arc<MovementCatalog>,
}

impl JsonPlanCodec {
    /// Movement type keys in decoded files are resolved against `movements`.
    pub fn new(movements: Arc<MovementCatalog>) -> Self {
        Self { movements }
    }

    fn decode_entry(&self, file: EntryFile) -> Result<Entry, ModelError> {
        let units = file
            .units
            .into_iter()
            .map(|unit| {
                let movement = self.movements.resolve(&unit.movement_type)?;
                Unit::new(unit.duration, movement, unit.running_infos)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Entry::new(file.week, file.day, file.remarks, units)
    }
}

impl PlanCodec for JsonPlanCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Plan, CodecError> {
        let file: PlanFile = serde_json::from_slice(bytes).map_err(CodecError::Syntax)?;
        let header = PlanHeader::new(file.name, file.remarks).map_err(CodecError::Header)?;
        let entries = file
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                self.decode_entry(entry).map_err(|source| CodecError::Entry {
                    entry: index + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Plan::new(header, entries))
    }

    fn encode(&self, plan: &Plan) -> Result<Vec<u8>, CodecError> {
        let file = PlanFile {
            name: plan.name().to_string(),
            remarks: plan.remarks().map(str::to_string),
            entries: plan
                .entries()
                .iter()
                .map(|entry| EntryFile {
                    week: entry.week(),
                    day: entry.day(),
                    remarks: entry.remarks().map(str::to_string),
                    units: entry
                        .units()
                        .iter()
                        .map(|unit| UnitFile {
                            duration: unit.duration_minutes(),
                            movement_type: unit.movement_type().key().to_string(),
                            running_infos: unit.running_infos().map(str::to_string),
                        })
                        .collect(),
                })
                .collect(),
        };
        serde_json::to_vec_pretty(&file).map_err(CodecError::Encode)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
