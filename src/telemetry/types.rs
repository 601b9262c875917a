use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO-8601 local time with microseconds and no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Column order of the durable log.
pub const LOG_COLUMNS: [&str; 8] = [
    "timestamp_ini",
    "timestamp_fin",
    "maquina",
    "tipo_maquina",
    "query",
    "tiempo_fin",
    "score",
    "rango_etario",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineKind {
    Master,
    Worker,
}

impl fmt::Display for MachineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineKind::Master => f.write_str("master"),
            MachineKind::Worker => f.write_str("worker"),
        }
    }
}

/// One query's timing and outcome, as reported by the machine that served it.
///
/// Serialized with the durable log's column names so the JSON sent over the
/// wire and the CSV on disk share a vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "timestamp_ini")]
    pub start_time: DateTime<Local>,
    #[serde(rename = "timestamp_fin")]
    pub end_time: DateTime<Local>,
    #[serde(rename = "maquina")]
    pub machine_id: String,
    #[serde(rename = "tipo_maquina")]
    pub machine_kind: MachineKind,
    #[serde(rename = "query")]
    pub query_text: String,
    #[serde(rename = "tiempo_fin")]
    pub processing_time_seconds: f64,
    pub score: f64,
    #[serde(rename = "rango_etario")]
    pub age_group_label: String,
}

impl LogEntry {
    pub fn to_row(&self) -> LogRow {
        LogRow {
            timestamp_ini: self.start_time.format(TIMESTAMP_FORMAT).to_string(),
            timestamp_fin: self.end_time.format(TIMESTAMP_FORMAT).to_string(),
            maquina: self.machine_id.clone(),
            tipo_maquina: self.machine_kind.to_string(),
            query: self.query_text.clone(),
            tiempo_fin: self.processing_time_seconds.to_string(),
            score: self.score.to_string(),
            rango_etario: self.age_group_label.clone(),
        }
    }
}

/// Display form returned by `read_all`: the eight fields in column order.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = self.to_row();
        write!(
            f,
            "{}, {}, {}, {}, {}, {}, {}, {}",
            row.timestamp_ini,
            row.timestamp_fin,
            row.maquina,
            row.tipo_maquina,
            row.query,
            row.tiempo_fin,
            row.score,
            row.rango_etario
        )
    }
}

/// A durable log row, every field already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow {
    pub timestamp_ini: String,
    pub timestamp_fin: String,
    pub maquina: String,
    pub tipo_maquina: String,
    pub query: String,
    pub tiempo_fin: String,
    pub score: String,
    pub rango_etario: String,
}
