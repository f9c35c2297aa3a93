//! Append-only log of completed trials and its export formats.
//!
//! The CSV export is what the experimenter downloads: a UTF-8 byte-order
//! mark, a header row, then one row per trial in the order they finished.
//!
//! # Example
//!
//! ```rust
//! use shell_game::trial_log::{EmptyLogError, TrialLogger};
//!
//! let logger = TrialLogger::new();
//! assert_eq!(logger.export(), Err(EmptyLogError));
//! ```

pub mod error;
pub mod record;

pub use error::{EmptyLogError, ExportError};
pub use record::{participant_or_anonymous, LogRecord, ResponseTime, ANONYMOUS};

use crate::machine::CompletedTrial;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// UTF-8 byte-order mark; spreadsheet tools need it to detect the encoding.
pub const BOM: char = '\u{FEFF}';

/// Column names of the CSV export.
pub const CSV_HEADER: [&str; 6] = [
    "Timestamp",
    "Participant",
    "Speed(ms)",
    "Moves",
    "Correct",
    "ResponseTime(s)",
];

/// `shell_game_data_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("shell_game_data_{}.csv", date.format("%Y-%m-%d"))
}

/// Render one record as a CSV row.
///
/// The participant name is wrapped in double quotes and otherwise written
/// verbatim.
pub fn csv_row(record: &LogRecord) -> String {
    [
        record.timestamp_string(),
        format!("\"{}\"", record.participant_name),
        record.transition_speed_ms.to_string(),
        record.move_limit.to_string(),
        if record.is_correct { "1" } else { "0" }.to_string(),
        record.response_time.to_string(),
    ]
    .join(",")
}

/// Accumulates one record per completed trial for the life of the process.
#[derive(Clone, Debug, Default)]
pub struct TrialLogger {
    records: Vec<LogRecord>,
}

impl TrialLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a completed trial. Existing records are never touched.
    pub fn append(&mut self, trial: &CompletedTrial, participant_name: &str) -> &LogRecord {
        let record = LogRecord {
            timestamp: trial.finished_at(),
            participant_name: participant_or_anonymous(participant_name),
            transition_speed_ms: trial.config.transition_speed_ms,
            move_limit: trial.config.move_limit,
            is_correct: trial.is_correct(),
            response_time: ResponseTime::between(trial.started_at, trial.finished_at()),
        };
        info!(
            trial = %trial.trial,
            correct = record.is_correct,
            response_time = %record.response_time,
            "trial logged"
        );

        let index = self.records.len();
        self.records.push(record);
        &self.records[index]
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// BOM-prefixed CSV of every record.
    pub fn export(&self) -> Result<String, EmptyLogError> {
        if self.records.is_empty() {
            warn!("export requested with no trials logged");
            return Err(EmptyLogError);
        }

        let mut lines = Vec::with_capacity(self.records.len() + 1);
        lines.push(CSV_HEADER.join(","));
        lines.extend(self.records.iter().map(csv_row));

        let mut csv = String::from(BOM);
        csv.push_str(&lines.join("\n"));
        Ok(csv)
    }

    /// Pretty-printed JSON array of every record.
    pub fn export_json(&self) -> Result<String, ExportError> {
        if self.records.is_empty() {
            warn!("export requested with no trials logged");
            return Err(EmptyLogError.into());
        }
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Write the CSV export into `dir` under the file name for `date`.
    ///
    /// Nothing is written when the log is empty.
    pub fn write_csv(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
        let csv = self.export()?;
        let path = dir.join(export_file_name(date));
        std::fs::write(&path, csv).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), records = self.records.len(), "trial log written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrialConfig;
    use crate::core::Shell;
    use crate::machine::Selection;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn completed(correct: bool, millis: i64) -> CompletedTrial {
        CompletedTrial {
            trial: Uuid::new_v4(),
            config: TrialConfig::new(3, 200),
            selection: Selection {
                index: 0,
                shell: Shell::new(150, 100, correct),
                selected_at: start() + Duration::milliseconds(millis),
            },
            started_at: start(),
        }
    }

    #[test]
    fn export_of_empty_log_fails() {
        let logger = TrialLogger::new();

        assert_eq!(logger.export(), Err(EmptyLogError));
        assert!(matches!(logger.export_json(), Err(ExportError::Empty(_))));
    }

    #[test]
    fn append_builds_record_from_trial() {
        let mut logger = TrialLogger::new();

        let record = logger.append(&completed(true, 1234), "").clone();

        assert_eq!(record.participant_name, ANONYMOUS);
        assert_eq!(record.move_limit, 3);
        assert_eq!(record.transition_speed_ms, 200);
        assert!(record.is_correct);
        assert_eq!(record.response_time.to_string(), "1.23");
        assert_eq!(record.timestamp, start() + Duration::milliseconds(1234));
    }

    #[test]
    fn append_keeps_earlier_records() {
        let mut logger = TrialLogger::new();
        logger.append(&completed(true, 100), "A");
        let first = logger.records()[0].clone();

        logger.append(&completed(false, 200), "B");

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.records()[0], first);
        assert_eq!(logger.records()[1].participant_name, "B");
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let mut logger = TrialLogger::new();
        logger.append(&completed(false, 2000), "Jo");

        let csv = logger.export().unwrap();

        assert!(csv.starts_with('\u{FEFF}'));
        let mut lines = csv.trim_start_matches('\u{FEFF}').lines();
        assert_eq!(
            lines.next(),
            Some("Timestamp,Participant,Speed(ms),Moves,Correct,ResponseTime(s)")
        );
        assert_eq!(
            lines.next(),
            Some("2024-01-01T00:00:02.000Z,\"Jo\",200,3,0,2.00")
        );
        assert_eq!(lines.next(), None);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn csv_keeps_commas_inside_quoted_name() {
        let record = LogRecord {
            timestamp: start(),
            participant_name: "Jo,e".to_string(),
            transition_speed_ms: 200,
            move_limit: 3,
            is_correct: true,
            response_time: ResponseTime::from_centis(123),
        };

        assert_eq!(
            csv_row(&record),
            "2024-01-01T00:00:00.000Z,\"Jo,e\",200,3,1,1.23"
        );
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "shell_game_data_2024-03-09.csv");
    }

    #[test]
    fn json_export_lists_records() {
        let mut logger = TrialLogger::new();
        logger.append(&completed(true, 500), "Jo");

        let json: serde_json::Value = serde_json::from_str(&logger.export_json().unwrap()).unwrap();

        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["participant_name"], "Jo");
        assert_eq!(json[0]["response_time"], "0.50");
    }
}
