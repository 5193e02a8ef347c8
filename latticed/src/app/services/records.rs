// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::services::staging::{output_dir_name, storage_key};
use crate::app::types::{JobRecord, JobStatus, RowAction};

/// Owner field value the scheduler emits for a placeholder row when it has
/// no data for the query.
pub const NO_DATA_MARKER: &str = "N/A";

const MIN_RECORD_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordParseError {
    #[error("record on line {line} has {found} fields, expected at least {MIN_RECORD_FIELDS}")]
    TooFewFields { line: usize, found: usize },
}

/// Parse the stdout of a scheduler `list` call. Each non-empty line is a
/// comma-separated record terminated by a trailing comma:
/// `timestamp,owner,job,status_code[,extra...],`. Fields beyond the fourth
/// are ignored. A non-integer status code decodes to `Unknown`; a record
/// with fewer than four fields is malformed.
pub fn parse_list_output(output: &str) -> Result<Vec<JobRecord>, RecordParseError> {
    let mut records = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line = line.strip_suffix(',').unwrap_or(line);
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < MIN_RECORD_FIELDS {
            return Err(RecordParseError::TooFewFields {
                line: idx + 1,
                found: fields.len(),
            });
        }
        let status = fields[3]
            .parse::<i64>()
            .map(JobStatus::from_code)
            .unwrap_or(JobStatus::Unknown);
        records.push(JobRecord {
            submitted_at: fields[0].to_string(),
            owner: fields[1].to_string(),
            name: fields[2].to_string(),
            status,
        });
    }
    Ok(records)
}

/// Action shown in the result column. A finished job links to its output
/// directory, re-derived from the storage key. The scheduler's no-data
/// placeholder row renders a cancel control instead of plain `N/A`; that
/// quirk is load-bearing for the page and pinned by test.
pub fn row_action(record: &JobRecord) -> RowAction {
    if record.status == JobStatus::Finished {
        let dir = output_dir_name(storage_key(&record.owner, &record.name));
        return RowAction::Download {
            href: format!("upload/{dir}/"),
        };
    }
    if record.owner == NO_DATA_MARKER {
        return RowAction::Cancel {
            owner: record.owner.clone(),
            job: record.name.clone(),
        };
    }
    RowAction::Unavailable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_finished_record() {
        let records = parse_list_output("2024-01-01,alice,run1,4,\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].submitted_at, "2024-01-01");
        assert_eq!(records[0].owner, "alice");
        assert_eq!(records[0].name, "run1");
        assert_eq!(records[0].status, JobStatus::Finished);
    }

    #[test]
    fn preserves_scheduler_order() {
        let output = "2024-01-01,alice,run1,0,\n2024-01-02,alice,run2,1,\n";
        let records = parse_list_output(output).unwrap();
        assert_eq!(records[0].name, "run1");
        assert_eq!(records[1].name, "run2");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let records = parse_list_output("2024-01-01,alice,run1,2,node07,\n").unwrap();
        assert_eq!(records[0].status, JobStatus::Error);
    }

    #[test]
    fn out_of_range_codes_decode_to_unknown() {
        let records = parse_list_output("t,a,j,5,\nt,a,j,9,\nt,a,j,-1,\n").unwrap();
        assert!(records.iter().all(|r| r.status == JobStatus::Unknown));
    }

    #[test]
    fn non_integer_status_decodes_to_unknown() {
        let records = parse_list_output("N/A,N/A,N/A,N/A,\n").unwrap();
        assert_eq!(records[0].status, JobStatus::Unknown);
    }

    #[test]
    fn short_record_is_a_parse_error() {
        let err = parse_list_output("2024-01-01,alice,\n").unwrap_err();
        assert_eq!(err, RecordParseError::TooFewFields { line: 1, found: 2 });
    }

    #[test]
    fn empty_output_is_an_empty_listing() {
        assert_eq!(parse_list_output(""), Ok(Vec::new()));
        assert_eq!(parse_list_output("\n\n"), Ok(Vec::new()));
    }

    #[test]
    fn finished_row_links_to_derived_output_dir() {
        let records = parse_list_output("2024-01-01,alice,run1,4,\n").unwrap();
        let action = row_action(&records[0]);
        let expected = format!("upload/{}/", output_dir_name(storage_key("alice", "run1")));
        assert_eq!(action, RowAction::Download { href: expected });
    }

    #[test]
    fn unfinished_row_has_no_action() {
        let records = parse_list_output("2024-01-01,alice,run1,1,\n").unwrap();
        assert_eq!(row_action(&records[0]), RowAction::Unavailable);
    }

    #[test]
    fn no_data_row_renders_cancel_control() {
        // Placeholder rows render a cancel control rather than `N/A` text.
        let records = parse_list_output("N/A,N/A,N/A,N/A,\n").unwrap();
        assert_eq!(
            row_action(&records[0]),
            RowAction::Cancel {
                owner: "N/A".to_string(),
                job: "N/A".to_string()
            }
        );
    }

    #[test]
    fn stopped_row_has_no_action() {
        let records = parse_list_output("2024-01-01,alice,run1,3,\n").unwrap();
        assert_eq!(row_action(&records[0]), RowAction::Unavailable);
    }
}
