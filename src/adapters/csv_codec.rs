use crate::core::history::History;
use crate::domain::model::{FormattedPairing, HistoryEntry, OutputFormat, Participant};
use crate::utils::error::{Result, SantaError};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;
use std::collections::HashSet;

/// Decodes the participant file (`Employee_Name,Employee_EmailID`).
///
/// Rows are numbered from 1 after the header. Empty names or ids and
/// duplicate ids are rejected here so the engine only sees a clean roster.
pub fn decode_participants(data: &[u8]) -> Result<Vec<Participant>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(data);
    let mut participants = Vec::new();
    let mut seen = HashSet::new();

    for (index, row) in reader.deserialize::<Participant>().enumerate() {
        let row_number = index + 1;
        let participant = row?;

        if participant.id.is_empty() {
            return Err(SantaError::DataError {
                row: row_number,
                message: "participant id (Employee_EmailID) is empty".to_string(),
            });
        }
        if participant.name.is_empty() {
            return Err(SantaError::DataError {
                row: row_number,
                message: format!("participant {} has no name", participant.id),
            });
        }
        if !seen.insert(participant.id.clone()) {
            return Err(SantaError::DataError {
                row: row_number,
                message: format!("duplicate participant id {}", participant.id),
            });
        }

        participants.push(participant);
    }

    tracing::debug!("Decoded {} participants", participants.len());
    Ok(participants)
}

/// Decodes the history log. Rows with a blank giver or recipient id are
/// skipped with a warning rather than failing the run.
pub fn decode_history(data: &[u8]) -> Result<Vec<HistoryEntry>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(data);
    let mut entries = Vec::new();

    for (index, row) in reader.deserialize::<HistoryEntry>().enumerate() {
        let mut entry = row?;
        if entry.giver_id.is_empty() || entry.recipient_id.is_empty() {
            tracing::warn!("Skipping history row {} with a blank id", index + 1);
            continue;
        }
        entry.giver_name = entry.giver_name.filter(|name| !name.is_empty());
        entry.recipient_name = entry.recipient_name.filter(|name| !name.is_empty());
        entry.period = entry.period.filter(|period| !period.is_empty());
        entries.push(entry);
    }

    tracing::debug!("Decoded {} history rows", entries.len());
    Ok(entries)
}

pub fn history_from_entries(entries: &[HistoryEntry]) -> History {
    History::from_pairings(entries.iter().map(HistoryEntry::pairing))
}

/// Appends the rows of `new` whose (giver, recipient) pair is not yet in
/// `existing`. Existing rows are never rewritten, reordered or removed.
pub fn append_history(existing: Vec<HistoryEntry>, new: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut history = history_from_entries(&existing);
    let mut log = existing;
    for entry in new {
        if history.merge([&entry.pairing()]) > 0 {
            log.push(entry);
        }
    }
    log
}

pub fn encode_history(entries: &[HistoryEntry]) -> Result<Vec<u8>> {
    encode_csv(entries)
}

pub fn encode_report(report: &[FormattedPairing], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => encode_csv(report),
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(report)?),
    }
}

fn encode_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| SantaError::IoError(e.into_error()))
}
