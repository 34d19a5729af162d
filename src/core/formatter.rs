use crate::domain::model::{Assignment, FormattedPairing, HistoryEntry, Participant};
use crate::utils::error::{Result, SantaError};
use std::collections::HashMap;

/// Resolves both ends of every pairing to a display name.
///
/// An id missing from `participants` means the assignment was not produced
/// from this participant list, which is reported as a consistency error.
pub fn format_assignment(
    assignment: &Assignment,
    participants: &[Participant],
) -> Result<Vec<FormattedPairing>> {
    let by_id: HashMap<&str, &Participant> =
        participants.iter().map(|p| (p.id.as_str(), p)).collect();

    let lookup = |id: &str| {
        by_id.get(id).copied().ok_or_else(|| {
            SantaError::consistency(format!("assignment references unknown participant {}", id))
        })
    };

    assignment
        .iter()
        .map(|pairing| {
            let giver = lookup(&pairing.giver)?;
            let recipient = lookup(&pairing.recipient)?;
            Ok(FormattedPairing {
                giver_name: giver.name.clone(),
                giver_id: giver.id.clone(),
                recipient_name: recipient.name.clone(),
                recipient_id: recipient.id.clone(),
            })
        })
        .collect()
}

pub fn history_entries(report: &[FormattedPairing], period: &str) -> Vec<HistoryEntry> {
    report
        .iter()
        .map(|row| HistoryEntry {
            giver_name: Some(row.giver_name.clone()),
            giver_id: row.giver_id.clone(),
            recipient_name: Some(row.recipient_name.clone()),
            recipient_id: row.recipient_id.clone(),
            period: Some(period.to_string()),
        })
        .collect()
}
