//! Randomized assignment of gift recipients.
//!
//! Each attempt shuffles the participants, then walks them in that order and
//! lets every giver pick uniformly among the recipients that are not
//! themselves, not in their history and not already claimed this attempt. An
//! attempt that leaves a giver without candidates is abandoned and a fresh
//! shuffle is tried, up to `max_attempts` times.
//!
//! There is no backtracking inside an attempt, so the engine can report
//! failure even when a valid assignment exists (for example when the allowed
//! pairs form one narrow cycle and few orderings reach it). Callers treat
//! [`SantaError::ConstraintUnsatisfiable`] as "try again".

use crate::core::history::History;
use crate::domain::model::{Assignment, Pairing, Participant};
use crate::utils::error::{Result, SantaError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentConfig {
    pub max_attempts: usize,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine {
    config: AssignmentConfig,
}

impl AssignmentEngine {
    pub fn new(config: AssignmentConfig) -> Self {
        Self { config }
    }

    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self::new(AssignmentConfig { max_attempts })
    }

    pub fn config(&self) -> &AssignmentConfig {
        &self.config
    }

    pub fn assign(&self, participants: &[Participant], history: &History) -> Result<Assignment> {
        self.assign_with_rng(participants, history, &mut rand::thread_rng())
    }

    /// Participant ids are assumed unique; duplicates are rejected when the
    /// participant file is decoded.
    pub fn assign_with_rng<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        history: &History,
        rng: &mut R,
    ) -> Result<Assignment> {
        if participants.len() < 2 {
            return Err(SantaError::input(format!(
                "at least two participants are required, got {}",
                participants.len()
            )));
        }

        let mut order: Vec<usize> = (0..participants.len()).collect();

        for attempt in 1..=self.config.max_attempts {
            order.shuffle(rng);

            if let Some(recipients) = try_attempt(participants, history, &order, rng) {
                tracing::debug!(
                    "Found assignment for {} participants on attempt {}",
                    participants.len(),
                    attempt
                );
                let pairings = participants
                    .iter()
                    .zip(recipients)
                    .map(|(giver, recipient)| {
                        Pairing::new(giver.id.as_str(), participants[recipient].id.as_str())
                    })
                    .collect();
                return Ok(Assignment::new(pairings));
            }

            tracing::trace!("Attempt {} hit a giver with no candidates", attempt);
        }

        tracing::warn!(
            "No valid assignment for {} participants after {} attempts",
            participants.len(),
            self.config.max_attempts
        );
        Err(SantaError::ConstraintUnsatisfiable {
            attempts: self.config.max_attempts,
        })
    }
}

/// One greedy pass over `order`. On success, returns the recipient index for
/// every giver index.
fn try_attempt<R: Rng + ?Sized>(
    participants: &[Participant],
    history: &History,
    order: &[usize],
    rng: &mut R,
) -> Option<Vec<usize>> {
    let mut claimed = vec![false; participants.len()];
    let mut recipient_of = vec![usize::MAX; participants.len()];

    for &giver in order {
        let past = history.record(&participants[giver].id);
        let candidates: Vec<usize> = (0..participants.len())
            .filter(|&r| r != giver && !claimed[r] && !past.contains(&participants[r].id))
            .collect();

        let &recipient = candidates.choose(rng)?;
        claimed[recipient] = true;
        recipient_of[giver] = recipient;
    }

    Some(recipient_of)
}

impl Assignment {
    /// Re-checks that this is a derangement of `participants` that avoids
    /// every pair in `history`.
    pub fn verify(&self, participants: &[Participant], history: &History) -> Result<()> {
        if self.len() != participants.len() {
            return Err(SantaError::consistency(format!(
                "assignment has {} pairings for {} participants",
                self.len(),
                participants.len()
            )));
        }

        let ids: HashSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
        let mut givers = HashSet::new();
        let mut recipients = HashSet::new();

        for pairing in self {
            if !ids.contains(pairing.giver.as_str()) || !ids.contains(pairing.recipient.as_str()) {
                return Err(SantaError::consistency(format!(
                    "pairing {} -> {} references an unknown participant",
                    pairing.giver, pairing.recipient
                )));
            }
            if pairing.giver == pairing.recipient {
                return Err(SantaError::consistency(format!(
                    "{} is assigned to themselves",
                    pairing.giver
                )));
            }
            if !givers.insert(pairing.giver.as_str()) {
                return Err(SantaError::consistency(format!(
                    "{} gives more than once",
                    pairing.giver
                )));
            }
            if !recipients.insert(pairing.recipient.as_str()) {
                return Err(SantaError::consistency(format!(
                    "{} receives more than once",
                    pairing.recipient
                )));
            }
            if history.contains(&pairing.giver, &pairing.recipient) {
                return Err(SantaError::consistency(format!(
                    "{} -> {} repeats a past pairing",
                    pairing.giver, pairing.recipient
                )));
            }
        }

        Ok(())
    }
}
