use crate::domain::model::Pairing;
use std::collections::{BTreeMap, BTreeSet};

static NO_RECIPIENTS: BTreeSet<String> = BTreeSet::new();

/// Every recipient each giver has ever been assigned, across all periods.
///
/// Append-only: there is no removal operation. Pairs are stored with set
/// semantics per giver, so merging the same pairing twice is a no-op. The
/// store trusts its input and does not check that a pairing was ever valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    by_giver: BTreeMap<String, BTreeSet<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairings<I>(pairings: I) -> Self
    where
        I: IntoIterator<Item = Pairing>,
    {
        let mut history = Self::new();
        for pairing in pairings {
            history.insert(pairing.giver, pairing.recipient);
        }
        history
    }

    /// Prior recipients of `giver`; empty if the giver was never seen.
    pub fn record(&self, giver: &str) -> &BTreeSet<String> {
        self.by_giver.get(giver).unwrap_or(&NO_RECIPIENTS)
    }

    pub fn contains(&self, giver: &str, recipient: &str) -> bool {
        self.by_giver
            .get(giver)
            .is_some_and(|recipients| recipients.contains(recipient))
    }

    /// Returns `true` if the pair was not already present.
    pub fn insert(&mut self, giver: impl Into<String>, recipient: impl Into<String>) -> bool {
        self.by_giver
            .entry(giver.into())
            .or_default()
            .insert(recipient.into())
    }

    /// Adds every pairing, returning how many were new.
    pub fn merge<'a, I>(&mut self, pairings: I) -> usize
    where
        I: IntoIterator<Item = &'a Pairing>,
    {
        let mut added = 0;
        for pairing in pairings {
            if self.insert(pairing.giver.as_str(), pairing.recipient.as_str()) {
                added += 1;
            }
        }
        added
    }

    pub fn giver_count(&self) -> usize {
        self.by_giver.len()
    }

    pub fn pair_count(&self) -> usize {
        self.by_giver.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_giver.is_empty()
    }

    /// All recorded pairs, sorted by giver then recipient.
    pub fn pairings(&self) -> impl Iterator<Item = Pairing> + '_ {
        self.by_giver.iter().flat_map(|(giver, recipients)| {
            recipients
                .iter()
                .map(move |recipient| Pairing::new(giver.as_str(), recipient.as_str()))
        })
    }
}
