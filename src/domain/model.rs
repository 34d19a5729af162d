use serde::{Deserialize, Serialize};

/// A member of the exchange. `id` (an email address in practice) is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "Employee_Name")]
    pub name: String,
    #[serde(rename = "Employee_EmailID")]
    pub id: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pairing {
    pub giver: String,
    pub recipient: String,
}

impl Pairing {
    pub fn new(giver: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            giver: giver.into(),
            recipient: recipient.into(),
        }
    }
}

/// One pairing per participant, listed in participant input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    pairings: Vec<Pairing>,
}

impl Assignment {
    pub fn new(pairings: Vec<Pairing>) -> Self {
        Self { pairings }
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pairing> {
        self.pairings.iter()
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.pairings
            .iter()
            .find(|p| p.giver == giver)
            .map(|p| p.recipient.as_str())
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a Pairing;
    type IntoIter = std::slice::Iter<'a, Pairing>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairings.iter()
    }
}

/// A pairing with both ends resolved to display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedPairing {
    #[serde(rename = "Employee_Name")]
    pub giver_name: String,
    #[serde(rename = "Employee_EmailID")]
    pub giver_id: String,
    #[serde(rename = "Secret_Child_Name")]
    pub recipient_name: String,
    #[serde(rename = "Secret_Child_EmailID")]
    pub recipient_id: String,
}

/// A row of the persisted history log. Older logs may carry only the id
/// columns, so everything else is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "Employee_Name", default)]
    pub giver_name: Option<String>,
    #[serde(rename = "Employee_EmailID")]
    pub giver_id: String,
    #[serde(rename = "Secret_Child_Name", default)]
    pub recipient_name: Option<String>,
    #[serde(rename = "Secret_Child_EmailID")]
    pub recipient_id: String,
    #[serde(rename = "Period", default)]
    pub period: Option<String>,
}

impl HistoryEntry {
    pub fn pairing(&self) -> Pairing {
        Pairing::new(self.giver_id.clone(), self.recipient_id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// What `Pipeline::extract` hands to `transform`.
#[derive(Debug, Clone)]
pub struct ExchangeInput {
    pub participants: Vec<Participant>,
    pub history_log: Vec<HistoryEntry>,
}

/// What `Pipeline::transform` hands to `load`.
#[derive(Debug, Clone)]
pub struct ExchangeResult {
    pub assignment: Assignment,
    pub report: Vec<FormattedPairing>,
    pub history_log: Vec<HistoryEntry>,
    pub history_entries_added: usize,
}
