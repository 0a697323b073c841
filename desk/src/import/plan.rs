//! Reconciling import rows against the attendees an event already has.

use auction_desk_client::{AttendeeRecord, BidderNumber, EventId, GuestId, GuestUpsert};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// One row of an attendee import file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based position in the file
    #[serde(default)]
    pub line: usize,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Contact email; the matching key
    #[serde(default)]
    pub email: String,
    /// Requested bidder number, as written in the file
    #[serde(default, deserialize_with = "text_or_number")]
    pub bidder_number: Option<String>,
}

impl ImportRow {
    /// Build a row
    #[must_use]
    pub fn new(line: usize, name: &str, email: &str, bidder_number: Option<&str>) -> Self {
        Self {
            line,
            name: name.to_string(),
            email: email.to_string(),
            bidder_number: bidder_number.map(str::to_string),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// A row that will not be imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportIssue {
    /// Line of the offending row
    pub line: usize,
    /// What is wrong with it
    pub message: String,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// What committing a row will do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportAction {
    /// No attendee with this email yet
    Create {
        /// Source line
        line: usize,
        /// New guest
        guest: GuestUpsert,
    },
    /// Existing attendee whose name or number changes
    Update {
        /// Source line
        line: usize,
        /// Attendee being updated
        guest_id: GuestId,
        /// New values
        guest: GuestUpsert,
    },
    /// Existing attendee already matching the row
    Unchanged {
        /// Source line
        line: usize,
        /// Matching attendee
        guest_id: GuestId,
    },
}

impl ImportAction {
    /// Source line
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Create { line, .. } | Self::Update { line, .. } | Self::Unchanged { line, .. } => {
                *line
            },
        }
    }
}

impl fmt::Display for ImportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { line, guest } => {
                write!(f, "line {line}: create {} <{}>", guest.name, guest.email)?;
                if let Some(number) = guest.bidder_number {
                    write!(f, " with bidder number {number}")?;
                }
                Ok(())
            },
            Self::Update {
                line,
                guest_id,
                guest,
            } => {
                write!(f, "line {line}: update {guest_id} as {}", guest.name)?;
                if let Some(number) = guest.bidder_number {
                    write!(f, " with bidder number {number}")?;
                }
                Ok(())
            },
            Self::Unchanged { line, guest_id } => write!(f, "line {line}: {guest_id} unchanged"),
        }
    }
}

/// A row asking for a number another attendee holds
///
/// The backend settles it with a swap when the row is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapWarning {
    /// Source line
    pub line: usize,
    /// Requested number
    pub number: BidderNumber,
    /// Attendee currently holding it
    pub holder_id: GuestId,
}

impl fmt::Display for SwapWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: bidder number {} is held by {} and will be swapped",
            self.line, self.number, self.holder_id
        )
    }
}

/// Everything an import would do, computed without touching the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlan {
    /// Target event
    pub event_id: EventId,
    /// One action per accepted row, in file order
    pub actions: Vec<ImportAction>,
    /// Rejected rows, in file order
    pub issues: Vec<ImportIssue>,
    /// Accepted rows that will trigger a swap
    pub swap_warnings: Vec<SwapWarning>,
}

impl ImportPlan {
    /// Rows that create a guest
    #[must_use]
    pub fn creates(&self) -> usize {
        self.count(|a| matches!(a, ImportAction::Create { .. }))
    }

    /// Rows that update an attendee
    #[must_use]
    pub fn updates(&self) -> usize {
        self.count(|a| matches!(a, ImportAction::Update { .. }))
    }

    /// Rows needing no request
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(|a| matches!(a, ImportAction::Unchanged { .. }))
    }

    fn count(&self, f: impl Fn(&ImportAction) -> bool) -> usize {
        self.actions.iter().filter(|&a| f(a)).count()
    }
}

/// Validate `rows` and match them against `existing` attendees.
///
/// Matching is by email, ignoring case and cancelled attendees. For
/// duplicate emails or bidder numbers within the file, the first row wins
/// and later ones become issues.
#[must_use]
pub fn plan_import(event_id: &EventId, rows: &[ImportRow], existing: &[AttendeeRecord]) -> ImportPlan {
    let active: Vec<&AttendeeRecord> = existing.iter().filter(|a| !a.status.is_cancelled()).collect();

    let by_email: HashMap<String, &AttendeeRecord> = active
        .iter()
        .filter_map(|a| a.email.as_deref().map(|email| (normalize_email(email), *a)))
        .collect();
    let by_number: HashMap<BidderNumber, &GuestId> = active
        .iter()
        .filter_map(|a| a.bidder_number.map(|number| (number, &a.id)))
        .collect();

    let mut plan = ImportPlan {
        event_id: event_id.clone(),
        actions: Vec::with_capacity(rows.len()),
        issues: Vec::new(),
        swap_warnings: Vec::new(),
    };
    let mut seen_emails: HashMap<String, usize> = HashMap::new();
    let mut seen_numbers: HashMap<BidderNumber, usize> = HashMap::new();

    for row in rows {
        let (name, email, number) = match validate(row) {
            Ok(valid) => valid,
            Err(message) => {
                plan.issues.push(ImportIssue { line: row.line, message });
                continue;
            },
        };

        let key = normalize_email(email);
        match seen_emails.entry(key.clone()) {
            Entry::Occupied(first) => {
                plan.issues.push(ImportIssue {
                    line: row.line,
                    message: format!("Duplicate email {email} (first seen on line {})", first.get()),
                });
                continue;
            },
            Entry::Vacant(slot) => {
                if let Some(number) = number {
                    if let Some(first) = seen_numbers.get(&number) {
                        plan.issues.push(ImportIssue {
                            line: row.line,
                            message: format!("Bidder number {number} already requested on line {first}"),
                        });
                        continue;
                    }
                    seen_numbers.insert(number, row.line);
                }
                slot.insert(row.line);
            },
        }

        let matched = by_email.get(&key).copied();
        let guest = GuestUpsert {
            name: name.to_string(),
            email: email.to_string(),
            bidder_number: number,
        };

        if let Some(number) = number {
            if let Some(holder_id) = by_number.get(&number) {
                if matched.is_none_or(|m| &m.id != *holder_id) {
                    plan.swap_warnings.push(SwapWarning {
                        line: row.line,
                        number,
                        holder_id: (*holder_id).clone(),
                    });
                }
            }
        }

        let action = match matched {
            None => ImportAction::Create {
                line: row.line,
                guest,
            },
            Some(attendee) => {
                let same_name = attendee.name.as_deref().map(str::trim) == Some(name);
                let same_number = number.is_none() || number == attendee.bidder_number;
                if same_name && same_number {
                    ImportAction::Unchanged {
                        line: row.line,
                        guest_id: attendee.id.clone(),
                    }
                } else {
                    ImportAction::Update {
                        line: row.line,
                        guest_id: attendee.id.clone(),
                        guest,
                    }
                }
            },
        };
        plan.actions.push(action);
    }

    plan
}

fn validate(row: &ImportRow) -> Result<(&str, &str, Option<BidderNumber>), String> {
    let name = row.name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    let email = row.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("A valid email is required".to_string());
    }

    let number = match row.bidder_number.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => Some(BidderNumber::parse(text).map_err(|e| e.to_string())?),
    };

    Ok((name, email, number))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
