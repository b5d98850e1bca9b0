use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::ledger::LedgerError;

/// Unique identifier for a participant in a settlement group.
///
/// A participant is anyone who shares in the group's expenses:
/// a housemate, a travel companion, a colleague on a team dinner.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("alice");
/// let bob = ParticipantId::new("bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new participant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this participant ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The fixed, closed set of participants for one settlement run.
///
/// The group is established before any expense is recorded and is
/// immutable for the lifetime of the run. Every expense is split
/// equally across exactly this set; expenses naming anyone outside
/// it are rejected by the ledger.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::participant::{Group, ParticipantId};
///
/// let group = Group::new(vec![
///     ParticipantId::new("alice"),
///     ParticipantId::new("bob"),
/// ]).unwrap();
/// assert_eq!(group.len(), 2);
/// assert!(group.contains(&ParticipantId::new("alice")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    members: Vec<ParticipantId>,
}

impl Group {
    /// Create a group from a list of members.
    ///
    /// Members are deduplicated and kept in sorted order so that two
    /// groups built from the same names compare equal regardless of
    /// input order. Fails with [`LedgerError::EmptyGroup`] if no
    /// members remain.
    pub fn new(members: Vec<ParticipantId>) -> Result<Self, LedgerError> {
        let mut members = members;
        members.sort();
        members.dedup();
        if members.is_empty() {
            return Err(LedgerError::EmptyGroup);
        }
        Ok(Self { members })
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        // Members are sorted, so membership is a binary search.
        self.members.binary_search(participant).is_ok()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in sorted order.
    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParticipantId> {
        self.members.iter()
    }
}
