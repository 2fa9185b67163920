use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a question, e.g. `"6f1c2a0e-..."`.
///
/// Assigned once when the question is created and never reassigned. Used as the key of
/// [`Responses`](crate::Responses), so a question that keeps its id keeps its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

/// Opaque identifier of a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(Uuid);

impl QuestionId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FormId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for QuestionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Source of fresh identifiers.
///
/// Implementations must never hand out the same value twice within a session.
pub trait IdSource {
    /// Produce the next unused UUID.
    fn next_uuid(&mut self) -> Uuid;

    /// Produce a fresh question id.
    fn question_id(&mut self) -> QuestionId {
        QuestionId(self.next_uuid())
    }

    /// Produce a fresh form id.
    fn form_id(&mut self) -> FormId {
        FormId(self.next_uuid())
    }
}

/// Random v4 UUIDs. The default id source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Counts upwards from 1, so ids are predictable in tests and snapshots.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Create a counter starting at 1.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_uuid(&mut self) -> Uuid {
        self.next += 1;
        Uuid::from_u128(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_never_repeat() {
        let mut ids = SequentialIds::new();
        let a = ids.question_id();
        let b = ids.question_id();
        let c = ids.form_id();
        assert_ne!(a, b);
        assert_eq!(c.as_uuid(), &Uuid::from_u128(3));
    }

    #[test]
    fn uuid_source_produces_v4() {
        let id = UuidSource.question_id();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn display_and_parse() {
        let id = QuestionId::from_uuid(Uuid::from_u128(7));
        let parsed: QuestionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = QuestionId::from_uuid(Uuid::from_u128(1));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000001\"");
    }
}
