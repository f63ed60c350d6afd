//! Destruction markers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use burnlink_core::types::id::LinkId;

use super::model::LinkRecord;

/// Why a link was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestructionCause {
    /// The single permitted view happened.
    Consumed,
    /// The countdown ran out.
    Expired,
    /// The administrator deleted the link.
    Revoked,
}

impl DestructionCause {
    /// Stable text form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumed => "consumed",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for DestructionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestructionCause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consumed" => Ok(Self::Consumed),
            "expired" => Ok(Self::Expired),
            "revoked" => Ok(Self::Revoked),
            other => Err(format!("unknown destruction cause '{other}'")),
        }
    }
}

/// Marker left behind when a record is removed.
///
/// A tombstone never makes the record reachable again. It lets the viewer
/// tell a consumed link apart from an unknown one, and keeps just enough
/// metadata to route capture reports for a consumed link to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tombstone {
    /// The destroyed link.
    pub id: LinkId,
    /// Why it was destroyed.
    pub cause: DestructionCause,
    /// When it was destroyed.
    pub destroyed_at: DateTime<Utc>,
    /// Display name of the destroyed document.
    pub file_name: String,
    /// Notification address of the destroyed link.
    pub notify_target: String,
}

impl Tombstone {
    /// Tombstone for `record` destroyed at `at`.
    pub fn for_record(record: &LinkRecord, cause: DestructionCause, at: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            cause,
            destroyed_at: at,
            file_name: record.file_name.clone(),
            notify_target: record.notify_target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_text_roundtrip() {
        for cause in [
            DestructionCause::Consumed,
            DestructionCause::Expired,
            DestructionCause::Revoked,
        ] {
            assert_eq!(cause.as_str().parse::<DestructionCause>(), Ok(cause));
        }
        assert!("burned".parse::<DestructionCause>().is_err());
    }
}
