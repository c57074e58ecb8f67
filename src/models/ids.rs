//! Typed identifiers
//!
//! Each record kind gets its own UUID newtype, so a `ParticipantId` can't be
//! passed where an `EntryId` is expected. They display as a short prefixed
//! form (`ent-1a2b3c4d`) that users can type back on the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shortest abbreviation accepted by `matches`
const MIN_SHORT_LEN: usize = 4;
const DISPLAY_LEN: usize = 8;

macro_rules! define_ids {
    ($($(#[$meta:meta])* $name:ident => $prefix:literal;)+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// True when `text` is this ID's full UUID, or an abbreviation of at
            /// least four hex digits with or without the prefix
            pub fn matches(&self, text: &str) -> bool {
                abbreviation_matches(&self.0, Self::PREFIX, text)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let hex = self.0.simple().to_string();
                write!(f, "{}{}", Self::PREFIX, &hex[..DISPLAY_LEN])
            }
        }

        /// Parses a full UUID, optionally prefixed
        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Uuid::parse_str(s.strip_prefix(Self::PREFIX).unwrap_or(s)).map(Self)
            }
        }
    )+};
}

fn abbreviation_matches(id: &Uuid, prefix: &str, text: &str) -> bool {
    let text = text.trim();
    if let Ok(full) = Uuid::parse_str(text.strip_prefix(prefix).unwrap_or(text)) {
        return full == *id;
    }
    let short = text.strip_prefix(prefix).unwrap_or(text).to_ascii_lowercase();
    short.len() >= MIN_SHORT_LEN && id.hyphenated().to_string().starts_with(&short)
}

define_ids! {
    GroupId => "grp-";
    ParticipantId => "par-";
    EntryId => "ent-";
    /// Identifies one participant's share within an entry
    SplitId => "spl-";
    SettlementId => "stl-";
}
