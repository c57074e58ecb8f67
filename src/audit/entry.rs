//! Audit records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Which kind of ledger record was touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Group,
    Participant,
    Entry,
    Settlement,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Participant => "Participant",
            Self::Entry => "Entry",
            Self::Settlement => "Settlement",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the audit log
///
/// `before` holds the record as it was (updates and deletes), `after` as it
/// became (creates and updates).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,

    /// Short display ID, e.g. `ent-1a2b3c4d`
    pub entity_id: String,

    /// Group name, participant name or entry description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// "amount: $90.00 -> $30.00, splits recomputed"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

fn snapshot<T: Serialize>(record: &T) -> Option<Value> {
    serde_json::to_value(record).ok()
}

impl AuditEntry {
    fn stamped(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        record: &T,
    ) -> Self {
        Self::stamped(
            Operation::Create,
            entity_type,
            entity_id.into(),
            entity_name,
            None,
            snapshot(record),
        )
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            diff_summary,
            ..Self::stamped(
                Operation::Update,
                entity_type,
                entity_id.into(),
                entity_name,
                snapshot(before),
                snapshot(after),
            )
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        record: &T,
    ) -> Self {
        Self::stamped(
            Operation::Delete,
            entity_type,
            entity_id.into(),
            entity_name,
            snapshot(record),
            None,
        )
    }

    /// Rendering used by `tally audit`; updates get a second line with the changes
    pub fn format_human_readable(&self) -> String {
        let label = match &self.entity_name {
            Some(name) => format!(" ({})", name),
            None => String::new(),
        };
        let changes = match &self.diff_summary {
            Some(diff) => format!("\n  Changes: {}", diff),
            None => String::new(),
        };
        format!(
            "[{}] {} {} {}{}{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            label,
            changes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labels() {
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(EntityType::Participant.to_string(), "Participant");
    }

    #[test]
    fn test_snapshots_follow_operation() {
        let dinner = json!({"description": "Dinner", "amount": 9000});
        let lunch = json!({"description": "Dinner", "amount": 3000});

        let created = AuditEntry::create(EntityType::Entry, "ent-1a2b3c4d", None, &dinner);
        assert_eq!(created.operation, Operation::Create);
        assert_eq!(created.after, Some(dinner.clone()));
        assert!(created.before.is_none());

        let updated = AuditEntry::update(
            EntityType::Entry,
            "ent-1a2b3c4d",
            Some("Dinner".into()),
            &dinner,
            &lunch,
            Some("amount: $90.00 -> $30.00".into()),
        );
        assert_eq!(updated.operation, Operation::Update);
        assert_eq!(updated.before, Some(dinner.clone()));
        assert_eq!(updated.after, Some(lunch));

        let deleted = AuditEntry::delete(EntityType::Entry, "ent-1a2b3c4d", None, &dinner);
        assert_eq!(deleted.before, Some(dinner));
        assert!(deleted.after.is_none() && deleted.diff_summary.is_none());
    }

    #[test]
    fn test_json_line_omits_empty_fields() {
        let entry = AuditEntry::create(EntityType::Group, "grp-1", None, &json!({"name": "Trip"}));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"entity_type\":\"group\""));
        assert!(!line.contains("before") && !line.contains("diff_summary"));

        let back: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.entity_type, EntityType::Group);
        assert!(back.entity_name.is_none());
    }

    #[test]
    fn test_human_readable() {
        let added = AuditEntry::create(
            EntityType::Participant,
            "par-12345678",
            Some("Alice".into()),
            &json!({"name": "Alice"}),
        );
        assert!(added
            .format_human_readable()
            .ends_with("CREATE Participant par-12345678 (Alice)"));

        let edited = AuditEntry::update(
            EntityType::Entry,
            "ent-1a2b3c4d",
            None,
            &json!({}),
            &json!({}),
            Some("payer: Alice -> Bob".into()),
        );
        let text = edited.format_human_readable();
        assert!(text.contains("UPDATE Entry ent-1a2b3c4d\n  Changes: payer: Alice -> Bob"));
    }
}
