//! Ledger entry service
//!
//! Records expenses, income and transfers. Every create or edit is validated
//! against the group's roster and split before anything is written, so a
//! rejected entry leaves the store untouched.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::engine::compute_splits_for_payer;
use crate::error::{TallyError, TallyResult};
use crate::models::{
    EntryDraft, EntryId, GroupId, LedgerEntry, Money, ParticipantId, Roster, Split, SplitPolicy,
    SplitRequest,
};
use crate::storage::LedgerStore;

/// Changes to apply to an existing entry; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub payer_id: Option<ParticipantId>,
    /// New split policy and participants
    pub split: Option<(SplitPolicy, Vec<SplitRequest>)>,
}

impl EntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.payer_id.is_none()
            && self.split.is_none()
    }
}

/// Service for ledger entries
pub struct EntryService<'a, S: LedgerStore> {
    storage: &'a S,
}

impl<'a, S: LedgerStore> EntryService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Validate, split and record a new entry
    pub fn create(&self, draft: EntryDraft) -> TallyResult<LedgerEntry> {
        let roster = self.storage.fetch_group(draft.group_id)?;
        let entry = LedgerEntry::from_draft(&draft, split_draft(&draft, &roster)?);

        let entry = self.storage.persist_entry(entry)?;

        self.storage.log_create(
            EntityType::Entry,
            entry.id.to_string(),
            Some(label(&entry)),
            &entry,
        )?;
        info!(
            group = %entry.group_id,
            entry = %entry.id,
            kind = %entry.kind,
            amount = %entry.amount,
            "recorded entry"
        );

        Ok(entry)
    }

    pub fn get(&self, id: EntryId) -> TallyResult<Option<LedgerEntry>> {
        self.storage.get_entry(id)
    }

    /// Entries of a group ordered by date
    pub fn list(&self, group_id: GroupId) -> TallyResult<Vec<LedgerEntry>> {
        self.storage.fetch_entries(group_id)
    }

    /// Find an entry of the group by full or short ID
    pub fn find(&self, group_id: GroupId, identifier: &str) -> TallyResult<Option<LedgerEntry>> {
        Ok(self
            .storage
            .fetch_entries(group_id)?
            .into_iter()
            .find(|e| e.id.matches(identifier)))
    }

    pub fn resolve(&self, group_id: GroupId, identifier: &str) -> TallyResult<LedgerEntry> {
        self.find(group_id, identifier)?
            .ok_or_else(|| TallyError::entry_not_found(identifier))
    }

    /// Edit an entry and recompute its splits
    ///
    /// The stored raw split inputs are reused unless new ones are given, so an
    /// equal or weighted entry re-divides its new amount automatically while
    /// an exact-amount entry must be given matching amounts.
    pub fn update(&self, id: EntryId, changes: EntryUpdate) -> TallyResult<LedgerEntry> {
        let existing = self
            .storage
            .get_entry(id)?
            .ok_or_else(|| TallyError::entry_not_found(id.to_string()))?;
        if changes.is_empty() {
            return Ok(existing);
        }

        let roster = self.storage.fetch_group(existing.group_id)?;
        let mut draft = existing.to_draft();

        if let Some(amount) = changes.amount {
            draft.amount = amount;
        }
        if let Some(description) = changes.description {
            draft.description = description;
        }
        if let Some(date) = changes.date {
            draft.date = date;
        }
        if let Some(payer_id) = changes.payer_id {
            draft.payer_id = payer_id;
        }
        if let Some((policy, shares)) = changes.split {
            draft.policy = policy;
            draft.shares = shares;
        }
        if draft.kind.is_transfer() {
            for share in &mut draft.shares {
                share.custom_amount = Some(draft.amount);
            }
        }

        let splits = split_draft(&draft, &roster)?;
        let mut entry = LedgerEntry::from_draft(&draft, splits);
        entry.id = existing.id;
        entry.created_at = existing.created_at;

        let diff = describe_changes(&existing, &entry, &roster);
        let entry = self.storage.persist_entry(entry)?;

        self.storage.log_update(
            EntityType::Entry,
            entry.id.to_string(),
            Some(label(&entry)),
            &existing,
            &entry,
            diff,
        )?;
        debug!(entry = %entry.id, "updated entry");

        Ok(entry)
    }

    /// Remove an entry
    pub fn delete(&self, id: EntryId) -> TallyResult<LedgerEntry> {
        let entry = self.storage.delete_entry(id)?;

        self.storage.log_delete(
            EntityType::Entry,
            entry.id.to_string(),
            Some(label(&entry)),
            &entry,
        )?;
        info!(entry = %entry.id, "deleted entry");

        Ok(entry)
    }
}

fn split_draft(draft: &EntryDraft, roster: &Roster) -> TallyResult<Vec<Split>> {
    draft.validate(roster)?;
    let splits =
        compute_splits_for_payer(draft.amount, draft.policy, &draft.shares, draft.payer_id)?;
    debug!(
        policy = %draft.policy,
        participants = splits.len(),
        "computed splits"
    );
    Ok(splits)
}

fn label(entry: &LedgerEntry) -> String {
    if entry.description.is_empty() {
        format!("{} {}", entry.kind, entry.amount)
    } else {
        format!("{} {}", entry.description, entry.amount)
    }
}

fn describe_changes(before: &LedgerEntry, after: &LedgerEntry, roster: &Roster) -> Option<String> {
    let mut changes = Vec::new();

    if before.amount != after.amount {
        changes.push(format!("amount: {} -> {}", before.amount, after.amount));
    }
    if before.description != after.description {
        changes.push(format!(
            "description: '{}' -> '{}'",
            before.description, after.description
        ));
    }
    if before.date != after.date {
        changes.push(format!("date: {} -> {}", before.date, after.date));
    }
    if before.payer_id != after.payer_id {
        changes.push(format!(
            "payer: {} -> {}",
            roster.name_of(before.payer_id),
            roster.name_of(after.payer_id)
        ));
    }
    if before.policy != after.policy {
        changes.push(format!("policy: {} -> {}", before.policy, after.policy));
    }
    let shares = |e: &LedgerEntry| -> Vec<(ParticipantId, Money)> {
        e.splits.iter().map(|s| (s.participant_id, s.amount)).collect()
    };
    if shares(before) != shares(after) {
        changes.push("splits recomputed".to_string());
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_balances;
    use crate::models::{EntryKind, Group, Participant};
    use crate::storage::MemoryStore;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    /// Store with one group of A, B, C
    fn setup() -> (MemoryStore, GroupId, Vec<ParticipantId>) {
        let store = MemoryStore::new();
        let group = store.persist_group(Group::new("Trip")).unwrap();
        let ids = ["A", "B", "C"]
            .iter()
            .map(|n| {
                store
                    .persist_participant(Participant::new(group.id, *n))
                    .unwrap()
                    .id
            })
            .collect();
        (store, group.id, ids)
    }

    fn equal_draft(
        group: GroupId,
        payer: ParticipantId,
        cents: i64,
        ids: &[ParticipantId],
    ) -> EntryDraft {
        EntryDraft::new(
            group,
            payer,
            Money::from_cents(cents),
            SplitPolicy::Equal,
            ids.iter().map(|id| SplitRequest::equal(*id)).collect(),
            date(),
        )
    }

    fn balances(store: &MemoryStore, group: GroupId, ids: &[ParticipantId]) -> Vec<i64> {
        let entries = store.fetch_entries(group).unwrap();
        let settlements = store.fetch_settlements(group).unwrap();
        let balances = compute_balances(&entries, &settlements, ids).unwrap();
        ids.iter().map(|id| balances.get(*id).unwrap().cents()).collect()
    }

    #[test]
    fn test_equal_expense_three_way_balances() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);

        let entry = service
            .create(equal_draft(group, ids[0], 10000, &ids).with_description("Groceries"))
            .unwrap();
        assert_eq!(entry.splits_total(), entry.amount);

        assert_eq!(balances(&store, group, &ids), vec![6667, -3333, -3334]);
        assert_eq!(store.audit_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_exact_mismatch_is_not_persisted() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);

        let draft = EntryDraft::new(
            group,
            ids[0],
            Money::from_cents(5000),
            SplitPolicy::ExactAmount,
            vec![
                SplitRequest::exact(ids[0], Money::from_cents(2000)),
                SplitRequest::exact(ids[1], Money::from_cents(3500)),
            ],
            date(),
        );

        assert!(service.create(draft).unwrap_err().is_split_mismatch());
        assert!(service.list(group).unwrap().is_empty());
        assert!(store.audit_entries().unwrap().is_empty());
    }

    #[test]
    fn test_income_split() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);

        service
            .create(equal_draft(group, ids[1], 3000, &ids[..2]).with_kind(EntryKind::Income))
            .unwrap();

        assert_eq!(balances(&store, group, &ids), vec![-1500, 1500, 0]);
    }

    #[test]
    fn test_outsider_is_reference_error() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);

        let stranger = ParticipantId::new();
        let err = service
            .create(equal_draft(group, stranger, 1000, &ids))
            .unwrap_err();
        assert!(err.is_reference());

        let err = service
            .create(equal_draft(group, ids[0], 1000, &[ids[0], stranger]))
            .unwrap_err();
        assert!(err.is_reference());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);
        let err = service.create(equal_draft(group, ids[0], 0, &ids)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_group_is_not_found() {
        let (store, _group, ids) = setup();
        let service = EntryService::new(&store);
        let err = service
            .create(equal_draft(GroupId::new(), ids[0], 1000, &ids))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_transfer() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);

        let transfer = EntryDraft::transfer(group, ids[2], ids[0], Money::from_cents(2500), date());
        let entry = service.create(transfer).unwrap();
        assert_eq!(entry.recipient(), Some(ids[0]));

        assert_eq!(balances(&store, group, &ids), vec![-2500, 0, 2500]);

        let updated = service
            .update(
                entry.id,
                EntryUpdate {
                    amount: Some(Money::from_cents(1000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.splits[0].amount, Money::from_cents(1000));
    }

    #[test]
    fn test_update_recomputes_splits() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);
        let entry = service.create(equal_draft(group, ids[0], 9000, &ids)).unwrap();

        let updated = service
            .update(
                entry.id,
                EntryUpdate {
                    amount: Some(Money::from_cents(3000)),
                    description: Some("Taxi".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.created_at, entry.created_at);
        assert_eq!(updated.description, "Taxi");
        assert!(updated.splits.iter().all(|s| s.amount == Money::from_cents(1000)));
        assert_eq!(balances(&store, group, &ids), vec![2000, -1000, -1000]);

        let audit = store.audit_entries().unwrap();
        let diff = audit[1].diff_summary.as_deref().unwrap();
        assert!(diff.contains("amount: $90.00 -> $30.00"));
    }

    #[test]
    fn test_update_exact_amount_requires_matching_shares() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);
        let draft = EntryDraft::new(
            group,
            ids[0],
            Money::from_cents(5000),
            SplitPolicy::ExactAmount,
            vec![
                SplitRequest::exact(ids[0], Money::from_cents(2000)),
                SplitRequest::exact(ids[1], Money::from_cents(3000)),
            ],
            date(),
        );
        let entry = service.create(draft).unwrap();

        let err = service
            .update(
                entry.id,
                EntryUpdate {
                    amount: Some(Money::from_cents(6000)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_split_mismatch());
        assert_eq!(
            service.get(entry.id).unwrap().unwrap().amount,
            Money::from_cents(5000)
        );
    }

    #[test]
    fn test_delete() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);
        let entry = service.create(equal_draft(group, ids[0], 1000, &ids)).unwrap();

        service.delete(entry.id).unwrap();
        assert!(service.list(group).unwrap().is_empty());
        assert!(service.delete(entry.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_short_id() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);
        let entry = service.create(equal_draft(group, ids[0], 1000, &ids)).unwrap();

        let found = service.resolve(group, &entry.id.to_string()).unwrap();
        assert_eq!(found.id, entry.id);
        assert!(service.resolve(group, "ent-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_persistence_failure_passes_through() {
        let (store, group, ids) = setup();
        let service = EntryService::new(&store);
        store.set_read_only(true);

        let err = service.create(equal_draft(group, ids[0], 1000, &ids)).unwrap_err();
        assert!(matches!(err, TallyError::Persistence(_)));
        assert!(store.audit_entries().unwrap().is_empty());
    }
}
