//! Balance aggregator
//!
//! Folds a group's ledger entries and recorded settlements into one net
//! position per participant. Positive means the group owes the participant,
//! negative means the participant owes the group.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TallyError, TallyResult};
use crate::models::{EntryKind, LedgerEntry, Money, ParticipantId, Settlement};

use super::settle::SuggestedTransfer;

/// Net position of one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

/// Net positions for every participant of a group, in roster order
///
/// Always contains every participant, including those at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    balances: Vec<ParticipantBalance>,
}

impl Balances {
    /// Every participant at zero
    pub fn zeroed(participants: &[ParticipantId]) -> Self {
        Self {
            balances: participants
                .iter()
                .map(|id| ParticipantBalance {
                    participant_id: *id,
                    amount: Money::zero(),
                })
                .collect(),
        }
    }

    /// Build from explicit positions, keeping the given order
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ParticipantId, Money)>) -> Self {
        Self {
            balances: pairs
                .into_iter()
                .map(|(participant_id, amount)| ParticipantBalance {
                    participant_id,
                    amount,
                })
                .collect(),
        }
    }

    /// Position of a participant, if they are part of the group
    pub fn get(&self, participant_id: ParticipantId) -> Option<Money> {
        self.balances
            .iter()
            .find(|b| b.participant_id == participant_id)
            .map(|b| b.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantBalance> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all positions (zero for a consistent ledger)
    pub fn total(&self) -> Money {
        self.balances.iter().map(|b| b.amount).sum()
    }

    /// Whether nobody owes anything
    pub fn is_settled(&self) -> bool {
        self.balances.iter().all(|b| b.amount.is_zero())
    }

    /// Roster index of a participant
    pub fn position(&self, participant_id: ParticipantId) -> Option<usize> {
        self.balances
            .iter()
            .position(|b| b.participant_id == participant_id)
    }

    fn adjust(&mut self, participant_id: ParticipantId, delta: Money) -> TallyResult<()> {
        let slot = self
            .balances
            .iter_mut()
            .find(|b| b.participant_id == participant_id)
            .ok_or_else(|| TallyError::participant_reference(participant_id.to_string()))?;

        slot.amount = slot
            .amount
            .checked_add(delta)
            .ok_or_else(|| TallyError::Validation("Balance overflow".into()))?;
        Ok(())
    }

    /// Positions after the given transfers were paid
    ///
    /// A transfer moves money from the debtor to the creditor, so the debtor's
    /// position rises and the creditor's falls.
    pub fn apply_transfers(&self, transfers: &[SuggestedTransfer]) -> TallyResult<Self> {
        let mut next = self.clone();
        for transfer in transfers {
            next.adjust(transfer.from, transfer.amount)?;
            next.adjust(transfer.to, -transfer.amount)?;
        }
        Ok(next)
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = &'a ParticipantBalance;
    type IntoIter = std::slice::Iter<'a, ParticipantBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.balances.iter()
    }
}

/// Compute every participant's net position
///
/// - Expense and income: the payer is credited the full amount and each split
///   participant is debited their share.
/// - Transfer: the payer is credited and the single recipient debited.
/// - Settlement: the paying side is credited and the receiving side debited.
///
/// Fails with a reference error when an entry or settlement names someone
/// outside `participants`, and with a split mismatch when an entry's splits do
/// not add up to its amount.
pub fn compute_balances(
    entries: &[LedgerEntry],
    settlements: &[Settlement],
    participants: &[ParticipantId],
) -> TallyResult<Balances> {
    let mut balances = Balances::zeroed(participants);

    for entry in entries {
        if !entry.amount.is_positive() {
            return Err(TallyError::Validation(format!(
                "Entry {} has a non-positive amount",
                entry.id
            )));
        }
        if entry.kind == EntryKind::Transfer && entry.splits.len() != 1 {
            return Err(TallyError::Validation(format!(
                "Transfer {} must have exactly one recipient",
                entry.id
            )));
        }

        let total = entry.splits_total();
        if total != entry.amount {
            return Err(TallyError::SplitMismatch {
                expected: entry.amount,
                actual: total,
            });
        }

        balances.adjust(entry.payer_id, entry.amount)?;
        for split in &entry.splits {
            balances.adjust(split.participant_id, -split.amount)?;
        }
    }

    for settlement in settlements {
        if !settlement.amount.is_positive() {
            return Err(TallyError::Validation(format!(
                "Settlement {} has a non-positive amount",
                settlement.id
            )));
        }
        balances.adjust(settlement.from_id, settlement.amount)?;
        balances.adjust(settlement.to_id, -settlement.amount)?;
    }

    let total = balances.total();
    if !total.is_zero() {
        return Err(TallyError::Validation(format!(
            "Balances do not net to zero (off by {})",
            total
        )));
    }

    debug!(
        entries = entries.len(),
        settlements = settlements.len(),
        participants = participants.len(),
        "computed balances"
    );

    Ok(balances)
}

/// Per-participant breakdown behind a net position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant_id: ParticipantId,
    /// Expenses and transfers this participant paid
    pub paid: Money,
    /// Income this participant received for the group
    pub collected: Money,
    /// Shares of expenses, income and transfers assigned to them
    pub share: Money,
    /// Settlements they paid
    pub sent: Money,
    /// Settlements paid to them
    pub received: Money,
    /// Net position
    pub balance: Money,
}

impl ParticipantSummary {
    fn empty(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            paid: Money::zero(),
            collected: Money::zero(),
            share: Money::zero(),
            sent: Money::zero(),
            received: Money::zero(),
            balance: Money::zero(),
        }
    }
}

/// Break each participant's position down into what they paid and owe
///
/// `balance` always equals the position `compute_balances` reports.
pub fn summarize_participants(
    entries: &[LedgerEntry],
    settlements: &[Settlement],
    participants: &[ParticipantId],
) -> TallyResult<Vec<ParticipantSummary>> {
    let balances = compute_balances(entries, settlements, participants)?;

    let mut summaries: Vec<ParticipantSummary> = participants
        .iter()
        .map(|id| ParticipantSummary::empty(*id))
        .collect();
    let index_of = |id: ParticipantId| participants.iter().position(|p| *p == id);

    for entry in entries {
        if let Some(i) = index_of(entry.payer_id) {
            match entry.kind {
                EntryKind::Income => summaries[i].collected += entry.amount,
                EntryKind::Expense | EntryKind::Transfer => summaries[i].paid += entry.amount,
            }
        }
        for split in &entry.splits {
            if let Some(i) = index_of(split.participant_id) {
                summaries[i].share += split.amount;
            }
        }
    }

    for settlement in settlements {
        if let Some(i) = index_of(settlement.from_id) {
            summaries[i].sent += settlement.amount;
        }
        if let Some(i) = index_of(settlement.to_id) {
            summaries[i].received += settlement.amount;
        }
    }

    for summary in &mut summaries {
        summary.balance = balances
            .get(summary.participant_id)
            .unwrap_or_else(Money::zero);
    }

    Ok(summaries)
}
