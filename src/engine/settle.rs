//! Settlement suggestions
//!
//! Turns net balances into transfers that, once paid, zero every balance.
//! Strategies sit behind [`SettlementStrategy`] so the matching algorithm can
//! be swapped without touching the balance aggregator. Suggestions are never
//! persisted here; recording one is a separate, explicit step.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{TallyError, TallyResult};
use crate::models::{Money, ParticipantId};

use super::balances::Balances;

/// Largest number of non-zero balances the exact strategy searches over
pub const MAX_EXACT_PARTICIPANTS: usize = 16;

/// A proposed payment from a debtor to a creditor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTransfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Balances in, ordered transfer suggestions out
pub trait SettlementStrategy {
    /// Short name used in settings and logs
    fn name(&self) -> &'static str;

    /// Suggest transfers that zero `balances`
    ///
    /// Must not mutate anything; the result is ordered by debtor, then
    /// creditor, in roster order.
    fn suggest(&self, balances: &Balances) -> TallyResult<Vec<SuggestedTransfer>>;

    /// Balances this close to zero are left unsettled by `suggest`
    fn tolerance(&self) -> Money {
        Money::zero()
    }
}

/// Which settlement strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Largest debtor pays largest creditor, repeatedly
    #[default]
    Greedy,
    /// Fewest possible transfers, searched exhaustively
    Exact,
}

impl StrategyKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Some(Self::Greedy),
            "exact" | "minimal" | "optimal" => Some(Self::Exact),
            _ => None,
        }
    }

    /// Build the strategy; `tolerance` is ignored by the exact strategy
    pub fn build(self, tolerance: Money) -> Box<dyn SettlementStrategy> {
        match self {
            Self::Greedy => Box::new(GreedySettlement::with_tolerance(tolerance)),
            Self::Exact => Box::new(ExactSettlement),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

/// Suggest settlements with the default greedy strategy
pub fn suggest_settlements(balances: &Balances) -> TallyResult<Vec<SuggestedTransfer>> {
    GreedySettlement::default().suggest(balances)
}

/// Largest-first matching
///
/// Deterministic for a fixed balance mapping. Optimal for the common case of
/// one creditor and several debtors (or the reverse), but not always minimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySettlement {
    /// Balances within this distance of zero are treated as settled
    pub tolerance: Money,
}

impl GreedySettlement {
    pub fn with_tolerance(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

impl SettlementStrategy for GreedySettlement {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn tolerance(&self) -> Money {
        self.tolerance
    }

    fn suggest(&self, balances: &Balances) -> TallyResult<Vec<SuggestedTransfer>> {
        check_balanced(balances, self.tolerance)?;

        let mut open = open_positions(balances, self.tolerance);
        let transfers = greedy_match(&mut open, self.tolerance.cents());

        debug!(
            strategy = self.name(),
            transfers = transfers.len(),
            "suggested settlements"
        );
        Ok(sorted(transfers, balances))
    }
}

/// Fewest-transfers matching
///
/// Splits the non-zero balances into as many zero-sum groups as possible;
/// each group of k participants then settles in k - 1 transfers. The search
/// is exponential, so above [`MAX_EXACT_PARTICIPANTS`] non-zero balances it
/// falls back to greedy matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSettlement;

impl SettlementStrategy for ExactSettlement {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn suggest(&self, balances: &Balances) -> TallyResult<Vec<SuggestedTransfer>> {
        check_balanced(balances, Money::zero())?;

        let open = open_positions(balances, Money::zero());
        if open.len() > MAX_EXACT_PARTICIPANTS {
            warn!(
                participants = open.len(),
                limit = MAX_EXACT_PARTICIPANTS,
                "too many open balances for exact settlement, using greedy matching"
            );
            return GreedySettlement::default().suggest(balances);
        }

        let mut transfers = Vec::new();
        for mut group in zero_sum_groups(&open) {
            transfers.extend(greedy_match(&mut group, 0));
        }

        debug!(
            strategy = self.name(),
            transfers = transfers.len(),
            "suggested settlements"
        );
        Ok(sorted(transfers, balances))
    }
}

#[derive(Debug, Clone, Copy)]
struct Position {
    index: usize,
    participant_id: ParticipantId,
    cents: i64,
}

fn check_balanced(balances: &Balances, tolerance: Money) -> TallyResult<()> {
    let total = balances.total();
    let allowed = tolerance.cents().saturating_mul(balances.len() as i64);
    if total.cents().abs() > allowed {
        return Err(TallyError::Validation(format!(
            "Balances must net to zero before settling (off by {})",
            total
        )));
    }
    Ok(())
}

fn open_positions(balances: &Balances, tolerance: Money) -> Vec<Position> {
    balances
        .iter()
        .enumerate()
        .filter(|(_, b)| b.amount.abs() > tolerance)
        .map(|(index, b)| Position {
            index,
            participant_id: b.participant_id,
            cents: b.amount.cents(),
        })
        .collect()
}

/// Repeatedly pay the largest creditor from the largest debtor
///
/// Ties go to the participant earlier in the roster.
fn greedy_match(open: &mut [Position], tolerance: i64) -> Vec<SuggestedTransfer> {
    let mut transfers = Vec::new();

    loop {
        let debtor = open
            .iter()
            .enumerate()
            .filter(|(_, p)| p.cents < -tolerance)
            .min_by(|(_, a), (_, b)| a.cents.cmp(&b.cents).then(a.index.cmp(&b.index)))
            .map(|(i, _)| i);
        let creditor = open
            .iter()
            .enumerate()
            .filter(|(_, p)| p.cents > tolerance)
            .max_by(|(_, a), (_, b)| a.cents.cmp(&b.cents).then(b.index.cmp(&a.index)))
            .map(|(i, _)| i);

        let (Some(d), Some(c)) = (debtor, creditor) else {
            break;
        };

        let amount = (-open[d].cents).min(open[c].cents);
        open[d].cents += amount;
        open[c].cents -= amount;

        transfers.push(SuggestedTransfer {
            from: open[d].participant_id,
            to: open[c].participant_id,
            amount: Money::from_cents(amount),
        });
    }

    transfers
}

/// Partition open positions into the largest number of zero-sum groups
fn zero_sum_groups(open: &[Position]) -> Vec<Vec<Position>> {
    let n = open.len();
    if n == 0 {
        return Vec::new();
    }

    let full = (1usize << n) - 1;
    let mut sums = vec![0i64; full + 1];
    let mut best = vec![0u32; full + 1];

    for mask in 1..=full {
        let low = mask.trailing_zeros() as usize;
        sums[mask] = sums[mask & (mask - 1)] + open[low].cents;

        let mut most = 0;
        for (i, _) in open.iter().enumerate() {
            if mask & (1 << i) != 0 {
                most = most.max(best[mask ^ (1 << i)]);
            }
        }
        best[mask] = most + u32::from(sums[mask] == 0);
    }

    // Walk back from the full set; zero-sum prefixes mark group boundaries
    let mut removal = Vec::with_capacity(n);
    let mut mask = full;
    while mask != 0 {
        let mut pick = None;
        for i in 0..n {
            if mask & (1 << i) == 0 {
                continue;
            }
            let rest = best[mask ^ (1 << i)];
            if pick.map_or(true, |(_, r)| rest > r) {
                pick = Some((i, rest));
            }
        }
        let Some((i, _)) = pick else { break };
        removal.push(i);
        mask ^= 1 << i;
    }
    removal.reverse();

    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut running = 0i64;
    for i in removal {
        current.push(open[i]);
        running += open[i].cents;
        if running == 0 {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

fn sorted(mut transfers: Vec<SuggestedTransfer>, balances: &Balances) -> Vec<SuggestedTransfer> {
    transfers.sort_by_key(|t| (balances.position(t.from), balances.position(t.to)));
    transfers
}
