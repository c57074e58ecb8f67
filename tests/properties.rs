//! Property-based tests for the split, balance and settlement engine.

use chrono::NaiveDate;
use proptest::prelude::*;

use tally::engine::{
    compute_splits_for_payer, equal_shares, Balances, ExactSettlement, GreedySettlement,
    SettlementStrategy,
};
use tally::models::{
    EntryDraft, GroupId, LedgerEntry, Money, ParticipantId, SplitPolicy, SplitRequest,
};
use tally::{compute_balances, compute_splits, suggest_settlements};

// ============================================================================
// Strategies
// ============================================================================

/// Positive amounts up to 100,000.00
fn amount_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

/// Integer-valued weights keep the expected proportions easy to reason about
fn weights_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1u32..20u32).prop_map(f64::from), 1..8)
}

/// Net balances that sum to zero: random values plus one balancing entry
fn balances_strategy(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50_000i64..50_000i64, 1..max_len).prop_map(|mut values| {
        let total: i64 = values.iter().sum();
        values.push(-total);
        values
    })
}

/// (payer index, amount, participant mask, weighted?) for a group of `n`
fn ledger_strategy(n: usize) -> impl Strategy<Value = Vec<(usize, i64, u32, bool)>> {
    let mask_max = (1u32 << n) - 1;
    prop::collection::vec(
        (0..n, amount_strategy(), 1..=mask_max, any::<bool>()),
        0..12,
    )
}

fn people(n: usize) -> Vec<ParticipantId> {
    (0..n).map(|_| ParticipantId::new()).collect()
}

fn balances_of(values: &[i64]) -> (Vec<ParticipantId>, Balances) {
    let ids = people(values.len());
    let balances = Balances::from_pairs(
        ids.iter()
            .copied()
            .zip(values.iter().map(|v| Money::from_cents(*v))),
    );
    (ids, balances)
}

fn build_ledger(ids: &[ParticipantId], rows: &[(usize, i64, u32, bool)]) -> Vec<LedgerEntry> {
    let group = GroupId::new();
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    rows.iter()
        .enumerate()
        .map(|(i, (payer, amount, mask, weighted))| {
            let members = ids
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, id)| *id);
            let (policy, shares): (SplitPolicy, Vec<_>) = if *weighted {
                (
                    SplitPolicy::Weighted,
                    members
                        .enumerate()
                        .map(|(k, id)| SplitRequest::weighted(id, (k + i + 1) as f64))
                        .collect(),
                )
            } else {
                (SplitPolicy::Equal, members.map(SplitRequest::equal).collect())
            };

            let draft = EntryDraft::new(
                group,
                ids[*payer],
                Money::from_cents(*amount),
                policy,
                shares,
                date,
            );
            let splits =
                compute_splits_for_payer(draft.amount, draft.policy, &draft.shares, draft.payer_id)
                    .unwrap();
            LedgerEntry::from_draft(&draft, splits)
        })
        .collect()
}

// ============================================================================
// Split calculator
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: equal shares add up and differ by at most one cent**
    #[test]
    fn prop_equal_split_is_exact_and_fair(
        amount in amount_strategy(),
        count in 1usize..12,
    ) {
        let ids = people(count);
        let requests: Vec<_> = ids.iter().map(|id| SplitRequest::equal(*id)).collect();
        let splits = compute_splits(Money::from_cents(amount), SplitPolicy::Equal, &requests).unwrap();

        let shares: Vec<i64> = splits.iter().map(|s| s.amount.cents()).collect();
        prop_assert_eq!(shares.iter().sum::<i64>(), amount);

        let max = *shares.iter().max().unwrap();
        let min = *shares.iter().min().unwrap();
        prop_assert!(max - min <= 1, "shares differ by more than a cent: {:?}", shares);

        // Larger shares always come first
        prop_assert!(shares.windows(2).all(|w| w[0] >= w[1]));
    }

    /// **Property: the payer-relative split is a rotation of the plain one**
    #[test]
    fn prop_payer_relative_split_keeps_totals(
        amount in amount_strategy(),
        count in 1usize..10,
        payer in 0usize..10,
    ) {
        let ids = people(count);
        let payer = ids[payer % count];
        let requests: Vec<_> = ids.iter().map(|id| SplitRequest::equal(*id)).collect();

        let splits = compute_splits_for_payer(
            Money::from_cents(amount),
            SplitPolicy::Equal,
            &requests,
            payer,
        )
        .unwrap();

        let order: Vec<_> = splits.iter().map(|s| s.participant_id).collect();
        prop_assert_eq!(order, ids);

        let mut shares: Vec<i64> = splits.iter().map(|s| s.amount.cents()).collect();
        let mut expected: Vec<i64> = equal_shares(Money::from_cents(amount), count)
            .into_iter()
            .map(|m| m.cents())
            .collect();
        shares.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(shares, expected);
    }

    /// **Property: weighted shares add up exactly and stay within a cent of their ideal**
    #[test]
    fn prop_weighted_split_is_exact(
        amount in amount_strategy(),
        weights in weights_strategy(),
    ) {
        let ids = people(weights.len());
        let requests: Vec<_> = ids
            .iter()
            .zip(&weights)
            .map(|(id, w)| SplitRequest::weighted(*id, *w))
            .collect();
        let splits = compute_splits(Money::from_cents(amount), SplitPolicy::Weighted, &requests).unwrap();

        let total: i64 = splits.iter().map(|s| s.amount.cents()).sum();
        prop_assert_eq!(total, amount);

        let weight_total: f64 = weights.iter().sum();
        for (split, weight) in splits.iter().zip(&weights) {
            let ideal = amount as f64 * weight / weight_total;
            prop_assert!((split.amount.cents() as f64 - ideal).abs() < 1.0 + 1e-6);
        }
    }

    /// **Property: a zero or negative weight is always rejected**
    #[test]
    fn prop_non_positive_weight_rejected(
        amount in amount_strategy(),
        weights in weights_strategy(),
        bad in prop_oneof![Just(0.0), Just(-1.0), Just(f64::NAN)],
    ) {
        let ids = people(weights.len() + 1);
        let mut requests: Vec<_> = ids
            .iter()
            .zip(&weights)
            .map(|(id, w)| SplitRequest::weighted(*id, *w))
            .collect();
        requests.push(SplitRequest::weighted(ids[weights.len()], bad));

        let err = compute_splits(Money::from_cents(amount), SplitPolicy::Weighted, &requests).unwrap_err();
        prop_assert!(err.is_validation());
    }

    /// **Property: exact shares that add up are kept as given**
    #[test]
    fn prop_exact_split_keeps_amounts(parts in prop::collection::vec(0i64..100_000, 1..8)) {
        prop_assume!(parts.iter().sum::<i64>() > 0);
        let ids = people(parts.len());
        let requests: Vec<_> = ids
            .iter()
            .zip(&parts)
            .map(|(id, p)| SplitRequest::exact(*id, Money::from_cents(*p)))
            .collect();
        let amount = Money::from_cents(parts.iter().sum());

        let splits = compute_splits(amount, SplitPolicy::ExactAmount, &requests).unwrap();
        let shares: Vec<i64> = splits.iter().map(|s| s.amount.cents()).collect();
        prop_assert_eq!(shares, parts);
    }
}

// ============================================================================
// Balance aggregator
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: balances always net to zero**
    #[test]
    fn prop_balances_net_to_zero(
        (n, rows) in (2usize..6).prop_flat_map(|n| (Just(n), ledger_strategy(n))),
    ) {
        let ids = people(n);
        let entries = build_ledger(&ids, &rows);

        let balances = compute_balances(&entries, &[], &ids).unwrap();
        prop_assert!(balances.total().is_zero());
        prop_assert_eq!(balances.len(), n);
    }

    /// **Property: computing balances twice gives the same result**
    #[test]
    fn prop_balances_idempotent(
        (n, rows) in (2usize..6).prop_flat_map(|n| (Just(n), ledger_strategy(n))),
    ) {
        let ids = people(n);
        let entries = build_ledger(&ids, &rows);

        let first = compute_balances(&entries, &[], &ids).unwrap();
        let second = compute_balances(&entries, &[], &ids).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Settlement suggestions
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: applying greedy suggestions settles everyone**
    #[test]
    fn prop_greedy_suggestions_settle(values in balances_strategy(12)) {
        let (_, balances) = balances_of(&values);
        let transfers = suggest_settlements(&balances).unwrap();

        prop_assert!(balances.apply_transfers(&transfers).unwrap().is_settled());
        prop_assert!(transfers.iter().all(|t| t.amount.is_positive() && t.from != t.to));

        let open = values.iter().filter(|v| **v != 0).count();
        prop_assert!(transfers.len() <= open.saturating_sub(1));
    }

    /// **Property: the exact strategy settles everyone in no more transfers than greedy**
    #[test]
    fn prop_exact_never_worse_than_greedy(values in balances_strategy(9)) {
        let (_, balances) = balances_of(&values);

        let greedy = GreedySettlement::default().suggest(&balances).unwrap();
        let exact = ExactSettlement.suggest(&balances).unwrap();

        prop_assert!(balances.apply_transfers(&exact).unwrap().is_settled());
        prop_assert!(exact.len() <= greedy.len());
    }

    /// **Property: debtors only pay and creditors only receive**
    #[test]
    fn prop_transfers_flow_from_debtors_to_creditors(values in balances_strategy(12)) {
        let (ids, balances) = balances_of(&values);
        let transfers = suggest_settlements(&balances).unwrap();

        for transfer in &transfers {
            let from = ids.iter().position(|id| *id == transfer.from).unwrap();
            let to = ids.iter().position(|id| *id == transfer.to).unwrap();
            prop_assert!(values[from] < 0);
            prop_assert!(values[to] > 0);
        }
    }
}
