//! Split calculator
//!
//! Divides an entry amount between participants according to a split policy.
//! Every policy works in whole cents and hands out the rounding residual one
//! cent at a time, so the splits of an entry always add up to its amount
//! exactly.

use std::collections::HashSet;

use crate::error::{TallyError, TallyResult};
use crate::models::{Money, ParticipantId, Split, SplitPolicy, SplitRequest};

/// How far exact-amount inputs may miss the entry amount (one cent)
pub const EXACT_TOLERANCE: Money = Money::ONE_CENT;

/// Compute one split per request, in request order
///
/// Remainder cents go to the earliest requests (equal) or to the largest
/// fractional remainders with earlier requests winning ties (weighted).
pub fn compute_splits(
    amount: Money,
    policy: SplitPolicy,
    requests: &[SplitRequest],
) -> TallyResult<Vec<Split>> {
    if !amount.is_positive() {
        return Err(TallyError::Validation(format!(
            "Entry amount must be positive, got {}",
            amount
        )));
    }
    if requests.is_empty() {
        return Err(TallyError::Validation(
            "At least one participant is needed to split an entry".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(requests.len());
    for request in requests {
        if !seen.insert(request.participant_id) {
            return Err(TallyError::Validation(format!(
                "Participant {} is listed more than once",
                request.participant_id
            )));
        }
    }

    let shares = match policy {
        SplitPolicy::Equal => equal_shares(amount, requests.len()),
        SplitPolicy::ExactAmount => exact_shares(amount, requests)?,
        SplitPolicy::Weighted => weighted_shares(amount, requests)?,
    };

    debug_assert_eq!(shares.iter().sum::<Money>(), amount);

    Ok(requests
        .iter()
        .zip(shares)
        .map(|(request, share)| Split::from_request(request, share))
        .collect())
}

/// Compute splits with the allocation anchored on the payer
///
/// The requests are rotated to start at the participant just before the
/// payer, wrapping around, so that participant receives the first remainder
/// cent and the payer, if split at all, comes next. With the payer first in
/// the list the cent lands on the last participant. The result is returned in
/// the original request order.
pub fn compute_splits_for_payer(
    amount: Money,
    policy: SplitPolicy,
    requests: &[SplitRequest],
    payer_id: ParticipantId,
) -> TallyResult<Vec<Split>> {
    let len = requests.len();
    let start = requests
        .iter()
        .position(|r| r.participant_id == payer_id)
        .map(|i| (i + len - 1) % len)
        .unwrap_or(0);

    let mut rotated = requests.to_vec();
    rotated.rotate_left(start);

    let mut splits = compute_splits(amount, policy, &rotated)?;
    splits.rotate_right(start);
    Ok(splits)
}

/// Equal shares of `amount`, earliest participants taking the remainder
pub fn equal_shares(amount: Money, count: usize) -> Vec<Money> {
    if count == 0 {
        return Vec::new();
    }

    let n = count as i64;
    let base = amount.cents().div_euclid(n);
    let remainder = amount.cents().rem_euclid(n);

    (0..n)
        .map(|i| Money::from_cents(base + i64::from(i < remainder)))
        .collect()
}

fn exact_shares(amount: Money, requests: &[SplitRequest]) -> TallyResult<Vec<Money>> {
    let mut shares = Vec::with_capacity(requests.len());
    for request in requests {
        let custom = request.custom_amount.ok_or_else(|| {
            TallyError::Validation(format!(
                "Exact-amount split for participant {} is missing an amount",
                request.participant_id
            ))
        })?;
        if custom.is_negative() {
            return Err(TallyError::Validation(format!(
                "Split amount for participant {} cannot be negative",
                request.participant_id
            )));
        }
        shares.push(custom);
    }

    let total = shares
        .iter()
        .try_fold(Money::zero(), |acc, m| acc.checked_add(*m))
        .ok_or_else(|| TallyError::Validation("Split amounts overflow".into()))?;

    let residual = amount - total;
    if residual.abs() > EXACT_TOLERANCE {
        return Err(TallyError::SplitMismatch {
            expected: amount,
            actual: total,
        });
    }

    if !residual.is_zero() {
        // Largest share absorbs the cent; first one wins a tie
        let mut target = 0;
        for (i, share) in shares.iter().enumerate() {
            if *share > shares[target] {
                target = i;
            }
        }
        shares[target] += residual;
    }

    Ok(shares)
}

fn weighted_shares(amount: Money, requests: &[SplitRequest]) -> TallyResult<Vec<Money>> {
    let mut weights = Vec::with_capacity(requests.len());
    for request in requests {
        let weight = request.weight.ok_or_else(|| {
            TallyError::Validation(format!(
                "Weighted split for participant {} is missing a weight",
                request.participant_id
            ))
        })?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(TallyError::Validation(format!(
                "Weight for participant {} must be a positive number, got {}",
                request.participant_id, weight
            )));
        }
        weights.push(weight);
    }

    let total_weight: f64 = weights.iter().sum();
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return Err(TallyError::Validation(
            "Split weights must add up to a positive number".into(),
        ));
    }

    let cents = amount.cents() as f64;
    let mut shares = Vec::with_capacity(weights.len());
    let mut fractions = Vec::with_capacity(weights.len());
    for weight in &weights {
        let exact = cents * weight / total_weight;
        let floor = exact.floor();
        shares.push(floor as i64);
        fractions.push(exact - floor);
    }

    let allocated: i64 = shares.iter().sum();
    distribute_residual(&mut shares, &fractions, amount.cents() - allocated);

    Ok(shares.into_iter().map(Money::from_cents).collect())
}

/// Hand out `residual` cents by largest fractional remainder, ties to input
/// order. Float error can leave the residual slightly outside `0..len`, in
/// which case the cycle simply repeats or takes cents back.
fn distribute_residual(shares: &mut [i64], fractions: &[f64], residual: i64) {
    if shares.is_empty() || residual == 0 {
        return;
    }

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| fractions[b].total_cmp(&fractions[a]));

    if residual > 0 {
        for k in 0..residual as usize {
            shares[order[k % order.len()]] += 1;
        }
    } else {
        let mut remaining = -residual;
        let mut k = order.len();
        while remaining > 0 {
            k = if k == 0 { order.len() - 1 } else { k - 1 };
            let idx = order[k];
            if shares[idx] > 0 {
                shares[idx] -= 1;
                remaining -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|_| ParticipantId::new()).collect()
    }

    fn cents(splits: &[Split]) -> Vec<i64> {
        splits.iter().map(|s| s.amount.cents()).collect()
    }

    #[test]
    fn test_equal_split_remainder_to_first() {
        let people = ids(3);
        let requests: Vec<_> = people.iter().map(|p| SplitRequest::equal(*p)).collect();

        let splits = compute_splits(Money::from_cents(10000), SplitPolicy::Equal, &requests).unwrap();
        assert_eq!(cents(&splits), vec![3334, 3333, 3333]);
        assert_eq!(splits[0].participant_id, people[0]);
    }

    #[test]
    fn test_equal_split_two_remainder_cents() {
        let requests: Vec<_> = ids(3).into_iter().map(SplitRequest::equal).collect();
        let splits = compute_splits(Money::from_cents(1001), SplitPolicy::Equal, &requests).unwrap();
        assert_eq!(cents(&splits), vec![334, 334, 333]);
    }

    #[test]
    fn test_equal_split_fewer_cents_than_people() {
        let requests: Vec<_> = ids(4).into_iter().map(SplitRequest::equal).collect();
        let splits = compute_splits(Money::from_cents(2), SplitPolicy::Equal, &requests).unwrap();
        assert_eq!(cents(&splits), vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_payer_relative_allocation() {
        let people = ids(3);
        let requests: Vec<_> = people.iter().map(|p| SplitRequest::equal(*p)).collect();

        let splits = compute_splits_for_payer(
            Money::from_cents(10000),
            SplitPolicy::Equal,
            &requests,
            people[0],
        )
        .unwrap();

        // Stored in request order; the payer is first so the cent wraps to the last
        assert_eq!(splits[0].participant_id, people[0]);
        assert_eq!(cents(&splits), vec![3333, 3333, 3334]);
    }

    #[test]
    fn test_cent_goes_to_participant_before_payer() {
        let people = ids(3);
        let requests: Vec<_> = people.iter().map(|p| SplitRequest::equal(*p)).collect();

        let splits = compute_splits_for_payer(
            Money::from_cents(10000),
            SplitPolicy::Equal,
            &requests,
            people[2],
        )
        .unwrap();
        assert_eq!(cents(&splits), vec![3333, 3334, 3333]);

        let splits = compute_splits_for_payer(
            Money::from_cents(10000),
            SplitPolicy::Equal,
            &requests,
            people[1],
        )
        .unwrap();
        assert_eq!(cents(&splits), vec![3334, 3333, 3333]);
    }

    #[test]
    fn test_payer_outside_split_keeps_order() {
        let requests: Vec<_> = ids(2).into_iter().map(SplitRequest::equal).collect();
        let splits = compute_splits_for_payer(
            Money::from_cents(101),
            SplitPolicy::Equal,
            &requests,
            ParticipantId::new(),
        )
        .unwrap();
        assert_eq!(cents(&splits), vec![51, 50]);
    }

    #[test]
    fn test_exact_split() {
        let people = ids(2);
        let requests = vec![
            SplitRequest::exact(people[0], Money::from_cents(2000)),
            SplitRequest::exact(people[1], Money::from_cents(3000)),
        ];
        let splits = compute_splits(Money::from_cents(5000), SplitPolicy::ExactAmount, &requests).unwrap();
        assert_eq!(cents(&splits), vec![2000, 3000]);
        assert_eq!(splits[1].custom_amount, Some(Money::from_cents(3000)));
    }

    #[test]
    fn test_exact_split_mismatch() {
        let people = ids(2);
        let requests = vec![
            SplitRequest::exact(people[0], Money::from_cents(2000)),
            SplitRequest::exact(people[1], Money::from_cents(3500)),
        ];
        let err = compute_splits(Money::from_cents(5000), SplitPolicy::ExactAmount, &requests)
            .unwrap_err();
        match err {
            TallyError::SplitMismatch { expected, actual } => {
                assert_eq!(expected, Money::from_cents(5000));
                assert_eq!(actual, Money::from_cents(5500));
            }
            other => panic!("expected split mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_split_within_tolerance_is_absorbed() {
        let people = ids(3);
        let requests = vec![
            SplitRequest::exact(people[0], Money::from_cents(3333)),
            SplitRequest::exact(people[1], Money::from_cents(3333)),
            SplitRequest::exact(people[2], Money::from_cents(3333)),
        ];
        let splits =
            compute_splits(Money::from_cents(10000), SplitPolicy::ExactAmount, &requests).unwrap();
        assert_eq!(cents(&splits), vec![3334, 3333, 3333]);
    }

    #[test]
    fn test_exact_split_requires_amounts() {
        let people = ids(2);
        let requests = vec![
            SplitRequest::exact(people[0], Money::from_cents(500)),
            SplitRequest::equal(people[1]),
        ];
        let err = compute_splits(Money::from_cents(1000), SplitPolicy::ExactAmount, &requests)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_exact_split_allows_zero_share() {
        let people = ids(2);
        let requests = vec![
            SplitRequest::exact(people[0], Money::from_cents(1000)),
            SplitRequest::exact(people[1], Money::zero()),
        ];
        let splits =
            compute_splits(Money::from_cents(1000), SplitPolicy::ExactAmount, &requests).unwrap();
        assert_eq!(cents(&splits), vec![1000, 0]);
    }

    #[test]
    fn test_weighted_split() {
        let people = ids(3);
        let requests = vec![
            SplitRequest::weighted(people[0], 2.0),
            SplitRequest::weighted(people[1], 1.0),
            SplitRequest::weighted(people[2], 1.0),
        ];
        let splits = compute_splits(Money::from_cents(10000), SplitPolicy::Weighted, &requests).unwrap();
        assert_eq!(cents(&splits), vec![5000, 2500, 2500]);
    }

    #[test]
    fn test_weighted_split_largest_remainder() {
        let people = ids(3);
        let requests = vec![
            SplitRequest::weighted(people[0], 1.0),
            SplitRequest::weighted(people[1], 1.0),
            SplitRequest::weighted(people[2], 1.0),
        ];
        let splits = compute_splits(Money::from_cents(100), SplitPolicy::Weighted, &requests).unwrap();
        assert_eq!(cents(&splits), vec![34, 33, 33]);

        // 1000 * 0.5 = 500, 1000 * 0.3 = 300... with 7 cents: 3.5, 2.1, 1.4
        let requests = vec![
            SplitRequest::weighted(people[0], 5.0),
            SplitRequest::weighted(people[1], 3.0),
            SplitRequest::weighted(people[2], 2.0),
        ];
        let splits = compute_splits(Money::from_cents(7), SplitPolicy::Weighted, &requests).unwrap();
        assert_eq!(cents(&splits), vec![4, 2, 1]);
    }

    #[test]
    fn test_weighted_rejects_bad_weights() {
        let people = ids(2);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let requests = vec![
                SplitRequest::weighted(people[0], 1.0),
                SplitRequest::weighted(people[1], bad),
            ];
            let err = compute_splits(Money::from_cents(1000), SplitPolicy::Weighted, &requests)
                .unwrap_err();
            assert!(err.is_validation(), "weight {} should be rejected", bad);
        }
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(compute_splits(Money::from_cents(100), SplitPolicy::Equal, &[])
            .unwrap_err()
            .is_validation());

        let p = ParticipantId::new();
        let requests = vec![SplitRequest::equal(p), SplitRequest::equal(p)];
        assert!(compute_splits(Money::from_cents(100), SplitPolicy::Equal, &requests)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let requests = vec![SplitRequest::equal(ParticipantId::new())];
        assert!(compute_splits(Money::zero(), SplitPolicy::Equal, &requests)
            .unwrap_err()
            .is_validation());
    }
}
