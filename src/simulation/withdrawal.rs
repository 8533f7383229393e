//! Proportional withdrawal from per-person retirement accounts

use crate::household::{Family, PersonId};
use crate::ledger::{Accounts, Category, Owner};

/// Split `target` across `balances` in proportion to each balance
///
/// Each share is `min(target * b / pool, b)`, so nobody is overdrawn and the
/// total never exceeds either the target or the pool. Negative balances
/// count as empty. A pool of zero yields all-zero shares.
pub fn proportional_shares(balances: &[f64], target: f64) -> Vec<f64> {
    let pool: f64 = balances.iter().map(|b| b.max(0.0)).sum();
    if pool <= 0.0 || target <= 0.0 {
        return vec![0.0; balances.len()];
    }

    balances
        .iter()
        .map(|b| {
            let b = b.max(0.0);
            (target * (b / pool)).min(b)
        })
        .collect()
}

/// Move up to `target` from eligible members' `source` accounts into the
/// shared `destination` account
///
/// Members younger than `min_age` in `year` are left out of the pool.
/// Returns the total moved.
#[allow(clippy::too_many_arguments)]
pub(crate) fn withdraw_proportionally(
    accounts: &mut Accounts,
    family: &Family,
    year: i32,
    min_age: f64,
    source: Category,
    destination: Category,
    target: f64,
    why: &str,
) -> f64 {
    log::debug!("requesting ${:.0} from {} for {}", target, source, why);

    let eligible: Vec<PersonId> = family
        .iter()
        .filter(|(_, person)| person.age(year) as f64 >= min_age)
        .map(|(id, _)| id)
        .collect();
    let balances: Vec<f64> = eligible
        .iter()
        .map(|id| accounts.balance(source, Owner::Person(*id)))
        .collect();

    if balances.iter().map(|b| b.max(0.0)).sum::<f64>() <= 0.0 {
        log::debug!("no withdrawable money in {} accounts", source);
        return 0.0;
    }

    let mut moved = 0.0;
    for (id, share) in eligible.iter().zip(proportional_shares(&balances, target)) {
        if share <= 0.0 {
            continue;
        }
        log::debug!(
            "distributing ${:.0} from {}'s {} for {}",
            share,
            family.person(*id),
            source,
            why
        );
        accounts.transfer(
            (source, Owner::Person(*id)),
            (destination, Owner::Household),
            share,
        );
        moved += share;
    }
    moved
}
