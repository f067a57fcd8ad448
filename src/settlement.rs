use crate::schemas::{Balance, Settlement};

/// Balances closer to zero than this are considered settled.
pub const TOLERANCE: f64 = 0.01;

// What is still owed to (or by) one user while the walk is in progress
struct Residual<'a> {
    balance: &'a Balance,
    remaining: f64,
}

impl<'a> Residual<'a> {
    fn new(balance: &'a Balance) -> Self {
        Self {
            balance,
            remaining: balance.balance,
        }
    }
}

/// Produces the payments that bring every balance back within
/// [`TOLERANCE`] of zero.
///
/// Greedy matching: the largest creditor is paid by the largest debtor
/// until one of them is square, then the walk moves on. This is not
/// always the minimum number of payments, but it never needs more than
/// `creditors + debtors - 1` of them. Users with equal balances keep the
/// order they had in `balances`.
pub fn minimize_settlements(balances: &[Balance]) -> Vec<Settlement> {
    let mut creditors: Vec<Residual> = balances
        .iter()
        .filter(|b| b.balance > TOLERANCE)
        .map(Residual::new)
        .collect();
    let mut debtors: Vec<Residual> = balances
        .iter()
        .filter(|b| b.balance < -TOLERANCE)
        .map(Residual::new)
        .collect();

    creditors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));
    debtors.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < creditors.len() && j < debtors.len() {
        let creditor = &mut creditors[i];
        let debtor = &mut debtors[j];

        let amount = creditor.remaining.min(-debtor.remaining);

        settlements.push(Settlement {
            from: debtor.balance.user_id.clone(),
            from_name: debtor.balance.user_name.clone(),
            to: creditor.balance.user_id.clone(),
            to_name: creditor.balance.user_name.clone(),
            amount: round_to_2_decimals(amount),
        });

        creditor.remaining -= amount;
        debtor.remaining += amount;

        if creditor.remaining < TOLERANCE {
            i += 1;
        }
        if debtor.remaining > -TOLERANCE {
            j += 1;
        }
    }

    settlements
}

fn round_to_2_decimals(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
