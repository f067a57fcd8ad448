use std::collections::HashMap;

use crate::schemas::{Balance, ExpenseWithSplits, User};

/// Folds every expense into one net balance per user that appears as a
/// payer or as a split participant.
///
/// The payer is credited with the full amount and each participant is
/// debited with their split. Balances come out in order of first
/// appearance, so a fixed input always yields the same list.
pub fn aggregate(expenses: &[ExpenseWithSplits]) -> Vec<Balance> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut balances: Vec<Balance> = Vec::new();

    for expense in expenses {
        let payer = slot(
            &mut positions,
            &mut balances,
            &expense.expense.paid_by,
            &expense.payer,
        );
        balances[payer].balance += expense.expense.amount;

        for split in &expense.splits {
            let participant = slot(
                &mut positions,
                &mut balances,
                &split.split.user_id,
                &split.user,
            );
            balances[participant].balance -= split.split.amount;
        }
    }

    balances
}

fn slot<'a>(
    positions: &mut HashMap<&'a str, usize>,
    balances: &mut Vec<Balance>,
    user_id: &'a str,
    user: &User,
) -> usize {
    *positions.entry(user_id).or_insert_with(|| {
        balances.push(Balance {
            user_id: user_id.to_string(),
            user_name: user.name.clone(),
            user_color: user.color.clone(),
            balance: 0.0,
        });
        balances.len() - 1
    })
}
