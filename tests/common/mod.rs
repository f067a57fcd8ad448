use chrono::{TimeZone, Utc};
use splitledger::schemas::{Expense, ExpenseSplit, ExpenseWithSplits, SplitWithUser, User};

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: id.to_string(),
        email: None,
        color: "#F59E0B".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Builds a joined expense; `splits` lists participants and their share.
pub fn expense(id: &str, amount: f64, payer: &User, splits: &[(&User, f64)]) -> ExpenseWithSplits {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    ExpenseWithSplits {
        expense: Expense {
            id: id.to_string(),
            description: format!("expense {id}"),
            amount,
            paid_by: payer.id.clone(),
            expense_date: created_at,
            created_at,
        },
        payer: payer.clone(),
        splits: splits
            .iter()
            .map(|(participant, share)| SplitWithUser {
                split: ExpenseSplit {
                    id: format!("{id}-{}", participant.id),
                    expense_id: id.to_string(),
                    user_id: participant.id.clone(),
                    amount: *share,
                    created_at,
                },
                user: (*participant).clone(),
            })
            .collect(),
    }
}
