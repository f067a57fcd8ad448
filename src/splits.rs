//! Turns a requested expense into the split amounts that get stored with it.
//!
//! This is the only place the amounts are checked: once an expense and its
//! splits are persisted, the aggregator trusts them.
use std::collections::HashMap;

use crate::error::AppError;
use crate::schemas::{NewExpense, NewUser, SplitKind, User, UserId};
use crate::settlement::TOLERANCE;

/// One participant's share of a new expense.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedSplit {
    pub user_id: UserId,
    pub amount: f64,
}

pub fn plan_splits(expense: &NewExpense, users: &[User]) -> Result<Vec<PlannedSplit>, AppError> {
    if expense.description.trim().is_empty() {
        return Err(invalid("description must not be empty"));
    }
    if !expense.amount.is_finite() || expense.amount <= 0.0 {
        return Err(invalid("amount must be a positive number"));
    }
    if users.is_empty() {
        return Err(invalid("there are no users to split between"));
    }
    if !users.iter().any(|u| u.id == expense.paid_by) {
        return Err(invalid(&format!("unknown payer {}", expense.paid_by)));
    }

    match &expense.split {
        SplitKind::Equal => {
            let amount = expense.amount / users.len() as f64;
            Ok(users
                .iter()
                .map(|user| PlannedSplit {
                    user_id: user.id.clone(),
                    amount,
                })
                .collect())
        }
        SplitKind::Custom { shares } => {
            let mut by_user: HashMap<&str, f64> = HashMap::new();
            for share in shares {
                if !users.iter().any(|u| u.id == share.user_id) {
                    return Err(invalid(&format!("unknown participant {}", share.user_id)));
                }
                if !share.amount.is_finite() || share.amount < 0.0 {
                    return Err(invalid("split amounts must be zero or positive"));
                }
                if by_user.insert(share.user_id.as_str(), share.amount).is_some() {
                    return Err(invalid(&format!("{} appears more than once", share.user_id)));
                }
            }

            let total: f64 = by_user.values().sum();
            if (total - expense.amount).abs() > TOLERANCE {
                return Err(invalid(&format!(
                    "splits must add up to {}, got {:.2}",
                    expense.amount, total
                )));
            }

            let planned: Vec<PlannedSplit> = users
                .iter()
                .filter_map(|user| {
                    by_user
                        .get(user.id.as_str())
                        .filter(|amount| **amount > 0.0)
                        .map(|amount| PlannedSplit {
                            user_id: user.id.clone(),
                            amount: *amount,
                        })
                })
                .collect();
            if planned.is_empty() {
                return Err(invalid("at least one participant must have a positive share"));
            }
            Ok(planned)
        }
    }
}

pub fn check_user(user: &NewUser) -> Result<(), AppError> {
    if user.name.trim().is_empty() {
        return Err(AppError::InvalidUser("name must not be empty".to_string()));
    }
    Ok(())
}

fn invalid(reason: &str) -> AppError {
    AppError::InvalidExpense(reason.to_string())
}
