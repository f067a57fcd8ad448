use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Client, Collection, Database};

use crate::error::AppError;
use crate::schemas::{
    Expense, ExpenseSplit, ExpenseWithSplits, NewExpense, NewUser, SplitWithUser, User,
    DEFAULT_USER_COLOR,
};
use crate::splits::plan_splits;

const USERS: &str = "users";
const EXPENSES: &str = "expenses";
const SPLITS: &str = "expense_splits";

/// Users, expenses and splits kept in three MongoDB collections.
#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            db: client.database(database),
        }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn expenses(&self) -> Collection<Expense> {
        self.db.collection(EXPENSES)
    }

    fn splits(&self) -> Collection<ExpenseSplit> {
        self.db.collection(SPLITS)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let users: Vec<User> = self.users().find(None, options).await?.try_collect().await?;
        Ok(users)
    }

    pub async fn add_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = User {
            id: ObjectId::new().to_hex(),
            name: new_user.name.trim().to_string(),
            email: new_user.email,
            color: new_user
                .color
                .unwrap_or_else(|| DEFAULT_USER_COLOR.to_string()),
            created_at: Utc::now(),
        };
        self.users().insert_one(&user, None).await?;
        Ok(user)
    }

    /// Every expense joined with its payer and splits, newest first.
    pub async fn list_expenses(&self) -> Result<Vec<ExpenseWithSplits>, AppError> {
        let users: Vec<User> = self.users().find(None, None).await?.try_collect().await?;
        let expenses: Vec<Expense> = self.expenses().find(None, None).await?.try_collect().await?;
        let splits: Vec<ExpenseSplit> = self.splits().find(None, None).await?.try_collect().await?;

        join_expenses(users, expenses, splits)
    }

    pub async fn add_expense(&self, new_expense: NewExpense) -> Result<ExpenseWithSplits, AppError> {
        let users = self.list_users().await?;
        let planned = plan_splits(&new_expense, &users)?;

        let now = Utc::now();
        let expense = Expense {
            id: ObjectId::new().to_hex(),
            description: new_expense.description.trim().to_string(),
            amount: new_expense.amount,
            paid_by: new_expense.paid_by,
            expense_date: new_expense.expense_date.unwrap_or(now),
            created_at: now,
        };
        let splits: Vec<ExpenseSplit> = planned
            .into_iter()
            .map(|planned| ExpenseSplit {
                id: ObjectId::new().to_hex(),
                expense_id: expense.id.clone(),
                user_id: planned.user_id,
                amount: planned.amount,
                created_at: now,
            })
            .collect();

        self.expenses().insert_one(&expense, None).await?;
        if let Err(err) = self.splits().insert_many(&splits, None).await {
            tracing::warn!("removing expense {} after its splits failed to store", expense.id);
            let rollback = self
                .expenses()
                .delete_one(doc! { "id": expense.id.as_str() }, None)
                .await
                .map(|_| ())
                .map_err(AppError::from);
            return Err(after_rollback(&expense.id, err.into(), rollback));
        }

        let mut joined = join_expenses(users, vec![expense], splits)?;
        joined
            .pop()
            .ok_or_else(|| AppError::Integrity("stored expense disappeared".to_string()))
    }

    /// Removes an expense together with all of its splits.
    ///
    /// Splits go first, so a failure part way leaves an expense that can
    /// be deleted again rather than splits nothing points to.
    pub async fn delete_expense(&self, id: &str) -> Result<(), AppError> {
        let removed = self
            .splits()
            .delete_many(doc! { "expense_id": id }, None)
            .await?;
        let result = self.expenses().delete_one(doc! { "id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(id.to_string()));
        }
        tracing::debug!("deleted {} splits of expense {id}", removed.deleted_count);
        Ok(())
    }
}

// The error that made the insert fail is the one reported; a failed
// rollback is only logged.
fn after_rollback(expense_id: &str, stored: AppError, rollback: Result<(), AppError>) -> AppError {
    if let Err(rollback_err) = rollback {
        tracing::error!("expense {expense_id} left without splits, rollback failed: {rollback_err}");
    }
    stored
}

/// Attaches payers and participants to expenses, newest `created_at` first.
///
/// Splits are kept in the order they were given and splits of unknown
/// expenses are skipped. A payer or participant that is not among `users`
/// means the collections disagree with each other.
pub fn join_expenses(
    users: Vec<User>,
    expenses: Vec<Expense>,
    splits: Vec<ExpenseSplit>,
) -> Result<Vec<ExpenseWithSplits>, AppError> {
    let users: HashMap<String, User> = users.into_iter().map(|u| (u.id.clone(), u)).collect();
    let lookup = |id: &str, role: &str| {
        users
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::Integrity(format!("{role} references unknown user {id}")))
    };

    let mut splits_by_expense: HashMap<String, Vec<ExpenseSplit>> = HashMap::new();
    for split in splits {
        splits_by_expense
            .entry(split.expense_id.clone())
            .or_default()
            .push(split);
    }

    let mut joined = expenses
        .into_iter()
        .map(|expense| {
            let payer = lookup(&expense.paid_by, "expense")?;
            let splits = splits_by_expense
                .remove(&expense.id)
                .unwrap_or_default()
                .into_iter()
                .map(|split| {
                    let user = lookup(&split.user_id, "split")?;
                    Ok(SplitWithUser { split, user })
                })
                .collect::<Result<Vec<_>, AppError>>()?;
            Ok::<_, AppError>(ExpenseWithSplits {
                expense,
                payer,
                splits,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    joined.sort_by(|a, b| b.expense.created_at.cmp(&a.expense.created_at));
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::test_support::user;

    fn stored_expense(id: &str, paid_by: &str, amount: f64, minutes: i64) -> Expense {
        let created_at =
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
        Expense {
            id: id.to_string(),
            description: format!("expense {id}"),
            amount,
            paid_by: paid_by.to_string(),
            expense_date: created_at,
            created_at,
        }
    }

    fn stored_split(expense_id: &str, user_id: &str, amount: f64) -> ExpenseSplit {
        ExpenseSplit {
            id: format!("{expense_id}-{user_id}"),
            expense_id: expense_id.to_string(),
            user_id: user_id.to_string(),
            amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn splits_are_attached_to_their_expense() {
        let joined = join_expenses(
            vec![user("A"), user("B")],
            vec![stored_expense("e1", "A", 10.0, 0), stored_expense("e2", "B", 4.0, 1)],
            vec![
                stored_split("e1", "A", 5.0),
                stored_split("e2", "A", 4.0),
                stored_split("e1", "B", 5.0),
            ],
        )
        .unwrap();

        assert_eq!(joined.len(), 2);
        let e1 = joined.iter().find(|e| e.expense.id == "e1").unwrap();
        assert_eq!(e1.payer.id, "A");
        let participants: Vec<&str> = e1.splits.iter().map(|s| s.user.id.as_str()).collect();
        assert_eq!(participants, vec!["A", "B"]);
    }

    #[test]
    fn newest_expenses_come_first() {
        let joined = join_expenses(
            vec![user("A")],
            vec![
                stored_expense("old", "A", 1.0, 0),
                stored_expense("new", "A", 1.0, 30),
                stored_expense("mid", "A", 1.0, 10),
            ],
            vec![],
        )
        .unwrap();

        let ids: Vec<&str> = joined.iter().map(|e| e.expense.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn expense_without_splits_gets_an_empty_list() {
        let joined =
            join_expenses(vec![user("A")], vec![stored_expense("e1", "A", 3.0, 0)], vec![]).unwrap();

        assert!(joined[0].splits.is_empty());
    }

    #[test]
    fn unknown_payer_is_an_integrity_error() {
        let err = join_expenses(vec![user("A")], vec![stored_expense("e1", "Z", 3.0, 0)], vec![])
            .unwrap_err();

        assert!(matches!(err, AppError::Integrity(_)));
    }

    #[test]
    fn unknown_participant_is_an_integrity_error() {
        let err = join_expenses(
            vec![user("A")],
            vec![stored_expense("e1", "A", 3.0, 0)],
            vec![stored_split("e1", "Z", 3.0)],
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Inconsistent data: split references unknown user Z");
    }

    #[test]
    fn splits_of_deleted_expenses_are_skipped() {
        let joined = join_expenses(
            vec![user("A")],
            vec![stored_expense("e1", "A", 3.0, 0)],
            vec![stored_split("e1", "A", 3.0), stored_split("gone", "Z", 7.0)],
        )
        .unwrap();

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].splits.len(), 1);
        assert_eq!(joined[0].splits[0].split.expense_id, "e1");
    }

    #[test]
    fn failed_rollback_keeps_the_insert_error() {
        let err = after_rollback(
            "e1",
            AppError::Integrity("splits were not stored".to_string()),
            Err(AppError::NotFound("e1".to_string())),
        );

        assert_eq!(err.to_string(), "Inconsistent data: splits were not stored");
    }

    #[test]
    fn successful_rollback_keeps_the_insert_error() {
        let err = after_rollback(
            "e1",
            AppError::Integrity("splits were not stored".to_string()),
            Ok(()),
        );

        assert!(matches!(err, AppError::Integrity(_)));
    }
}
