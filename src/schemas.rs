use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type ExpenseId = String;

pub const DEFAULT_USER_COLOR: &str = "#3B82F6";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub paid_by: UserId,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExpenseSplit {
    pub id: String,
    pub expense_id: ExpenseId,
    pub user_id: UserId,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// A split joined with the user it belongs to.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SplitWithUser {
    #[serde(flatten)]
    pub split: ExpenseSplit,
    pub user: User,
}

/// An expense as the aggregator consumes it: already joined with its payer
/// and with every split's participant.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExpenseWithSplits {
    #[serde(flatten)]
    pub expense: Expense,
    pub payer: User,
    pub splits: Vec<SplitWithUser>,
}

/// Net position of one user. Positive means the others owe them money.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub user_id: UserId,
    pub user_name: String,
    pub user_color: String,
    pub balance: f64,
}

/// A suggested payment, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub from: UserId,
    pub from_name: String,
    pub to: UserId,
    pub to_name: String,
    pub amount: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitKind {
    Equal,
    Custom { shares: Vec<Share> },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Share {
    pub user_id: UserId,
    pub amount: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub paid_by: UserId,
    pub expense_date: Option<DateTime<Utc>>,
    pub split: SplitKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub balances: Vec<Balance>,
    pub settlements: Vec<Settlement>,
}
