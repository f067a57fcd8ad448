pub mod balance;
pub mod error;
pub mod routes;
pub mod schemas;
pub mod settings;
pub mod settlement;
pub mod splits;
pub mod store;

pub use balance::aggregate;
pub use settlement::minimize_settlements;
