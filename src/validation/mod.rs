//! Heuristic checks that decide whether a notification is a usable
//! transaction: amount bounds, phone normalization and an authenticity score.

pub mod amount;
pub mod authenticity;
pub mod patterns;
pub mod phone;
pub mod transaction;

pub use amount::AmountValidator;
pub use authenticity::AuthenticityScorer;
pub use phone::PhoneValidator;
pub use transaction::TransactionValidator;
