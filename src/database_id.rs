//! Database ID type definitions.

/// Database identifier for a person.
pub type PersonId = i64;
/// Database identifier for a category.
pub type CategoryId = i64;
/// Database identifier for a transaction.
pub type TransactionId = i64;
