//! Transactions and the rules for recording them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `NewTransaction` candidate
//! - The validation engine that turns a candidate into an `AcceptedTransaction`
//! - Database functions for storing, querying and removing transactions
//! - Route handlers for recording and listing transactions

mod core;
mod create_endpoint;
mod list_endpoint;
mod validation;

pub use core::{
    NewTransaction, Transaction, TransactionFilter, TransactionType, create_transaction_table,
    delete_transactions, get_transactions, insert_transaction,
};
pub use create_endpoint::{create_transaction_endpoint, record_transaction, validate_and_store};
pub use list_endpoint::get_transactions_endpoint;
pub use validation::{AcceptedTransaction, MissingReference, RejectionReason, validate_and_prepare};

#[cfg(test)]
pub use core::count_transactions;
