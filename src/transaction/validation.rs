//! The rules that decide whether a transaction may be recorded.
//!
//! [validate_and_prepare] does no I/O: the caller looks up the person and
//! category and hands them over, and on success gets back an
//! [AcceptedTransaction], the only value the store accepts for insertion.

use std::fmt::Display;

use rust_decimal::Decimal;

use crate::{
    category::Category,
    database_id::{CategoryId, PersonId},
    person::Person,
    transaction::{NewTransaction, TransactionType},
};

/// Which reference of a candidate transaction could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReference {
    /// No person has the given ID.
    Person(PersonId),
    /// No category has the given ID.
    Category(CategoryId),
}

impl Display for MissingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingReference::Person(id) => write!(f, "person {id} not found"),
            MissingReference::Category(id) => write!(f, "category {id} not found"),
        }
    }
}

/// Why a candidate transaction was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    /// The description is empty or just whitespace.
    #[error("transaction description cannot be empty")]
    EmptyDescription,

    /// The amount is zero or negative.
    #[error("transaction amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// The person or category could not be found.
    #[error("{0}")]
    ReferenceNotFound(MissingReference),

    /// People under the age of majority may only have expenses.
    #[error("a minor cannot receive income")]
    MinorCannotReceiveIncome,

    /// The category does not allow this type of transaction.
    #[error("category is incompatible with the transaction type")]
    CategoryTypeMismatch,
}

/// A transaction that passed every check in [validate_and_prepare].
///
/// Holds the candidate unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTransaction(NewTransaction);

impl AcceptedTransaction {
    /// The validated candidate.
    pub fn candidate(&self) -> &NewTransaction {
        &self.0
    }

    /// Unwrap the validated candidate.
    pub fn into_inner(self) -> NewTransaction {
        self.0
    }

    /// Skip validation, for setting up test data.
    #[cfg(test)]
    pub(crate) fn new_unchecked(candidate: NewTransaction) -> Self {
        Self(candidate)
    }
}

/// Decide whether `candidate` may be recorded.
///
/// `person` and `category` are the result of looking up the candidate's
/// `person_id` and `category_id`, `None` meaning the lookup found nothing.
///
/// The checks run in a fixed order and the first failure is returned:
/// 1. the description is not blank,
/// 2. the amount is positive,
/// 3. the person and category exist (person first),
/// 4. a minor is not receiving income,
/// 5. the category's purpose allows the transaction type.
///
/// # Errors
///
/// Returns the [RejectionReason] for the first check that failed.
pub fn validate_and_prepare(
    candidate: NewTransaction,
    person: Option<&Person>,
    category: Option<&Category>,
) -> Result<AcceptedTransaction, RejectionReason> {
    if candidate.description.trim().is_empty() {
        return Err(RejectionReason::EmptyDescription);
    }

    if candidate.amount <= Decimal::ZERO {
        return Err(RejectionReason::NonPositiveAmount(candidate.amount));
    }

    let person = person.ok_or(RejectionReason::ReferenceNotFound(
        MissingReference::Person(candidate.person_id),
    ))?;
    let category = category.ok_or(RejectionReason::ReferenceNotFound(
        MissingReference::Category(candidate.category_id),
    ))?;

    if person.id != candidate.person_id {
        return Err(RejectionReason::ReferenceNotFound(MissingReference::Person(
            candidate.person_id,
        )));
    }

    if category.id != candidate.category_id {
        return Err(RejectionReason::ReferenceNotFound(
            MissingReference::Category(candidate.category_id),
        ));
    }

    if person.age.is_minor() && candidate.transaction_type == TransactionType::Income {
        return Err(RejectionReason::MinorCannotReceiveIncome);
    }

    if !category.purpose.accepts(candidate.transaction_type) {
        return Err(RejectionReason::CategoryTypeMismatch);
    }

    Ok(AcceptedTransaction(candidate))
}
