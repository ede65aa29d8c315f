//! Defines the store that the validation, cascade and report logic read and
//! write through.

use rusqlite::Connection;

use crate::{
    Error,
    category::{self, Category, NewCategory},
    database_id::{CategoryId, PersonId, TransactionId},
    person::{self, NewPerson, Person},
    transaction::{self, AcceptedTransaction, Transaction, TransactionFilter},
};

/// Creates, retrieves and deletes people, categories and transactions.
///
/// Lookups by ID return `Ok(None)` when nothing matches. An `Err` always
/// means the store itself failed.
pub trait EntityStore {
    /// Get a person by their ID.
    fn find_person(&self, person_id: PersonId) -> Result<Option<Person>, Error>;

    /// Get a category by its ID.
    fn find_category(&self, category_id: CategoryId) -> Result<Option<Category>, Error>;

    /// Get every person, ordered by ID.
    fn list_people(&self) -> Result<Vec<Person>, Error>;

    /// Get every category, ordered by ID.
    fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// Get the transactions matching `filter`, ordered by ID.
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error>;

    /// Add a person to the store.
    fn insert_person(&self, person: NewPerson) -> Result<Person, Error>;

    /// Add a category to the store.
    fn insert_category(&self, category: NewCategory) -> Result<Category, Error>;

    /// Add a transaction to the store.
    ///
    /// Only transactions that passed [crate::validate_and_prepare] can be inserted.
    fn insert_transaction(&self, transaction: AcceptedTransaction) -> Result<Transaction, Error>;

    /// Remove the transactions with the given IDs, returning how many were removed.
    fn delete_transactions(&self, transaction_ids: &[TransactionId]) -> Result<usize, Error>;

    /// Remove a person.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingPerson] if there is no person with `person_id`.
    fn delete_person(&self, person_id: PersonId) -> Result<(), Error>;
}

impl EntityStore for Connection {
    fn find_person(&self, person_id: PersonId) -> Result<Option<Person>, Error> {
        person::find_person(person_id, self)
    }

    fn find_category(&self, category_id: CategoryId) -> Result<Option<Category>, Error> {
        category::find_category(category_id, self)
    }

    fn list_people(&self) -> Result<Vec<Person>, Error> {
        person::get_all_people(self)
    }

    fn list_categories(&self) -> Result<Vec<Category>, Error> {
        category::get_all_categories(self)
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        transaction::get_transactions(filter, self)
    }

    fn insert_person(&self, person: NewPerson) -> Result<Person, Error> {
        person::insert_person(person, self)
    }

    fn insert_category(&self, category: NewCategory) -> Result<Category, Error> {
        category::insert_category(category, self)
    }

    fn insert_transaction(&self, transaction: AcceptedTransaction) -> Result<Transaction, Error> {
        transaction::insert_transaction(transaction, self)
    }

    fn delete_transactions(&self, transaction_ids: &[TransactionId]) -> Result<usize, Error> {
        transaction::delete_transactions(transaction_ids, self)
    }

    fn delete_person(&self, person_id: PersonId) -> Result<(), Error> {
        person::delete_person(person_id, self)
    }
}
