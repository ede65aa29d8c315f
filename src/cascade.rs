//! Removing a person together with everything that refers to them.
//!
//! A transaction must always refer to an existing person, so deleting a
//! person also deletes their transactions. [plan_deletion] works out what
//! goes, [apply_deletion] removes it, and [delete_person_cascade] does both
//! inside one SQL transaction so other readers never see a half-deleted person.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::Serialize;

use crate::{
    Error,
    database_id::{PersonId, TransactionId},
    person::Person,
    store::EntityStore,
    transaction::{Transaction, TransactionFilter},
};

/// Everything that is removed when a person is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    /// The person being deleted.
    pub person: Person,
    /// Every transaction that refers to the person, ordered by ID.
    pub transactions_to_remove: Vec<Transaction>,
}

impl DeletionPlan {
    /// The IDs of the transactions that will be removed.
    pub fn transaction_ids(&self) -> Vec<TransactionId> {
        self.transactions_to_remove
            .iter()
            .map(|transaction| transaction.id)
            .collect()
    }
}

/// Work out what deleting the person with `person_id` would remove.
///
/// Nothing is changed in `store`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no person with `person_id`, or an
/// error from the store.
pub fn plan_deletion(person_id: PersonId, store: &impl EntityStore) -> Result<DeletionPlan, Error> {
    let person = store.find_person(person_id)?.ok_or(Error::NotFound)?;
    let transactions_to_remove =
        store.list_transactions(&TransactionFilter::for_person(person_id))?;

    Ok(DeletionPlan {
        person,
        transactions_to_remove,
    })
}

/// Remove the transactions in `plan` and then the person.
///
/// This is not atomic on its own, the caller must run it inside a store
/// transaction. See [delete_person_cascade].
pub fn apply_deletion(plan: &DeletionPlan, store: &impl EntityStore) -> Result<(), Error> {
    let removed = store.delete_transactions(&plan.transaction_ids())?;

    if removed != plan.transactions_to_remove.len() {
        tracing::warn!(
            "expected to remove {} transactions for person {} but removed {removed}",
            plan.transactions_to_remove.len(),
            plan.person.id
        );
    }

    store.delete_person(plan.person.id)
}

/// Delete a person and all of their transactions as one atomic unit.
///
/// Either everything in the returned plan is gone, or nothing changed.
///
/// # Errors
/// Returns [Error::NotFound] if there is no person with `person_id`, or a
/// [Error::SqlError] if the deletion failed and was rolled back.
pub fn delete_person_cascade(
    person_id: PersonId,
    connection: &Connection,
) -> Result<DeletionPlan, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let plan = plan_deletion(person_id, &*transaction)?;
    apply_deletion(&plan, &*transaction)?;

    transaction.commit()?;

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        category::{CategoryForm, Purpose, create_category},
        db::initialize,
        person::{PersonForm, create_person},
        store::EntityStore,
        transaction::{NewTransaction, TransactionFilter, TransactionType, record_transaction},
    };

    use super::{delete_person_cascade, plan_deletion};

    struct Household {
        connection: Connection,
        ana: i64,
        bruno: i64,
    }

    fn get_household() -> Household {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let ana = create_person(
            &PersonForm {
                name: "Ana".to_owned(),
                age: 40,
            },
            &connection,
        )
        .unwrap()
        .id;
        let bruno = create_person(
            &PersonForm {
                name: "Bruno".to_owned(),
                age: 38,
            },
            &connection,
        )
        .unwrap()
        .id;
        let category = create_category(
            &CategoryForm {
                description: "Household".to_owned(),
                purpose: Purpose::Both,
            },
            &connection,
        )
        .unwrap()
        .id;

        for (person_id, amount) in [(ana, dec!(10)), (ana, dec!(20)), (bruno, dec!(5))] {
            record_transaction(
                NewTransaction {
                    description: "Shopping".to_owned(),
                    amount,
                    transaction_type: TransactionType::Expense,
                    person_id,
                    category_id: category,
                },
                &connection,
            )
            .unwrap();
        }

        Household {
            connection,
            ana,
            bruno,
        }
    }

    #[test]
    fn plan_lists_every_transaction_of_the_person() {
        let household = get_household();

        let plan = plan_deletion(household.ana, &household.connection).unwrap();

        assert_eq!(plan.person.id, household.ana);
        assert_eq!(plan.transactions_to_remove.len(), 2);
        assert!(
            plan.transactions_to_remove
                .iter()
                .all(|transaction| transaction.person_id == household.ana)
        );
    }

    #[test]
    fn plan_does_not_change_the_store() {
        let household = get_household();

        plan_deletion(household.ana, &household.connection).unwrap();

        assert!(household.connection.find_person(household.ana).unwrap().is_some());
        assert_eq!(
            household
                .connection
                .list_transactions(&TransactionFilter::default())
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn cascade_removes_person_and_their_transactions() {
        let household = get_household();

        let plan = delete_person_cascade(household.ana, &household.connection).unwrap();

        assert_eq!(plan.transactions_to_remove.len(), 2);
        assert_eq!(household.connection.find_person(household.ana), Ok(None));
        assert!(
            household
                .connection
                .list_transactions(&TransactionFilter::for_person(household.ana))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn cascade_leaves_other_people_alone() {
        let household = get_household();

        delete_person_cascade(household.ana, &household.connection).unwrap();

        let remaining = household
            .connection
            .list_transactions(&TransactionFilter::default())
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].person_id, household.bruno);
        assert!(household.connection.find_person(household.bruno).unwrap().is_some());
    }

    #[test]
    fn cascade_on_person_without_transactions_removes_only_the_person() {
        let household = get_household();
        let carla = create_person(
            &PersonForm {
                name: "Carla".to_owned(),
                age: 9,
            },
            &household.connection,
        )
        .unwrap();

        let plan = delete_person_cascade(carla.id, &household.connection).unwrap();

        assert!(plan.transactions_to_remove.is_empty());
        assert_eq!(household.connection.find_person(carla.id), Ok(None));
    }

    #[test]
    fn cascade_on_missing_person_returns_not_found() {
        let household = get_household();

        let missing_id = household.ana + household.bruno + 100;

        let result = delete_person_cascade(missing_id, &household.connection);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(household.connection.list_people().unwrap().len(), 2);
        assert_eq!(
            household
                .connection
                .list_transactions(&TransactionFilter::default())
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn failed_cascade_is_rolled_back() {
        let household = get_household();
        household
            .connection
            .execute_batch(
                "CREATE TRIGGER refuse_person_delete BEFORE DELETE ON person
                 BEGIN SELECT RAISE(ABORT, 'refused'); END;",
            )
            .unwrap();

        let result = delete_person_cascade(household.ana, &household.connection);

        assert!(matches!(result, Err(Error::SqlError(_))));
        assert!(household.connection.find_person(household.ana).unwrap().is_some());
        assert_eq!(
            household
                .connection
                .list_transactions(&TransactionFilter::for_person(household.ana))
                .unwrap()
                .len(),
            2
        );
    }
}
