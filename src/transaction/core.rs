//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row, ToSql, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{CategoryId, PersonId, TransactionId},
    transaction::AcceptedTransaction,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
}

impl TransactionType {
    /// The name used for this type in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An expense or income recorded against a person and a category.
///
/// Transactions are only ever created through [crate::validate_and_prepare],
/// see [crate::record_transaction].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, always positive.
    pub amount: Decimal,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The person the transaction belongs to.
    pub person_id: PersonId,
    /// The category the transaction is filed under.
    pub category_id: CategoryId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A candidate transaction as submitted by a client.
///
/// Nothing about a candidate has been checked yet. Pass it through
/// [crate::validate_and_prepare] to get something that can be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The person the transaction belongs to.
    pub person_id: PersonId,
    /// The category the transaction is filed under.
    pub category_id: CategoryId,
}

/// Narrows down which transactions [get_transactions] returns.
///
/// The default filter matches every transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Only return transactions belonging to this person.
    pub person_id: Option<PersonId>,
    /// Only return transactions filed under this category.
    pub category_id: Option<CategoryId>,
}

impl TransactionFilter {
    /// A filter matching the transactions of one person.
    pub fn for_person(person_id: PersonId) -> Self {
        Self {
            person_id: Some(person_id),
            category_id: None,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Store a transaction that passed validation.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error,
/// e.g. the person or category was deleted after validation.
pub fn insert_transaction(
    transaction: AcceptedTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let candidate = transaction.into_inner();

    connection
        .prepare(
            "INSERT INTO \"transaction\"
                (description, amount, type, person_id, category_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, description, amount, type, person_id, category_id, created_at",
        )?
        .query_row(
            (
                candidate.description,
                candidate.amount.to_string(),
                candidate.transaction_type,
                candidate.person_id,
                candidate.category_id,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Retrieve the transactions matching `filter`, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions = Vec::new();
    let mut params: Vec<&dyn ToSql> = Vec::new();

    if let Some(person_id) = &filter.person_id {
        conditions.push("person_id = ?");
        params.push(person_id);
    }

    if let Some(category_id) = &filter.category_id {
        conditions.push("category_id = ?");
        params.push(category_id);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let query = format!(
        "SELECT id, description, amount, type, person_id, category_id, created_at
         FROM \"transaction\" {where_clause} ORDER BY id ASC"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

/// Delete the transactions with the given IDs.
///
/// IDs that do not refer to a transaction are ignored.
pub fn delete_transactions(
    transaction_ids: &[TransactionId],
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    if transaction_ids.is_empty() {
        return Ok(0);
    }

    let placeholders = std::iter::repeat_n("?", transaction_ids.len())
        .collect::<Vec<_>>()
        .join(", ");
    let query = format!("DELETE FROM \"transaction\" WHERE id IN ({placeholders})");

    connection
        .execute(&query, params_from_iter(transaction_ids))
        .map_err(Error::from)
}

/// Get the total number of transactions in the database.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
                person_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(person_id) REFERENCES person(id)
                    ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id)
                    ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_person ON \"transaction\"(person_id);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let raw_amount: String = row.get(2)?;
    let amount = raw_amount.parse::<Decimal>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(error))
    })?;
    let transaction_type = row.get(3)?;
    let person_id = row.get(4)?;
    let category_id = row.get(5)?;
    let created_at = row.get(6)?;

    Ok(Transaction {
        id,
        description,
        amount,
        transaction_type,
        person_id,
        category_id,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        category::{CategoryDescription, NewCategory, Purpose, insert_category},
        db::initialize,
        person::{Age, NewPerson, PersonName, insert_person},
        transaction::{
            AcceptedTransaction, NewTransaction, TransactionFilter, TransactionType,
            count_transactions,
        },
    };

    use super::{delete_transactions, get_transactions, insert_transaction};

    struct Fixture {
        connection: Connection,
        adult_id: i64,
        teen_id: i64,
        groceries_id: i64,
        salary_id: i64,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let adult_id = insert_person(
            NewPerson {
                name: PersonName::new_unchecked("Ana"),
                age: Age::from_years(40),
            },
            &connection,
        )
        .unwrap()
        .id;
        let teen_id = insert_person(
            NewPerson {
                name: PersonName::new_unchecked("Caio"),
                age: Age::from_years(15),
            },
            &connection,
        )
        .unwrap()
        .id;
        let groceries_id = insert_category(
            NewCategory {
                description: CategoryDescription::new_unchecked("Groceries"),
                purpose: Purpose::ExpenseOnly,
            },
            &connection,
        )
        .unwrap()
        .id;
        let salary_id = insert_category(
            NewCategory {
                description: CategoryDescription::new_unchecked("Salary"),
                purpose: Purpose::IncomeOnly,
            },
            &connection,
        )
        .unwrap()
        .id;

        Fixture {
            connection,
            adult_id,
            teen_id,
            groceries_id,
            salary_id,
        }
    }

    fn accepted(
        person_id: i64,
        category_id: i64,
        transaction_type: TransactionType,
        amount: rust_decimal::Decimal,
    ) -> AcceptedTransaction {
        AcceptedTransaction::new_unchecked(NewTransaction {
            description: "Test".to_owned(),
            amount,
            transaction_type,
            person_id,
            category_id,
        })
    }

    #[test]
    fn insert_succeeds() {
        let fixture = get_fixture();

        let transaction = insert_transaction(
            accepted(
                fixture.adult_id,
                fixture.groceries_id,
                TransactionType::Expense,
                dec!(12.30),
            ),
            &fixture.connection,
        )
        .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, dec!(12.30));
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.person_id, fixture.adult_id);
        assert_eq!(transaction.category_id, fixture.groceries_id);
    }

    #[test]
    fn amounts_are_stored_exactly() {
        let fixture = get_fixture();
        let amount = dec!(0.1) + dec!(0.2);

        let inserted = insert_transaction(
            accepted(
                fixture.adult_id,
                fixture.salary_id,
                TransactionType::Income,
                amount,
            ),
            &fixture.connection,
        )
        .unwrap();
        let selected = get_transactions(&TransactionFilter::default(), &fixture.connection)
            .unwrap()
            .remove(0);

        assert_eq!(inserted.amount, dec!(0.3));
        assert_eq!(selected.amount.to_string(), "0.3");
    }

    #[test]
    fn insert_fails_on_missing_person() {
        let fixture = get_fixture();

        let result = insert_transaction(
            accepted(
                fixture.adult_id + 999,
                fixture.groceries_id,
                TransactionType::Expense,
                dec!(1),
            ),
            &fixture.connection,
        );

        assert!(result.is_err());
        assert_eq!(count_transactions(&fixture.connection), Ok(0));
    }

    #[test]
    fn get_transactions_filters_by_person_and_category() {
        let fixture = get_fixture();
        let connection = &fixture.connection;
        let want = insert_transaction(
            accepted(
                fixture.adult_id,
                fixture.groceries_id,
                TransactionType::Expense,
                dec!(10),
            ),
            connection,
        )
        .unwrap();
        insert_transaction(
            accepted(
                fixture.adult_id,
                fixture.salary_id,
                TransactionType::Income,
                dec!(20),
            ),
            connection,
        )
        .unwrap();
        insert_transaction(
            accepted(
                fixture.teen_id,
                fixture.groceries_id,
                TransactionType::Expense,
                dec!(30),
            ),
            connection,
        )
        .unwrap();

        let by_person =
            get_transactions(&TransactionFilter::for_person(fixture.teen_id), connection).unwrap();
        let by_both = get_transactions(
            &TransactionFilter {
                person_id: Some(fixture.adult_id),
                category_id: Some(fixture.groceries_id),
            },
            connection,
        )
        .unwrap();
        let everything = get_transactions(&TransactionFilter::default(), connection).unwrap();

        assert_eq!(by_person.len(), 1);
        assert_eq!(by_person[0].amount, dec!(30));
        assert_eq!(by_both, vec![want]);
        assert_eq!(everything.len(), 3);
        assert!(everything.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn delete_transactions_removes_only_given_ids() {
        let fixture = get_fixture();
        let connection = &fixture.connection;
        let first = insert_transaction(
            accepted(
                fixture.adult_id,
                fixture.groceries_id,
                TransactionType::Expense,
                dec!(10),
            ),
            connection,
        )
        .unwrap();
        let second = insert_transaction(
            accepted(
                fixture.adult_id,
                fixture.groceries_id,
                TransactionType::Expense,
                dec!(20),
            ),
            connection,
        )
        .unwrap();

        let rows_affected = delete_transactions(&[first.id, 12345], connection).unwrap();

        assert_eq!(rows_affected, 1);
        let remaining = get_transactions(&TransactionFilter::default(), connection).unwrap();
        assert_eq!(remaining, vec![second]);
    }

    #[test]
    fn delete_transactions_with_no_ids_is_a_no_op() {
        let fixture = get_fixture();

        assert_eq!(delete_transactions(&[], &fixture.connection), Ok(0));
    }
}
