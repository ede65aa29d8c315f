//! Route handlers that build reports from the store.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    app_state::{ReportConfig, lock_connection},
    report::{CategoryReport, PersonReport, RowScope, aggregate_by_category, aggregate_by_person},
    response::ApiResponse,
    store::EntityStore,
    transaction::TransactionFilter,
};

/// The state needed for building reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading people, categories and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Controls which rows appear when the request does not say.
    pub report_config: ReportConfig,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            report_config: state.report_config,
        }
    }
}

/// Query parameters for the report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Overrides [ReportConfig::default_scope] for this request.
    pub scope: Option<RowScope>,
}

/// Read every person and transaction from `store` and roll them up per person.
///
/// # Errors
/// Returns an error from the store, or [Error::TotalOverflow] if the totals
/// are too large.
pub fn build_person_report(
    store: &impl EntityStore,
    scope: RowScope,
) -> Result<PersonReport, Error> {
    let people = store.list_people()?;
    let transactions = store.list_transactions(&TransactionFilter::default())?;

    aggregate_by_person(&transactions, &people, scope)
}

/// Read every category and transaction from `store` and roll them up per category.
///
/// # Errors
/// See [build_person_report].
pub fn build_category_report(
    store: &impl EntityStore,
    scope: RowScope,
) -> Result<CategoryReport, Error> {
    let categories = store.list_categories()?;
    let transactions = store.list_transactions(&TransactionFilter::default())?;

    aggregate_by_category(&transactions, &categories, scope)
}

/// A route handler that responds with income, expense and balance per person.
pub async fn get_person_report_endpoint(
    State(state): State<ReportState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return Error::from(rejection).into_response(),
    };
    let scope = query.scope.unwrap_or(state.report_config.default_scope);

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match build_person_report(&*connection, scope) {
        Ok(report) => ApiResponse::success(report).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that responds with income, expense and balance per category.
pub async fn get_category_report_endpoint(
    State(state): State<ReportState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return Error::from(rejection).into_response(),
    };
    let scope = query.scope.unwrap_or(state.report_config.default_scope);

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match build_category_report(&*connection, scope) {
        Ok(report) => ApiResponse::success(report).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        category::{CategoryForm, Purpose, create_category},
        db::initialize,
        person::{PersonForm, create_person},
        report::{RowScope, Total},
        store::EntityStore,
        transaction::{NewTransaction, TransactionType, record_transaction},
    };

    use super::{build_category_report, build_person_report};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let ana = create_person(
            &PersonForm {
                name: "Ana".to_owned(),
                age: 40,
            },
            &connection,
        )
        .unwrap();
        create_person(
            &PersonForm {
                name: "Idle".to_owned(),
                age: 70,
            },
            &connection,
        )
        .unwrap();
        let salary = create_category(
            &CategoryForm {
                description: "Salary".to_owned(),
                purpose: Purpose::IncomeOnly,
            },
            &connection,
        )
        .unwrap();
        let rent = create_category(
            &CategoryForm {
                description: "Rent".to_owned(),
                purpose: Purpose::ExpenseOnly,
            },
            &connection,
        )
        .unwrap();

        for (category_id, transaction_type, amount) in [
            (salary.id, TransactionType::Income, dec!(3000)),
            (rent.id, TransactionType::Expense, dec!(1250.50)),
        ] {
            record_transaction(
                NewTransaction {
                    description: "Monthly".to_owned(),
                    amount,
                    transaction_type,
                    person_id: ana.id,
                    category_id,
                },
                &connection,
            )
            .unwrap();
        }

        connection
    }

    #[test]
    fn person_report_reads_from_store() {
        let connection = get_test_connection();

        let report = build_person_report(&connection, RowScope::AllEntities).unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "Ana");
        assert_eq!(report.rows[0].totals.balance, dec!(1749.50));
        assert_eq!(report.rows[1].totals, Total::default());
    }

    #[test]
    fn person_report_respects_scope() {
        let connection = get_test_connection();

        let report = build_person_report(&connection, RowScope::ActiveOnly).unwrap();

        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn category_report_reads_from_store() {
        let connection = get_test_connection();

        let report = build_category_report(&connection, RowScope::AllEntities).unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].totals, Total::new(dec!(3000), Decimal::ZERO));
        assert_eq!(report.rows[1].totals, Total::new(Decimal::ZERO, dec!(1250.50)));
        assert_eq!(report.grand_total, Total::new(dec!(3000), dec!(1250.50)));
    }

    #[test]
    fn oversized_totals_give_an_error_instead_of_panicking() {
        let connection = get_test_connection();
        let people = connection.list_people().unwrap();
        let categories = connection.list_categories().unwrap();

        for _ in 0..2 {
            record_transaction(
                NewTransaction {
                    description: "Jackpot".to_owned(),
                    amount: Decimal::MAX,
                    transaction_type: TransactionType::Income,
                    person_id: people[0].id,
                    category_id: categories[0].id,
                },
                &connection,
            )
            .unwrap();
        }

        assert_eq!(
            build_person_report(&connection, RowScope::AllEntities),
            Err(Error::TotalOverflow)
        );
        assert_eq!(
            build_category_report(&connection, RowScope::ActiveOnly),
            Err(Error::TotalOverflow)
        );
    }
}
