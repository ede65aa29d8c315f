//! Household ledger is a small web API for recording household income and
//! expenses against people and categories.
//!
//! The interesting parts live in three places:
//! - [validate_and_prepare] decides whether a candidate transaction may be recorded,
//! - [plan_deletion] works out which transactions go away with a person,
//! - [aggregate_by_person] and [aggregate_by_category] roll transactions up into reports.
//!
//! Everything reads and writes through an [EntityStore], which is implemented
//! for a SQLite [rusqlite::Connection].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod cascade;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod not_found;
mod person;
mod report;
mod response;
mod routing;
mod store;
mod transaction;

pub use app_state::{AppState, ReportConfig};
pub use cascade::{DeletionPlan, apply_deletion, delete_person_cascade, plan_deletion};
pub use category::{
    Category, CategoryDescription, CategoryForm, NewCategory, Purpose, create_category,
};
pub use database_id::{CategoryId, PersonId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use person::{AGE_OF_MAJORITY, Age, NewPerson, Person, PersonForm, PersonName, create_person};
pub use report::{
    CategoryReport, CategoryTotal, PersonReport, PersonTotal, RowScope, Total,
    aggregate_by_category, aggregate_by_person, build_category_report, build_person_report,
};
pub use response::ApiResponse;
pub use routing::build_router;
pub use store::EntityStore;
pub use transaction::{
    AcceptedTransaction, MissingReference, NewTransaction, RejectionReason, Transaction,
    TransactionFilter, TransactionType, record_transaction, validate_and_prepare,
    validate_and_store,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
