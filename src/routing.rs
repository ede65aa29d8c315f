//! Application router configuration.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState,
    category::{create_category_endpoint, get_categories_endpoint},
    endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    person::{
        create_person_endpoint, delete_person_endpoint, get_people_endpoint, get_person_endpoint,
    },
    report::{get_category_report_endpoint, get_person_report_endpoint},
    transaction::{create_transaction_endpoint, get_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::PEOPLE,
            get(get_people_endpoint).post(create_person_endpoint),
        )
        .route(
            endpoints::PERSON,
            get(get_person_endpoint).delete(delete_person_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::PEOPLE_REPORT, get(get_person_report_endpoint))
        .route(
            endpoints::CATEGORIES_REPORT,
            get(get_category_report_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
