//! Income and expense reports per person and per category.

mod aggregation;
mod endpoints;

pub use aggregation::{
    CategoryReport, CategoryTotal, PersonReport, PersonTotal, RowScope, Total,
    aggregate_by_category, aggregate_by_person,
};
pub use endpoints::{
    build_category_report, build_person_report, get_category_report_endpoint,
    get_person_report_endpoint,
};
