//! Categories that transactions are filed under.

mod create_endpoint;
mod db;
mod domain;
mod list_endpoint;

pub use create_endpoint::{create_category, create_category_endpoint};
pub use db::{create_category_table, find_category, get_all_categories, insert_category};
pub use domain::{Category, CategoryDescription, CategoryForm, NewCategory, Purpose};
pub use list_endpoint::get_categories_endpoint;
