//! The people in the household that transactions are recorded against.

mod create_endpoint;
mod db;
mod delete_endpoint;
mod domain;
mod get_endpoint;

pub use create_endpoint::{create_person, create_person_endpoint};
pub use db::{
    create_person_table, delete_person, find_person, get_all_people, get_person, insert_person,
};
pub use delete_endpoint::delete_person_endpoint;
pub use domain::{AGE_OF_MAJORITY, Age, NewPerson, Person, PersonForm, PersonName};
pub use get_endpoint::{get_people_endpoint, get_person_endpoint};
