//! Database operations for people.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::PersonId,
    person::{Age, NewPerson, Person, PersonName},
};

/// Store a person and return it with its generated ID.
pub fn insert_person(person: NewPerson, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare(
            "INSERT INTO person (name, age, created_at) VALUES (?1, ?2, ?3)
             RETURNING id, name, age, created_at",
        )?
        .query_row(
            (
                person.name.as_ref(),
                person.age.years(),
                OffsetDateTime::now_utc(),
            ),
            map_person_row,
        )
        .map_err(Error::from)
}

/// Retrieve a single person by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no person with `person_id`.
pub fn get_person(person_id: PersonId, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare("SELECT id, name, age, created_at FROM person WHERE id = :id")?
        .query_row(&[(":id", &person_id)], map_person_row)
        .map_err(|error| error.into())
}

/// Retrieve a single person by ID, or `None` if there is no such person.
pub fn find_person(person_id: PersonId, connection: &Connection) -> Result<Option<Person>, Error> {
    connection
        .prepare("SELECT id, name, age, created_at FROM person WHERE id = :id")?
        .query_row(&[(":id", &person_id)], map_person_row)
        .optional()
        .map_err(Error::from)
}

/// Retrieve all people ordered by ID.
pub fn get_all_people(connection: &Connection) -> Result<Vec<Person>, Error> {
    connection
        .prepare("SELECT id, name, age, created_at FROM person ORDER BY id ASC")?
        .query_map([], map_person_row)?
        .map(|maybe_person| maybe_person.map_err(|error| error.into()))
        .collect()
}

/// Delete a person by ID. Returns an error if the person doesn't exist.
///
/// This does not touch the person's transactions, see
/// [crate::delete_person_cascade] for removing both together.
pub fn delete_person(person_id: PersonId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM person WHERE id = ?1", [person_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPerson);
    }

    Ok(())
}

/// Initialize the person table.
pub fn create_person_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER NOT NULL CHECK (age >= 0),
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Person].
pub fn map_person_row(row: &Row) -> Result<Person, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_age: u32 = row.get(2)?;
    let created_at = row.get(3)?;

    Ok(Person {
        id,
        name: PersonName::new_unchecked(&raw_name),
        age: Age::from_years(raw_age),
        created_at,
    })
}

#[cfg(test)]
mod person_query_tests {
    use std::collections::HashSet;

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        person::{Age, NewPerson, PersonName},
    };

    use super::{delete_person, find_person, get_all_people, get_person, insert_person};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn new_person(name: &str, age: i64) -> NewPerson {
        NewPerson {
            name: PersonName::new_unchecked(name),
            age: Age::new(age).unwrap(),
        }
    }

    #[test]
    fn insert_person_succeeds() {
        let connection = get_test_db_connection();

        let person = insert_person(new_person("Ana", 34), &connection)
            .expect("Could not create person");

        assert!(person.id > 0);
        assert_eq!(person.name, PersonName::new_unchecked("Ana"));
        assert_eq!(person.age, Age::new(34).unwrap());
    }

    #[test]
    fn get_person_succeeds() {
        let connection = get_test_db_connection();
        let inserted = insert_person(new_person("Ana", 34), &connection).unwrap();

        let selected = get_person(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_person_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted = insert_person(new_person("Ana", 34), &connection).unwrap();

        let selected = get_person(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn find_person_with_invalid_id_returns_none() {
        let connection = get_test_db_connection();

        let selected = find_person(42, &connection);

        assert_eq!(selected, Ok(None));
    }

    #[test]
    fn get_all_people_returns_every_person() {
        let connection = get_test_db_connection();
        let inserted = HashSet::from([
            insert_person(new_person("Ana", 34), &connection).unwrap().id,
            insert_person(new_person("Caio", 12), &connection).unwrap().id,
        ]);

        let selected = get_all_people(&connection).expect("Could not get all people");
        let selected = HashSet::from_iter(selected.into_iter().map(|person| person.id));

        assert_eq!(inserted, selected);
    }

    #[test]
    fn get_all_people_is_ordered_by_id() {
        let connection = get_test_db_connection();
        insert_person(new_person("Zoe", 40), &connection).unwrap();
        insert_person(new_person("Ana", 34), &connection).unwrap();

        let people = get_all_people(&connection).unwrap();

        assert!(people.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn delete_person_succeeds() {
        let connection = get_test_db_connection();
        let person = insert_person(new_person("Ana", 34), &connection).unwrap();

        let result = delete_person(person.id, &connection);

        assert_eq!(result, Ok(()));
        assert_eq!(get_person(person.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_person_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = delete_person(999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingPerson));
    }
}
