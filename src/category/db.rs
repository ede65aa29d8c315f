//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryDescription, NewCategory},
    database_id::CategoryId,
};

/// Store a category and return it with its generated ID.
pub fn insert_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (description, purpose, created_at) VALUES (?1, ?2, ?3)
             RETURNING id, description, purpose, created_at",
        )?
        .query_row(
            (
                category.description.as_ref(),
                category.purpose,
                OffsetDateTime::now_utc(),
            ),
            map_category_row,
        )
        .map_err(Error::from)
}

/// Retrieve a category by ID, or `None` if there is no such category.
pub fn find_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, description, purpose, created_at FROM category WHERE id = :id")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .optional()
        .map_err(Error::from)
}

/// Retrieve all categories ordered by ID.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, description, purpose, created_at FROM category ORDER BY id ASC")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            purpose TEXT NOT NULL CHECK (purpose IN ('expense_only', 'income_only', 'both')),
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Category].
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_description: String = row.get(1)?;
    let purpose = row.get(2)?;
    let created_at = row.get(3)?;

    Ok(Category {
        id,
        description: CategoryDescription::new_unchecked(&raw_description),
        purpose,
        created_at,
    })
}
