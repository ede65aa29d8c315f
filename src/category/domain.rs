//! Core category domain types.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::CategoryId, transaction::TransactionType};

/// A validated, non-empty category description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct CategoryDescription(String);

impl CategoryDescription {
    /// Create a category description.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryDescription] if
    /// `description` is empty or just whitespace.
    pub fn new(description: &str) -> Result<Self, Error> {
        let description = description.trim();

        if description.is_empty() {
            Err(Error::EmptyCategoryDescription)
        } else {
            Ok(Self(description.to_owned()))
        }
    }

    /// Create a category description without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(description: &str) -> Self {
        Self(description.to_owned())
    }
}

impl AsRef<str> for CategoryDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which types of transaction a category may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// Only expenses.
    ExpenseOnly,
    /// Only income.
    IncomeOnly,
    /// Expenses and income.
    Both,
}

impl Purpose {
    /// Whether a transaction of `transaction_type` may be filed under a
    /// category with this purpose.
    pub fn accepts(self, transaction_type: TransactionType) -> bool {
        match (self, transaction_type) {
            (Purpose::Both, TransactionType::Expense | TransactionType::Income)
            | (Purpose::ExpenseOnly, TransactionType::Expense)
            | (Purpose::IncomeOnly, TransactionType::Income) => true,
            (Purpose::ExpenseOnly, TransactionType::Income)
            | (Purpose::IncomeOnly, TransactionType::Expense) => false,
        }
    }

    /// The name used for storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::ExpenseOnly => "expense_only",
            Purpose::IncomeOnly => "income_only",
            Purpose::Both => "both",
        }
    }
}

impl ToSql for Purpose {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Purpose {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "expense_only" => Ok(Purpose::ExpenseOnly),
            "income_only" => Ok(Purpose::IncomeOnly),
            "both" => Ok(Purpose::Both),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A label that transactions are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID assigned by the database.
    pub id: CategoryId,
    /// What the category is for, e.g. "Groceries".
    pub description: CategoryDescription,
    /// Which transaction types the category accepts.
    pub purpose: Purpose,
    /// When the category was added.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated category that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// What the category is for.
    pub description: CategoryDescription,
    /// Which transaction types the category accepts.
    pub purpose: Purpose,
}

/// Request data for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The description, must not be empty.
    pub description: String,
    /// Which transaction types the category accepts.
    pub purpose: Purpose,
}

impl CategoryForm {
    /// Check the form and turn it into a [NewCategory].
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyCategoryDescription] if the description is blank.
    pub fn validate(&self) -> Result<NewCategory, Error> {
        Ok(NewCategory {
            description: CategoryDescription::new(&self.description)?,
            purpose: self.purpose,
        })
    }
}

#[cfg(test)]
mod category_description_tests {
    use crate::{Error, category::CategoryDescription};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(
            CategoryDescription::new(""),
            Err(Error::EmptyCategoryDescription)
        );
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(
            CategoryDescription::new("  \t"),
            Err(Error::EmptyCategoryDescription)
        );
    }

    #[test]
    fn new_trims_whitespace() {
        let description = CategoryDescription::new(" Rent\n").unwrap();

        assert_eq!(description.as_ref(), "Rent");
    }
}
