//! Core person domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::PersonId};

/// The age from which a person may receive income.
pub const AGE_OF_MAJORITY: u32 = 18;

/// A validated, non-empty person name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Create a person name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyPersonName] if `name` is empty or just whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyPersonName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a person name without validation.
    ///
    /// The caller should ensure that the string is not empty, e.g. because it
    /// was read back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person's age in whole years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Age(u32);

impl Age {
    /// Create an age from a raw, possibly negative, number of years.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAge] if `years` is negative
    /// or too large to be a plausible age.
    pub fn new(years: i64) -> Result<Self, Error> {
        u32::try_from(years)
            .map(Self)
            .map_err(|_| Error::InvalidAge(years))
    }

    /// Create an age from a number of years that is already known to be valid.
    pub fn from_years(years: u32) -> Self {
        Self(years)
    }

    /// The age in years.
    pub fn years(self) -> u32 {
        self.0
    }

    /// Whether the person is under [AGE_OF_MAJORITY].
    pub fn is_minor(self) -> bool {
        self.0 < AGE_OF_MAJORITY
    }
}

impl Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Someone in the household that transactions are recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// The ID assigned by the database.
    pub id: PersonId,
    /// The person's name.
    pub name: PersonName,
    /// The person's age.
    pub age: Age,
    /// When the person was added.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated person that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    /// The person's name.
    pub name: PersonName,
    /// The person's age.
    pub age: Age,
}

/// Request data for creating a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonForm {
    /// The person's name, must not be empty.
    pub name: String,
    /// The person's age, must not be negative.
    pub age: i64,
}

impl PersonForm {
    /// Check the form and turn it into a [NewPerson].
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyPersonName] or [Error::InvalidAge] for bad input.
    pub fn validate(&self) -> Result<NewPerson, Error> {
        Ok(NewPerson {
            name: PersonName::new(&self.name)?,
            age: Age::new(self.age)?,
        })
    }
}
