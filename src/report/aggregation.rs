//! Rolls transactions up into per-person and per-category totals.
//!
//! Both rollups are pure functions over a list of transactions, so calling
//! them twice with the same input gives identical output. All arithmetic uses
//! [Decimal], never floats.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::Category,
    database_id::{CategoryId, PersonId},
    person::Person,
    transaction::{Transaction, TransactionType},
};

/// Which rows a report includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowScope {
    /// A row for every supplied person or category, with zeros for those
    /// without transactions.
    #[default]
    AllEntities,
    /// Only rows for people or categories that have transactions.
    ActiveOnly,
}

/// Income, expense and the difference between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Total {
    /// The sum of all income.
    pub total_income: Decimal,
    /// The sum of all expenses.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub balance: Decimal,
}

impl Total {
    /// Create a total, computing the balance from `total_income` and `total_expense`.
    pub fn new(total_income: Decimal, total_expense: Decimal) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// One row of the per-person report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonTotal {
    /// The person the row is for.
    pub person_id: PersonId,
    /// The person's name, empty if the person was not in the supplied list.
    pub name: String,
    /// The person's totals.
    #[serde(flatten)]
    pub totals: Total,
}

/// One row of the per-category report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category the row is for.
    pub category_id: CategoryId,
    /// The category's description, empty if the category was not in the supplied list.
    pub description: String,
    /// The category's totals.
    #[serde(flatten)]
    pub totals: Total,
}

/// Totals for each person plus the household as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonReport {
    /// One row per person, ordered by person ID.
    pub rows: Vec<PersonTotal>,
    /// The sum over all rows.
    pub grand_total: Total,
}

/// Totals for each category plus the household as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// One row per category, ordered by category ID.
    pub rows: Vec<CategoryTotal>,
    /// The sum over all rows.
    pub grand_total: Total,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    income: Decimal,
    expense: Decimal,
}

impl Tally {
    fn add(&mut self, transaction: &Transaction) -> Result<(), Error> {
        let sum = match transaction.transaction_type {
            TransactionType::Income => &mut self.income,
            TransactionType::Expense => &mut self.expense,
        };

        *sum = sum
            .checked_add(transaction.amount)
            .ok_or(Error::TotalOverflow)?;

        Ok(())
    }

    fn total(self) -> Result<Total, Error> {
        checked_total(self.income, self.expense)
    }
}

fn checked_total(total_income: Decimal, total_expense: Decimal) -> Result<Total, Error> {
    let balance = total_income
        .checked_sub(total_expense)
        .ok_or(Error::TotalOverflow)?;

    Ok(Total {
        total_income,
        total_expense,
        balance,
    })
}

/// Group `transactions` by `key`, seeding an empty group for every known key
/// when `scope` asks for all entities.
fn tally_by<K: Ord>(
    transactions: &[Transaction],
    key: impl Fn(&Transaction) -> K,
    known_keys: impl Iterator<Item = K>,
    scope: RowScope,
) -> Result<BTreeMap<K, Tally>, Error> {
    let mut tallies = BTreeMap::new();

    if scope == RowScope::AllEntities {
        for known_key in known_keys {
            tallies.entry(known_key).or_insert_with(Tally::default);
        }
    }

    for transaction in transactions {
        tallies
            .entry(key(transaction))
            .or_insert_with(Tally::default)
            .add(transaction)?;
    }

    Ok(tallies)
}

/// Sum the income and expense of every row. The balance is recomputed from
/// the sums rather than added up from the row balances.
fn grand_total<'a>(mut totals: impl Iterator<Item = &'a Total>) -> Result<Total, Error> {
    let (income, expense) = totals
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), total| {
            Some((
                income.checked_add(total.total_income)?,
                expense.checked_add(total.total_expense)?,
            ))
        })
        .ok_or(Error::TotalOverflow)?;

    checked_total(income, expense)
}

/// Compute income, expense and balance for each person.
///
/// Rows are ordered by person ID. With [RowScope::AllEntities] every person in
/// `people` gets a row, even without transactions. A transaction whose person
/// is not in `people` still gets counted, under a row with an empty name.
///
/// # Errors
/// Returns [Error::TotalOverflow] if a sum does not fit in a [Decimal].
pub fn aggregate_by_person(
    transactions: &[Transaction],
    people: &[Person],
    scope: RowScope,
) -> Result<PersonReport, Error> {
    let names: HashMap<PersonId, &str> = people
        .iter()
        .map(|person| (person.id, person.name.as_ref()))
        .collect();

    let tallies = tally_by(
        transactions,
        |transaction| transaction.person_id,
        people.iter().map(|person| person.id),
        scope,
    )?;

    let rows = tallies
        .into_iter()
        .map(|(person_id, tally)| {
            Ok(PersonTotal {
                person_id,
                name: names.get(&person_id).map_or_else(
                    || {
                        tracing::warn!("transactions refer to unknown person {person_id}");
                        String::new()
                    },
                    |name| (*name).to_owned(),
                ),
                totals: tally.total()?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let grand_total = grand_total(rows.iter().map(|row| &row.totals))?;

    Ok(PersonReport { rows, grand_total })
}

/// Compute income, expense and balance for each category.
///
/// Works the same way as [aggregate_by_person], grouped by category instead.
///
/// # Errors
/// Returns [Error::TotalOverflow] if a sum does not fit in a [Decimal].
pub fn aggregate_by_category(
    transactions: &[Transaction],
    categories: &[Category],
    scope: RowScope,
) -> Result<CategoryReport, Error> {
    let descriptions: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|category| (category.id, category.description.as_ref()))
        .collect();

    let tallies = tally_by(
        transactions,
        |transaction| transaction.category_id,
        categories.iter().map(|category| category.id),
        scope,
    )?;

    let rows = tallies
        .into_iter()
        .map(|(category_id, tally)| {
            Ok(CategoryTotal {
                category_id,
                description: descriptions.get(&category_id).map_or_else(
                    || {
                        tracing::warn!("transactions refer to unknown category {category_id}");
                        String::new()
                    },
                    |description| (*description).to_owned(),
                ),
                totals: tally.total()?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let grand_total = grand_total(rows.iter().map(|row| &row.totals))?;

    Ok(CategoryReport { rows, grand_total })
}
