use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;

use household_ledger::{
    CategoryForm, NewTransaction, PersonForm, Purpose, TransactionType, create_category,
    create_person, initialize_db, record_transaction,
};

/// A utility for creating a test database for the REST API server of household_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating people...");
    let mut people = Vec::new();
    for (name, age) in [("Alice", 42), ("Bob", 45), ("Charlie", 14)] {
        let form = PersonForm {
            name: name.to_owned(),
            age,
        };
        people.push(create_person(&form, &conn)?);
    }

    println!("Creating categories...");
    let mut categories = Vec::new();
    for (description, purpose) in [
        ("Salary", Purpose::IncomeOnly),
        ("Groceries", Purpose::ExpenseOnly),
        ("Gifts", Purpose::Both),
    ] {
        let form = CategoryForm {
            description: description.to_owned(),
            purpose,
        };
        categories.push(create_category(&form, &conn)?);
    }

    println!("Creating transactions...");
    let samples = [
        ("Monthly pay", "4200.00", TransactionType::Income, 0, 0),
        ("Monthly pay", "3900.00", TransactionType::Income, 1, 0),
        ("Supermarket", "187.45", TransactionType::Expense, 0, 1),
        ("Farmers market", "36.20", TransactionType::Expense, 1, 1),
        ("Birthday present", "25.00", TransactionType::Expense, 2, 2),
        ("Birthday money", "50.00", TransactionType::Income, 1, 2),
    ];

    for (description, amount, transaction_type, person_index, category_index) in samples {
        let candidate = NewTransaction {
            description: description.to_owned(),
            amount: amount.parse::<Decimal>()?,
            transaction_type,
            person_id: people[person_index].id,
            category_id: categories[category_index].id,
        };
        record_transaction(candidate, &conn)?;
    }

    println!("Success!");

    Ok(())
}
