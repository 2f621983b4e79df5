use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    PasswordHash, ValidatedPassword, create_user, initialize_db, set_saving_goal,
    transaction::{Transaction, TransactionKind, create_transaction},
    upsert_category_budget,
};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The number of days of demo transactions, ending today.
const DEMO_DAYS: i64 = 45;

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

    println!("Creating test user 'test' with the password 'test123'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test123"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test", password_hash, &conn)?;

    println!("Creating transactions...");

    let now = OffsetDateTime::now_utc();
    let daily_spending = [
        ("Food", Decimal::new(1450, 2)),
        ("Transport", Decimal::new(620, 2)),
        ("Groceries", Decimal::new(8730, 2)),
        ("Shopping", Decimal::new(4999, 2)),
    ];

    for days_ago in 0..DEMO_DAYS {
        // Leave some gaps so streaks have something to show.
        if days_ago % 6 == 5 {
            continue;
        }

        let occurred_at = now - Duration::days(days_ago);
        let (category, amount) = daily_spending[(days_ago as usize) % daily_spending.len()];

        create_transaction(
            user.id,
            Transaction::build(amount, TransactionKind::Debit, category).occurred_at(occurred_at),
            &conn,
        )?;

        if days_ago % 14 == 0 {
            create_transaction(
                user.id,
                Transaction::build(Decimal::new(2100, 0), TransactionKind::Credit, "Salary")
                    .note(Some("Fortnightly pay"))
                    .occurred_at(occurred_at),
                &conn,
            )?;
        }
    }

    create_transaction(
        user.id,
        Transaction::build(Decimal::new(1650, 0), TransactionKind::Debit, "Rent")
            .occurred_at(now - Duration::days(2)),
        &conn,
    )?;

    println!("Creating budgets and a saving goal...");

    upsert_category_budget(user.id, "Food", Decimal::new(300, 0), &conn)?;
    upsert_category_budget(user.id, "Groceries", Decimal::new(600, 0), &conn)?;
    upsert_category_budget(user.id, "Shopping", Decimal::new(150, 0), &conn)?;
    set_saving_goal(user.id, Some(Decimal::new(1000, 0)), &conn)?;

    println!("Success!");

    Ok(())
}
