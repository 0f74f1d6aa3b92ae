use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Date, Month};

use finrecords::{
    FinancialRecord, UserId,
    service::{RecordService, SqliteRecordService},
};

/// A utility for creating a test database for finrecords.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user that owns the generated records.
    #[arg(long, short, default_value = "test")]
    user: String,

    /// The year to generate records for.
    #[arg(long, default_value_t = 2024)]
    year: i32,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
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
    let service = SqliteRecordService::open(output_path)?;
    let user = UserId::new(&args.user)?;

    println!("Creating test records for {user}...");

    let mut count = 0;
    for month in 1..=12u8 {
        let month = Month::try_from(month)?;

        for (day, title, amount, category, payment_method) in monthly_entries(month) {
            let date = Date::from_calendar_date(args.year, month, day)?;
            let record = FinancialRecord::build(title, amount, date)
                .category(category)
                .payment_method(payment_method);

            service.create(&user, record).await?;
            count += 1;
        }
    }

    println!("Created {count} records.");
    println!("Success!");

    Ok(())
}

/// The records to create for `month`, as (day, title, amount, category,
/// payment method).
fn monthly_entries(month: Month) -> Vec<(u8, &'static str, f64, &'static str, &'static str)> {
    let month_number = f64::from(u8::from(month));
    let groceries = -(180.0 + month_number * 7.5);
    let power_bill = -(90.0 + month_number * 3.0);

    let mut entries = vec![
        (1, "Salary", 4200.0, "Salary", "Bank Transfer"),
        (2, "Rent", -1500.0, "Rent", "Bank Transfer"),
        (9, "Groceries", groceries, "Food", "Credit Card"),
        (14, "Electricity", power_bill, "Utilities", "Bank Transfer"),
        (21, "Dinner out", -62.4, "Food", "Cash"),
        (27, "Bus pass", -45.0, "Transport", "Debit Card"),
    ];

    if u8::from(month) % 3 == 0 {
        entries.push((15, "Freelance project", 850.0, "Freelance", "Bank Transfer"));
    }

    if month == Month::December {
        entries.push((20, "Gifts", -320.0, "Shopping", "Credit Card"));
    }

    entries
}
