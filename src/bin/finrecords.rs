use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use time::{Date, OffsetDateTime};

use finrecords::{
    Error, FinancialRecord, RecordId, RecordStore,
    aggregation::aggregate_by_month,
    chart::income_expense_chart,
    config::{Config, DEFAULT_CURRENCY_SYMBOL, DEFAULT_LOG_FILTER, LogConfig},
    filter::{FilterOptions, RecordFilter, filter_records},
    format::currency,
    grid::{COLUMNS, ColumnId, EditableCell, commit_cell, delete_row, render_cell},
    logging::setup_logging,
    record::{parse_amount, parse_date},
    service::{MemoryRecordService, RecordService, SqliteRecordService},
    summary::{Summary, total_signed},
};

/// Record, edit, filter and chart personal income and expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. Records are kept in memory and lost
    /// on exit if this is not set.
    #[arg(long, env = "FINRECORDS_DB")]
    db_path: Option<PathBuf>,

    /// The ID of the user whose records to manage.
    #[arg(long, short, env = "FINRECORDS_USER")]
    user: String,

    /// The symbol to prefix amounts with.
    #[arg(
        long,
        env = "FINRECORDS_CURRENCY",
        default_value = DEFAULT_CURRENCY_SYMBOL
    )]
    currency: String,

    /// The log filter, e.g. "info" or "finrecords=debug".
    #[arg(long, env = "FINRECORDS_LOG", default_value = DEFAULT_LOG_FILTER)]
    log: String,

    /// Also write a debug log to this file.
    #[arg(long, env = "FINRECORDS_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List records, optionally filtered.
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print the records as JSON.
        #[arg(long)]
        json: bool,

        /// Total only the listed records instead of all records.
        #[arg(long)]
        filtered_total: bool,
    },
    /// Show the values each filter can take.
    Options,
    /// Show the income, expense and net totals.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the monthly income vs. expense chart as an ECharts option.
    Chart {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print the aggregated monthly series as JSON instead.
        #[arg(long)]
        series: bool,
    },
    /// Add a record.
    Add {
        /// A short label, e.g. "Groceries".
        #[arg(long)]
        title: String,

        /// Positive for income, negative for expenses.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// e.g. "Food".
        #[arg(long, default_value = "")]
        category: String,

        /// e.g. "Cash".
        #[arg(long, default_value = "")]
        payment_method: String,

        /// The date as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Change one field of a record.
    Edit {
        /// The ID of the record.
        id: RecordId,

        /// One of title, amount, category or payment-method.
        column: ColumnId,

        /// The new value.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Delete a record.
    Delete {
        /// The ID of the record.
        id: RecordId,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Only include this category.
    #[arg(long)]
    category: Option<String>,

    /// Only include this payment method.
    #[arg(long)]
    payment_method: Option<String>,

    /// Only include this month, e.g. "January".
    #[arg(long)]
    month: Option<String>,

    /// Only include this year, e.g. "2024".
    #[arg(long)]
    year: Option<String>,
}

impl From<FilterArgs> for RecordFilter {
    fn from(args: FilterArgs) -> Self {
        RecordFilter {
            category: args.category,
            payment_method: args.payment_method,
            month: args.month,
            year: args.year,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log = LogConfig {
        filter: args.log,
        file: args.log_file,
    };

    let config = match Config::new(args.db_path, &args.user, &args.currency, log) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = setup_logging(&config.log) {
        eprintln!("Error: {error}");
        return ExitCode::FAILURE;
    }

    let result = match &config.db_path {
        Some(db_path) => match SqliteRecordService::open(db_path) {
            Ok(service) => run(service, &config, args.command).await,
            Err(error) => Err(error),
        },
        None => {
            tracing::warn!("No database path set, records will not be saved");
            run(MemoryRecordService::new(), &config, args.command).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run<S>(service: S, config: &Config, command: Command) -> Result<(), Error>
where
    S: RecordService,
{
    let mut store = RecordStore::new(service);
    store.sign_in(config.user.clone()).await?;

    let symbol = config.currency_symbol.as_str();

    match command {
        Command::List {
            filter,
            json,
            filtered_total,
        } => {
            let records = filter_records(store.records(), &filter.into());

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }

            print_records(&records, symbol);

            let total = if filtered_total {
                total_signed(&records)
            } else {
                total_signed(store.records())
            };
            println!("\nTotal Monthly: {}", currency(total, symbol));
        }
        Command::Options => {
            let options = FilterOptions::from_records(store.records());
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        Command::Summary { filter, json } => {
            let records = filter_records(store.records(), &filter.into());
            let summary = Summary::from_records(&records);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("Records: {}", summary.count);
            println!("Income:  {}", currency(summary.income, symbol));
            println!("Expense: {}", currency(summary.expense, symbol));
            println!("Net:     {}", currency(summary.net, symbol));
        }
        Command::Chart { filter, series } => {
            let records = filter_records(store.records(), &filter.into());
            let monthly_totals = aggregate_by_month(&records);

            if series {
                println!("{}", serde_json::to_string_pretty(&monthly_totals)?);
            } else {
                println!("{}", income_expense_chart(&monthly_totals));
            }
        }
        Command::Add {
            title,
            amount,
            category,
            payment_method,
            date,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => today(),
            };

            let record = store
                .create(
                    FinancialRecord::build(&title, amount, date)
                        .category(&category)
                        .payment_method(&payment_method),
                )
                .await?;

            println!("Created record {}", record.id);
            print_records(&[record], symbol);
        }
        Command::Edit { id, column, value } => {
            let record = store
                .get(id)
                .cloned()
                .ok_or(Error::UpdateMissingRecord(id))?;

            let mut cell = EditableCell::new(id, column);
            if !cell.activate(&record) {
                return Err(Error::NotEditable(column));
            }
            cell.input(&value);

            if let Some(updated) = commit_cell(&mut store, &mut cell).await? {
                print_records(&[updated], symbol);
            }
        }
        Command::Delete { id } => {
            delete_row(&mut store, id).await?;
            println!("Deleted record {id}");
        }
    }

    Ok(())
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn print_records(records: &[FinancialRecord], symbol: &str) {
    if records.is_empty() {
        println!("No records found matching the selected filters.");
        return;
    }

    let columns: Vec<ColumnId> = COLUMNS
        .into_iter()
        .filter(|&column| column != ColumnId::Delete)
        .collect();

    let mut table: Vec<Vec<String>> = vec![
        std::iter::once("ID".to_owned())
            .chain(columns.iter().map(|column| column.header().to_owned()))
            .collect(),
    ];

    for record in records {
        let row = std::iter::once(record.id.to_string())
            .chain(columns.iter().map(|&column| match column {
                ColumnId::Amount => currency(record.amount, symbol),
                column => render_cell(record, column),
            }))
            .collect();

        table.push(row);
    }

    let widths: Vec<usize> = (0..=columns.len())
        .map(|index| {
            table
                .iter()
                .map(|row| row[index].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in table {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();

        println!("{}", line.join("  ").trim_end());
    }
}
