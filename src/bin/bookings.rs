use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use house_usage::core::BookingStore;
use house_usage::utils::{logger, validation};
use house_usage::{Booking, BookingRequest, MonthWindow, RestBookingStore, UsageError};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bookings")]
#[command(about = "Create, cancel and remove bookings in the family calendar")]
struct Cli {
    #[arg(long, env = "STORE_URL", global = true)]
    store_url: Option<String>,

    #[arg(long, env = "STORE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[arg(long, default_value_t = house_usage::config::DEFAULT_TIMEOUT_SECONDS, global = true)]
    timeout_seconds: u64,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Book a house for up to seven nights
    Create {
        #[arg(long)]
        house_id: i64,
        /// Id of the user making the booking
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 1)]
        guests: u32,
        /// First night, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// Departure day, YYYY-MM-DD (not a night of the stay)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        note: Option<String>,
    },
    /// Mark a booking as cancelled
    Cancel { id: i64 },
    /// Remove a booking outright (admin)
    Delete { id: i64 },
    /// Show active bookings overlapping a month
    List {
        /// YYYY-MM
        #[arg(long)]
        month: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: Cli) -> Result<(), UsageError> {
    let store_url = validation::validate_required_field("store_url", &cli.store_url)?;
    let api_key = validation::validate_required_field("api_key", &cli.api_key)?;
    validation::validate_url("store_url", store_url)?;
    validation::validate_non_empty_string("api_key", api_key)?;

    let store =
        RestBookingStore::new(store_url, api_key, Duration::from_secs(cli.timeout_seconds))?;

    match cli.command {
        Command::Create {
            house_id,
            user,
            guests,
            start,
            end,
            note,
        } => {
            let request = BookingRequest {
                house_id,
                created_by: user,
                guest_count: guests,
                start_date: start,
                end_date: end,
                note,
            };
            let booking = store.create_booking(&request).await?;
            tracing::info!("Created booking {}", booking.id);
            println!("✅ {}", describe(&booking));
        }
        Command::Cancel { id } => {
            let booking = store.cancel_booking(id).await?;
            tracing::info!("Cancelled booking {}", booking.id);
            println!("✅ Cancelled {}", describe(&booking));
        }
        Command::Delete { id } => {
            store.delete_booking(id).await?;
            tracing::info!("Deleted booking {}", id);
            println!("✅ Deleted booking {}", id);
        }
        Command::List { month } => {
            let window = MonthWindow::parse(&month)?;
            let houses = store.list_houses().await?;
            let bookings = store.list_bookings(&window).await?;

            for house in &houses {
                println!("{}", house.name);
                for booking in bookings.iter().filter(|b| b.house_id == house.id) {
                    println!("  {}", describe(booking));
                }
            }
        }
    }

    Ok(())
}

fn describe(booking: &Booking) -> String {
    let mut line = format!(
        "#{} house {}: {} → {} ({} nights, {} guests, {})",
        booking.id,
        booking.house_id,
        booking.start_date,
        booking.end_date,
        booking.nights(),
        booking.guest_count,
        booking.status.as_str()
    );
    if let Some(note) = &booking.note {
        line.push_str(&format!(" \"{}\"", note));
    }
    line
}
