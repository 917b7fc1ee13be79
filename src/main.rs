use std::env;
use std::process;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use turf_booking_client::models::payment::UpiApp;
use turf_booking_client::services::account::Account;
use turf_booking_client::services::checkout::Checkout;
use turf_booking_client::services::selection::validate_booking_date;
use turf_booking_client::services::session::FetchOutcome;
use turf_booking_client::{
    quick_availability, BookingSession, ClientConfig, Credentials, FileCredentialStore, Period,
    TurfApiClient,
};

const HELP: &str = "Usage:\n  turf availability\n  turf slots <YYYY-MM-DD>\n  turf login <username> <password>\n  turf logout\n  turf bookings\n  turf book --date <YYYY-MM-DD> --slot <N> --sport <SPORT> [--team <NAME>] [--notes <TEXT>] [--pay <default|gpay|phonepe|paytm>]";

struct App {
    api: Arc<TurfApiClient>,
    credentials: Arc<Credentials>,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(message) = run(&args).await {
        error!("{}", message);
        eprintln!("{message}");
        process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<(), String> {
    if args.is_empty() || is_help(&args[0]) {
        println!("{HELP}");
        return Ok(());
    }

    let config = ClientConfig::from_env().map_err(|e| format!("Invalid configuration: {e}"))?;
    let api = Arc::new(
        TurfApiClient::from_config(&config).map_err(|e| format!("Invalid configuration: {e}"))?,
    );
    let store = FileCredentialStore::new(&config.credentials_path);
    let app = App {
        api,
        credentials: Arc::new(Credentials::new(Arc::new(store))),
    };

    match args[0].as_str() {
        "availability" => cmd_availability(&app).await,
        "slots" => cmd_slots(&app, &args[1..]).await,
        "login" => cmd_login(&app, &args[1..]).await,
        "logout" => cmd_logout(&app),
        "bookings" => cmd_bookings(&app).await,
        "book" => cmd_book(&app, &args[1..]).await,
        other => Err(format!("Unknown command: {other}\n\n{HELP}")),
    }
}

async fn cmd_availability(app: &App) -> Result<(), String> {
    let session = BookingSession::new(Arc::clone(&app.api), Arc::clone(&app.credentials));
    let today = Local::now().date_naive();
    let quick = quick_availability(session.fetcher(), today)
        .await
        .map_err(|e| e.to_string())?;

    for period in Period::ALL {
        let Some(summary) = quick.get(period) else {
            continue;
        };
        println!("{} ({}): {} slots", summary.label, summary.date, summary.total_slots);
        for (sport, count) in &summary.sport_counts {
            println!("  {sport}: {count}");
        }
    }
    Ok(())
}

async fn cmd_slots(app: &App, args: &[String]) -> Result<(), String> {
    let date = match args.first() {
        Some(raw) => parse_date(raw)?,
        None => return Err(format!("Missing date\n\n{HELP}")),
    };

    let mut session = BookingSession::new(Arc::clone(&app.api), Arc::clone(&app.credentials));
    if let FetchOutcome::Failed(failure) = session.set_date(date).await {
        return Err(failure.to_string());
    }

    if session.slots().is_empty() {
        println!("No slots available for {date}");
    }
    for (index, slot) in session.slots().iter().enumerate() {
        if slot.is_selectable() {
            println!("[{index}] {}  {}", slot.time_range(), slot.sports.join(", "));
        } else {
            println!("[{index}] {}  (booked)", slot.time_range());
        }
    }
    Ok(())
}

async fn cmd_login(app: &App, args: &[String]) -> Result<(), String> {
    let (username, password) = match args {
        [username, password] => (username, password),
        _ => return Err(format!("Expected <username> <password>\n\n{HELP}")),
    };

    let account = Account::new(Arc::clone(&app.api), Arc::clone(&app.credentials));
    let profile = account
        .login(username, password)
        .await
        .map_err(|e| e.to_string())?;

    println!("Signed in as {}", profile.username);
    Ok(())
}

fn cmd_logout(app: &App) -> Result<(), String> {
    let account = Account::new(Arc::clone(&app.api), Arc::clone(&app.credentials));
    account.logout();
    println!("Signed out");
    Ok(())
}

async fn cmd_bookings(app: &App) -> Result<(), String> {
    let account = Account::new(Arc::clone(&app.api), Arc::clone(&app.credentials));
    let bookings = account.my_bookings().await.map_err(|e| e.to_string())?;

    if bookings.is_empty() {
        println!("No bookings yet");
    }
    for booking in bookings {
        println!(
            "#{} {} {} {} - {} [{}]",
            booking.id,
            booking.booking_date,
            booking.sport,
            booking.start_time,
            booking.end_time,
            booking.status
        );
        if let Some(notes) = booking.admin_notes.filter(|n| !n.is_empty()) {
            println!("    {notes}");
        }
    }
    Ok(())
}

async fn cmd_book(app: &App, args: &[String]) -> Result<(), String> {
    let mut date = None;
    let mut slot = None;
    let mut sport = None;
    let mut team = None;
    let mut notes = None;
    let mut pay = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("Missing value for {flag}"))?;
        match flag {
            "--date" => date = Some(parse_date(value)?),
            "--slot" => {
                slot = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid slot index: {value}"))?,
                )
            }
            "--sport" => sport = Some(value.clone()),
            "--team" => team = Some(value.clone()),
            "--notes" => notes = Some(value.clone()),
            "--pay" => pay = Some(parse_upi_app(value)?),
            other => return Err(format!("Unknown option: {other}\n\n{HELP}")),
        }
        i += 2;
    }

    let date = date.ok_or_else(|| format!("--date is required\n\n{HELP}"))?;
    let slot = slot.ok_or_else(|| format!("--slot is required\n\n{HELP}"))?;
    let sport = sport.ok_or_else(|| format!("--sport is required\n\n{HELP}"))?;
    validate_booking_date(date, Local::now().date_naive()).map_err(|e| e.to_string())?;

    let mut session = BookingSession::new(Arc::clone(&app.api), Arc::clone(&app.credentials));
    if let FetchOutcome::Failed(failure) = session.set_date(date).await {
        return Err(failure.to_string());
    }
    session.select(slot, &sport).map_err(|e| e.to_string())?;
    if let Some(team) = team {
        session.set_team_name(team);
    }
    if let Some(notes) = notes {
        session.set_notes(notes);
    }

    match pay {
        None => {
            let confirmation = session.submit().await.map_err(|e| e.to_string())?;
            println!(
                "Booking #{} submitted ({}), awaiting confirmation",
                confirmation.booking_id(),
                confirmation.booking.status
            );
        }
        Some(upi_app) => {
            let checkout = Checkout::new(Arc::clone(&app.api), Arc::clone(&app.credentials));
            let outcome = session
                .checkout(&checkout)
                .await
                .map_err(|e| e.to_string())?;
            info!("Checkout finished for booking {}", outcome.confirmation.booking_id());
            println!(
                "Booking #{} created, pay {} {} to {}",
                outcome.confirmation.booking_id(),
                outcome.quote.final_amount,
                outcome.quote.currency,
                outcome.payment.merchant_details.upi_id
            );
            if let Some(link) = outcome.payment_link(upi_app) {
                println!("{link}");
            }
        }
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{raw}', expected YYYY-MM-DD"))
}

fn parse_upi_app(raw: &str) -> Result<UpiApp, String> {
    match raw.to_ascii_lowercase().as_str() {
        "default" | "upi" => Ok(UpiApp::Default),
        "gpay" => Ok(UpiApp::GPay),
        "phonepe" => Ok(UpiApp::PhonePe),
        "paytm" => Ok(UpiApp::Paytm),
        other => Err(format!("Unknown UPI app: {other}")),
    }
}

fn is_help(arg: &str) -> bool {
    matches!(arg, "-h" | "--help" | "help")
}
