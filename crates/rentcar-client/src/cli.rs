//! Command-line front end.
//!
//! Every invocation restores the persisted session first, runs one
//! subcommand, then prints whatever notices the run produced.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::api::auth::{LoginRequest, RegisterRequest};
use crate::api::bookings::BookingQuery;
use crate::api::cars::CarQuery;
use crate::api::contact::ContactRequest;
use crate::api::faq::FaqQuery;
use crate::app::RentalApp;
use crate::config::Config;
use crate::models::{Booking, BookingStatus, Car};
use crate::notice::{Notice, NoticeLevel};
use crate::services::dates::format_date;
use crate::services::pricing::format_currency;
use crate::storage::{Language, SqliteStorage};

#[derive(Parser, Debug)]
#[command(name = "rentcar")]
#[command(author, version, about = "Car rental client", long_about = None)]
pub struct Cli {
    /// Base URL of the rental API
    #[arg(long, env = "RENTCAR_API_URL")]
    pub api_url: Option<String>,

    /// Path of the local state database
    #[arg(long, env = "RENTCAR_STORAGE_PATH")]
    pub storage: Option<String>,

    /// Override log filter (e.g. `rentcar_client=debug`)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        #[arg(long, env = "RENTCAR_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        name: String,
        email: String,
        #[arg(long, env = "RENTCAR_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Show the signed-in user
    Whoami,

    /// Forget the stored session
    Logout,

    /// Search the car catalog
    Cars {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        seats: Option<u32>,
        #[arg(long)]
        fuel_type: Option<String>,
        /// Only cars offered with a driver
        #[arg(long)]
        with_driver: bool,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show one car
    Car { id: String },

    /// Price a rental without booking it
    Quote {
        car_id: String,
        start: NaiveDate,
        end: NaiveDate,
        #[arg(long)]
        driver: bool,
    },

    /// Book a car for a date range (YYYY-MM-DD)
    Book {
        car_id: String,
        start: NaiveDate,
        end: NaiveDate,
        #[arg(long)]
        driver: bool,
    },

    /// List your bookings, or every booking with --all
    Bookings {
        #[arg(long)]
        all: bool,
        #[arg(long)]
        status: Option<BookingStatus>,
    },

    /// Change a booking's status (admin)
    SetStatus { id: String, status: BookingStatus },

    /// Frequently asked questions
    Faq,

    /// Send a message to the rental office
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long)]
        phone: Option<String>,
        message: String,
    },

    /// Show or set the interface language (en, am, om)
    Language { code: Option<Language> },
}

impl Cli {
    /// Environment config with command-line overrides applied.
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(path) = &self.storage {
            config.storage_path = path.clone();
        }
        config
    }
}

pub async fn run_command(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let storage = SqliteStorage::open(&config.storage_path)
        .with_context(|| format!("Failed to open local state at {}", config.storage_path))?;
    tracing::debug!("Local state at {}", config.storage_path);

    let (mut app, mut notices) = RentalApp::new(config, Arc::new(storage))?;
    app.restore_session().await?;

    let result = dispatch(&mut app, &cli.command).await;

    while let Ok(notice) = notices.try_recv() {
        print_notice(&notice);
    }
    result
}

async fn dispatch(app: &mut RentalApp, command: &Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let user = app
                .login(LoginRequest {
                    email: email.clone(),
                    password: password.clone(),
                })
                .await?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => {
            let user = app
                .register(RegisterRequest {
                    name: name.clone(),
                    email: email.clone(),
                    password: password.clone(),
                    phone: phone.clone(),
                })
                .await?;
            println!("Welcome, {}", user.name);
        }
        Commands::Whoami => match app.current_user() {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                println!("Role:   {:?}", user.role);
                println!("Status: {:?}", user.status);
            }
            None => println!("Not signed in."),
        },
        Commands::Logout => app.logout()?,
        Commands::Cars {
            brand,
            min_price,
            max_price,
            seats,
            fuel_type,
            with_driver,
            search,
            page,
        } => {
            let limit = app.config().page_size;
            let query = CarQuery {
                brand: brand.clone(),
                min_price: *min_price,
                max_price: *max_price,
                seats: *seats,
                fuel_type: fuel_type.clone(),
                with_driver: with_driver.then_some(true),
                search: search.clone(),
                ..Default::default()
            }
            .page(*page, limit);
            let cars = app.search_cars(query).await?.to_vec();
            print_cars(&cars);

            let pages = app.car_pages();
            if pages.total > 0 {
                println!();
                println!("Page {} of {} ({} cars)", pages.page, pages.total_pages(), pages.total);
            }
        }
        Commands::Car { id } => {
            let car = app.api().get_car(id).await?;
            print_car(&car);
        }
        Commands::Quote {
            car_id,
            start,
            end,
            driver,
        } => {
            let car = app.api().get_car(car_id).await?;
            let quote = app.quote(&car, *start, *end, *driver);
            println!("{} {}", car.brand, car.name);
            println!("Days:       {}", quote.days);
            println!("Base price: {}", format_currency(quote.base_price));
            if quote.driver_fee > 0.0 {
                println!("Driver:     {}", format_currency(quote.driver_fee));
            }
            println!("Total:      {}", format_currency(quote.total));
        }
        Commands::Book {
            car_id,
            start,
            end,
            driver,
        } => {
            let car = app.api().get_car(car_id).await?;
            let now = Local::now().naive_local();
            let booking = app.create_booking(&car, *start, *end, *driver, now).await?;
            print_bookings(std::slice::from_ref(&booking));
        }
        Commands::Bookings { all, status } => {
            if *all {
                let query = BookingQuery {
                    status: *status,
                    ..Default::default()
                };
                let meta = app.fetch_all_bookings(&query).await?;
                print_bookings(app.bookings().bookings());
                if let Some(meta) = meta {
                    println!();
                    println!("Page {} ({} bookings total)", meta.page, meta.total);
                }
            } else {
                let bookings: Vec<Booking> = app
                    .fetch_my_bookings()
                    .await?
                    .iter()
                    .filter(|b| status.map_or(true, |s| b.status == s))
                    .cloned()
                    .collect();
                print_bookings(&bookings);
            }
        }
        Commands::SetStatus { id, status } => {
            let booking = app.update_booking_status(id, *status).await?;
            print_bookings(std::slice::from_ref(&booking));
        }
        Commands::Faq => {
            let faqs = app.api().list_faqs(&FaqQuery::default()).await?;
            if faqs.is_empty() {
                println!("No questions yet.");
            }
            for faq in faqs {
                println!("Q: {}", faq.question);
                println!("A: {}", faq.answer);
                println!();
            }
        }
        Commands::Contact {
            name,
            email,
            subject,
            phone,
            message,
        } => {
            app.api()
                .submit_contact(&ContactRequest {
                    name: name.clone(),
                    email: email.clone(),
                    subject: subject.clone(),
                    message: message.clone(),
                    phone: phone.clone(),
                })
                .await?;
            println!("Message sent. We will get back to you soon.");
        }
        Commands::Language { code } => match code {
            Some(language) => {
                app.set_language(*language)?;
                println!("Language set to {}", language.name());
            }
            None => {
                let language = app.language()?;
                println!("{} ({})", language.name(), language.code());
            }
        },
    }
    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Error => eprintln!("[!!] {}", notice.message),
        NoticeLevel::Success => eprintln!("[OK] {}", notice.message),
        NoticeLevel::Info => eprintln!("[..] {}", notice.message),
    }
}

fn print_cars(cars: &[Car]) {
    if cars.is_empty() {
        println!("No cars match these filters.");
        return;
    }

    println!();
    println!(
        "{:<26}  {:<24}  {:<10}  {:<6}  {:>10}  {:<8}",
        "ID", "CAR", "FUEL", "SEATS", "PER DAY", "DRIVER"
    );
    println!("{}", "-".repeat(94));
    for car in cars {
        let name = format!("{} {}", car.brand, car.name);
        println!(
            "{:<26}  {:<24}  {:<10}  {:<6}  {:>10}  {:<8}",
            car.id,
            truncate(&name, 24),
            car.fuel_type,
            car.seats,
            format_currency(car.price_per_day),
            if car.with_driver { "yes" } else { "no" }
        );
    }
}

fn print_car(car: &Car) {
    println!();
    println!("{} {}", car.brand, car.name);
    println!("{}", "-".repeat(40));
    println!("ID:        {}", car.id);
    println!("Type:      {}", car.car_type);
    println!("Fuel:      {}", car.fuel_type);
    println!("Seats:     {}", car.seats);
    println!("Location:  {}", car.location);
    println!("Per day:   {}", format_currency(car.price_per_day));
    if let Some(rate) = car.driver_price_per_day.filter(|_| car.with_driver) {
        println!("Driver:    {} per day", format_currency(rate));
    }
    println!("Rating:    {:.1}", car.rating);
    println!(
        "Available: {}",
        if car.availability { "yes" } else { "no" }
    );
    if let Some(image) = car.cover_image() {
        println!("Image:     {image}");
    }
}

fn print_bookings(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("No bookings found.");
        return;
    }

    println!();
    println!(
        "{:<26}  {:<20}  {:<14}  {:<14}  {:>5}  {:>10}  {:<10}",
        "ID", "CAR", "FROM", "TO", "DAYS", "TOTAL", "STATUS"
    );
    println!("{}", "-".repeat(112));
    for booking in bookings {
        let car = booking
            .car_id
            .populated()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| booking.car_id.id().to_string());
        println!(
            "{:<26}  {:<20}  {:<14}  {:<14}  {:>5}  {:>10}  {:<10}",
            booking.id,
            truncate(&car, 20),
            format_date(booking.start_date),
            format_date(booking.end_date),
            booking.days,
            format_currency(booking.total_price),
            booking.status
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_book_command() {
        let cli = Cli::try_parse_from([
            "rentcar",
            "--api-url",
            "http://api.test/v1",
            "book",
            "c1",
            "2026-11-01",
            "2026-11-03",
            "--driver",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test/v1"));
        match cli.command {
            Commands::Book { car_id, start, driver, .. } => {
                assert_eq!(car_id, "c1");
                assert_eq!(start, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
                assert!(driver);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_status_and_language_values() {
        let cli = Cli::try_parse_from(["rentcar", "set-status", "b1", "approved"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetStatus { status: BookingStatus::Approved, .. }
        ));

        let cli = Cli::try_parse_from(["rentcar", "language", "am"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Language { code: Some(Language::Amharic) }
        ));

        assert!(Cli::try_parse_from(["rentcar", "language", "fr"]).is_err());
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Corolla", 10), "Corolla");
        assert_eq!(truncate("Toyota Land Cruiser Prado", 12), "Toyota La...");
    }
}
