use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};

use fleet_dashboard::api::{ApiClient, CLIENT_BASE_ENV};
use fleet_dashboard::dashboard::DashboardController;
use fleet_dashboard::model::Car;
use fleet_dashboard::observability::init_cli_logging;
use fleet_dashboard::view::format::{
    format_cost, format_date, format_mileage, or_placeholder, overdue_badge,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "fleet-cli")]
#[command(about = "Command-line front end for the fleet maintenance dashboard", long_about = None)]
struct Cli {
    /// API base URL (`/api` is appended when missing).
    #[arg(short, long, env = CLIENT_BASE_ENV)]
    base_url: Option<String>,

    /// Log API traffic to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cars, optionally filtered by reg number or model
    Cars {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show one car with its service history
    Show { id: i64 },
    /// Show the service history of one car, newest first
    History { id: i64 },
    /// Register a new car
    AddCar {
        #[arg(long)]
        reg: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        mileage: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Record a service event
    AddRecord {
        car_id: i64,
        /// Defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long = "type")]
        kind: String,
        /// Defaults to the car's current mileage.
        #[arg(long)]
        mileage: Option<String>,
        #[arg(long)]
        cost: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a car
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();
    init_cli_logging(cli.verbose);

    let api = ApiClient::from_base_url(cli.base_url.as_deref());
    tracing::debug!(base = %api.base(), "Using API base");

    let mut dashboard = DashboardController::new(api);
    dashboard.mount().await;
    check(&dashboard)?;

    match cli.command {
        Commands::Cars { query } => {
            dashboard.set_query(query);
            let cars = dashboard.filtered_cars();
            if cars.is_empty() {
                println!("No cars found.");
            }
            for car in cars {
                print_car_row(car, dashboard.is_overdue(car));
            }
        }
        Commands::Show { id } => {
            select(&mut dashboard, id).await?;
            if let Some(car) = dashboard.selected_car() {
                print_car_details(car, dashboard.is_overdue(car), dashboard.next_service_km());
            }
            println!();
            print_history(&dashboard);
        }
        Commands::History { id } => {
            select(&mut dashboard, id).await?;
            print_history(&dashboard);
        }
        Commands::AddCar {
            reg,
            model,
            mileage,
            year,
            owner,
        } => {
            dashboard.open_car_dialog_with(|form| {
                form.reg_number = reg;
                form.model = model;
                form.mileage = mileage.unwrap_or_default();
                form.release_year = year.unwrap_or_default();
                form.owner = owner.unwrap_or_default();
            });
            if !dashboard.submit_car().await {
                return fail(&dashboard, "Failed to create car");
            }
            match dashboard.selected_car() {
                Some(car) => println!("Created {} (id {})", car.reg_number, car.id),
                None => println!("Car created."),
            }
        }
        Commands::AddRecord {
            car_id,
            date,
            kind,
            mileage,
            cost,
            notes,
        } => {
            select(&mut dashboard, car_id).await?;
            dashboard.open_service_dialog_with(|form| {
                if let Some(date) = date {
                    form.date = date;
                }
                if let Some(mileage) = mileage {
                    form.mileage = mileage;
                }
                form.kind = kind;
                form.cost = cost;
                form.notes = notes.unwrap_or_default();
            });
            if !dashboard.submit_service_record().await {
                return fail(&dashboard, "Failed to create record");
            }
            check(&dashboard)?;
            println!("Service record added.");
            print_history(&dashboard);
        }
        Commands::Delete { id, yes } => {
            select(&mut dashboard, id).await?;
            let deleted = dashboard
                .delete_selected_car(|prompt| yes || confirm(prompt))
                .await;
            if dashboard.state().error.is_some() {
                return fail(&dashboard, "Failed to delete car");
            }
            if deleted {
                println!("Deleted car {id}.");
            } else {
                println!("Cancelled.");
            }
        }
    }

    Ok(())
}

async fn select(dashboard: &mut DashboardController<ApiClient>, id: i64) -> CliResult {
    if !dashboard.state().cars.iter().any(|car| car.id == id) {
        return Err(format!("Car {id} not found").into());
    }
    dashboard.select_car(id).await;
    check(dashboard)
}

fn check(dashboard: &DashboardController<ApiClient>) -> CliResult {
    match &dashboard.state().error {
        Some(message) => Err(message.clone().into()),
        None => Ok(()),
    }
}

fn fail(dashboard: &DashboardController<ApiClient>, fallback: &str) -> CliResult {
    let message = dashboard
        .state()
        .error
        .clone()
        .unwrap_or_else(|| fallback.to_string());
    Err(message.into())
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn print_car_row(car: &Car, overdue: bool) {
    println!(
        "{:>5}  {:<12} {:<24} {:<20} {:>12}  {}",
        car.id,
        car.reg_number,
        car.model,
        or_placeholder(car.owner.as_deref()),
        format_mileage(car.mileage),
        overdue_badge(overdue),
    );
}

fn print_car_details(car: &Car, overdue: bool, next_service_km: Option<i64>) {
    println!("{} ({})  [{}]", car.reg_number, car.model, overdue_badge(overdue));
    println!("  Owner:          {}", or_placeholder(car.owner.as_deref()));
    println!(
        "  Release year:   {}",
        car.release_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| or_placeholder(None).to_string())
    );
    println!("  Mileage:        {}", format_mileage(car.mileage));
    println!("  Next service:   {}", format_mileage(next_service_km));
    println!(
        "  Due by date:    {}",
        format_date(car.next_service_due_date.as_deref())
    );
}

fn print_history(dashboard: &DashboardController<ApiClient>) {
    let records = dashboard.sorted_history();
    if records.is_empty() {
        println!("No service records.");
        return;
    }
    for record in records {
        println!(
            "{:<14} {:<18} {:>12} {:>10}  {}",
            format_date(record.date.as_deref()),
            or_placeholder(record.kind.as_deref()),
            format_mileage(record.mileage),
            format_cost(record.cost),
            or_placeholder(record.notes.as_deref()),
        );
    }
}
