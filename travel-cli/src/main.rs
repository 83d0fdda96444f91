mod cli;
mod prompts;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use inquire::InquireError;

use travel_core::{determine_data_dir, Booking, StoreError, TravelStore, Trip, TripLeg, User};

use crate::cli::Cli;
use crate::prompts::{MainChoice, ManagerChoice};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.default_log_filter()),
    )
    .init();

    let data_dir = determine_data_dir(cli.data_dir.as_deref())?;
    log::info!("Using data directory {:?}", data_dir);
    let mut store = TravelStore::open(&data_dir);

    println!("{}", "Welcome to the Travel Management System!".green());
    for warning in store.warnings() {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    loop {
        let choice = match prompts::prompt_main_menu() {
            Ok(choice) => choice,
            Err(e) if is_cancelled(&e) => MainChoice::Exit,
            Err(e) => return Err(e),
        };

        let outcome = match choice {
            MainChoice::UpcomingTrips => {
                list_trips(&store.get_upcoming_trips());
                Ok(())
            }
            MainChoice::RequestBooking => request_booking(&mut store),
            MainChoice::MyBookings => show_my_bookings(&store),
            MainChoice::StaffLogin => staff_login(&mut store),
            MainChoice::Exit => {
                println!("Exiting...");
                break;
            }
        };

        // Escape on a prompt goes back to the menu
        match outcome {
            Err(e) if is_cancelled(&e) => println!("{}", "Cancelled.".yellow()),
            other => other?,
        }
    }

    Ok(())
}

/// True when the user pressed Escape or Ctrl-C in a prompt
fn is_cancelled(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled) | Some(InquireError::OperationInterrupted)
    )
}

fn list_trips(trips: &[&Trip]) {
    if trips.is_empty() {
        println!("{}", "No upcoming trips.".yellow());
        return;
    }

    println!(
        "{:<8} | {:<24} | {:<18} | {:<10} | {:<10} | {:>10}",
        "Trip ID", "Trip Name", "Destination", "Start Date", "End Date", "Cost"
    );
    println!("{}", "-".repeat(95));

    for trip in trips {
        println!(
            "{:<8} | {:<24} | {:<18} | {:<10} | {:<10} | {:>10.2}",
            trip.trip_id.as_str().cyan(),
            trip.trip_name,
            trip.destination,
            trip.start_date,
            trip.end_date,
            trip.cost
        );
    }
}

fn list_bookings(bookings: &[&Booking]) {
    if bookings.is_empty() {
        println!("{}", "No bookings found.".yellow());
        return;
    }

    println!(
        "{:<8} | {:<8} | {:<24} | {:<10} | {:<10} | {:>10}",
        "Booking", "Trip ID", "Trip Name", "Status", "Payment", "Total"
    );
    println!("{}", "-".repeat(85));

    for booking in bookings {
        println!(
            "{:<8} | {:<8} | {:<24} | {:<10} | {:<10} | {:>10.2}",
            booking.booking_id.as_str().cyan(),
            booking.trip_id,
            booking.trip_name,
            booking.status.to_string(),
            booking.payment_status.to_string(),
            booking.total_amount
        );
    }
}

fn list_trip_legs(legs: &[&TripLeg]) {
    if legs.is_empty() {
        println!("{}", "No legs for this trip.".yellow());
        return;
    }

    println!(
        "{:<8} | {:<24} | {:<10} | {:<10} | {:<18}",
        "Leg ID", "Leg Name", "Start Date", "End Date", "Destination"
    );
    println!("{}", "-".repeat(80));

    for leg in legs {
        println!(
            "{:<8} | {:<24} | {:<10} | {:<10} | {:<18}",
            leg.leg_id.as_str().cyan(),
            leg.leg_name,
            leg.start_date,
            leg.end_date,
            leg.destination
        );
    }
}

fn request_booking(store: &mut TravelStore) -> Result<()> {
    let traveller_id = prompts::prompt_traveller_id()?;
    let trip_id = prompts::prompt_trip_id("Trip ID to book:")?;

    match store.request_to_book_trip(traveller_id, &trip_id) {
        Ok(booking) => {
            println!("{}", "Booking saved successfully!".green());
            println!(
                "Booking successful! Your booking ID is: {}",
                booking.booking_id.green()
            );
        }
        Err(StoreError::LookupMiss { .. }) => {
            println!("{} Trip ID not found.", "Error:".red());
        }
        Err(e) => {
            println!("{} Failed to save booking - {}", "Error:".red(), e);
        }
    }

    Ok(())
}

fn show_my_bookings(store: &TravelStore) -> Result<()> {
    let traveller_id = prompts::prompt_traveller_id()?;
    list_bookings(&store.bookings_for_traveller(traveller_id));
    Ok(())
}

fn staff_login(store: &mut TravelStore) -> Result<()> {
    let (username, password) = prompts::prompt_credentials()?;

    let user = match store.login(&username, &password) {
        Ok(user) => user.clone(),
        Err(_) => {
            println!("{}", "Invalid username or password.".red());
            return Ok(());
        }
    };

    println!("{} {}", "Logged in as".green(), user.username.bold());
    if !user.is_trip_manager() {
        println!(
            "{}",
            format!("Role '{}' has no staff actions.", user.role).yellow()
        );
        return Ok(());
    }

    manager_menu(store, &user)
}

fn manager_menu(store: &mut TravelStore, user: &User) -> Result<()> {
    loop {
        let choice = match prompts::prompt_manager_menu(&user.username) {
            Ok(choice) => choice,
            Err(e) if is_cancelled(&e) => ManagerChoice::Logout,
            Err(e) => return Err(e),
        };

        let outcome = match choice {
            ManagerChoice::CreateTrip => create_trip(store, user),
            ManagerChoice::CreateTripLeg => create_trip_leg(store),
            ManagerChoice::ListTripLegs => show_trip_legs(store),
            ManagerChoice::Logout => {
                println!("Logged out.");
                return Ok(());
            }
        };

        match outcome {
            Err(e) if is_cancelled(&e) => println!("{}", "Cancelled.".yellow()),
            other => other?,
        }
    }
}

fn create_trip(store: &mut TravelStore, user: &User) -> Result<()> {
    let trip = prompts::prompt_new_trip(user.user_id)?;
    let trip_id = trip.trip_id.clone();

    match store.create_trip(trip) {
        Ok(()) => println!("{} {}", "Trip created:".green(), trip_id),
        Err(e) => println!("{} Failed to save trips - {}", "Error:".red(), e),
    }
    Ok(())
}

fn create_trip_leg(store: &mut TravelStore) -> Result<()> {
    let leg = prompts::prompt_new_trip_leg()?;
    let leg_id = leg.leg_id.clone();

    match store.create_trip_leg(leg) {
        Ok(()) => println!("{} {}", "Trip leg created:".green(), leg_id),
        Err(e) => println!("{} Failed to save trip legs - {}", "Error:".red(), e),
    }
    Ok(())
}

fn show_trip_legs(store: &TravelStore) -> Result<()> {
    let trip_id = prompts::prompt_trip_id("Trip ID:")?;
    if store.find_trip(&trip_id).is_none() {
        println!("{}", format!("Note: no trip '{}' on file.", trip_id).yellow());
    }
    list_trip_legs(&store.legs_for_trip(&trip_id));
    Ok(())
}
