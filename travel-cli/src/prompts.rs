use anyhow::Result;
use inquire::{CustomType, Password, PasswordDisplayMode, Select, Text};
use std::fmt;

use travel_core::{Trip, TripLeg};

/// Choices offered on the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    UpcomingTrips,
    RequestBooking,
    MyBookings,
    StaffLogin,
    Exit,
}

impl MainChoice {
    pub const ALL: [MainChoice; 5] = [
        MainChoice::UpcomingTrips,
        MainChoice::RequestBooking,
        MainChoice::MyBookings,
        MainChoice::StaffLogin,
        MainChoice::Exit,
    ];
}

impl fmt::Display for MainChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainChoice::UpcomingTrips => write!(f, "1. Check out upcoming trips"),
            MainChoice::RequestBooking => write!(f, "2. Request to book a trip"),
            MainChoice::MyBookings => write!(f, "3. View my bookings"),
            MainChoice::StaffLogin => write!(f, "4. Staff login"),
            MainChoice::Exit => write!(f, "5. Exit"),
        }
    }
}

/// Choices offered to a logged-in trip manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerChoice {
    CreateTrip,
    CreateTripLeg,
    ListTripLegs,
    Logout,
}

impl ManagerChoice {
    pub const ALL: [ManagerChoice; 4] = [
        ManagerChoice::CreateTrip,
        ManagerChoice::CreateTripLeg,
        ManagerChoice::ListTripLegs,
        ManagerChoice::Logout,
    ];
}

impl fmt::Display for ManagerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerChoice::CreateTrip => write!(f, "1. Create a trip"),
            ManagerChoice::CreateTripLeg => write!(f, "2. Create a trip leg"),
            ManagerChoice::ListTripLegs => write!(f, "3. List legs of a trip"),
            ManagerChoice::Logout => write!(f, "4. Log out"),
        }
    }
}

pub fn prompt_main_menu() -> Result<MainChoice> {
    Ok(Select::new("Menu:", MainChoice::ALL.to_vec()).prompt()?)
}

pub fn prompt_manager_menu(username: &str) -> Result<ManagerChoice> {
    let title = format!("Trip manager menu ({}):", username);
    Ok(Select::new(&title, ManagerChoice::ALL.to_vec()).prompt()?)
}

pub fn prompt_traveller_id() -> Result<i64> {
    Ok(CustomType::<i64>::new("Traveller ID:")
        .with_error_message("Please enter a whole number")
        .prompt()?)
}

pub fn prompt_trip_id(message: &str) -> Result<String> {
    Ok(Text::new(message).prompt()?)
}

/// Prompts for a username and a masked password
pub fn prompt_credentials() -> Result<(String, String)> {
    let username = Text::new("Username:").prompt()?;
    let password = Password::new("Password:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    Ok((username, password))
}

/// Prompts the manager for a new trip; the coordinator defaults to them
pub fn prompt_new_trip(coordinator_id: i64) -> Result<Trip> {
    let trip_id = Text::new("Trip ID:").prompt()?;
    let trip_name = Text::new("Trip name:").prompt()?;
    let destination = Text::new("Destination:").prompt()?;
    let start_date = Text::new("Start date (YYYY-MM-DD):").prompt()?;
    let end_date = Text::new("End date (YYYY-MM-DD):").prompt()?;
    let cost = CustomType::<f64>::new("Cost:")
        .with_error_message("Please enter a number")
        .prompt()?;
    let coordinator = CustomType::<i64>::new("Coordinator user ID:")
        .with_default(coordinator_id)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    Ok(Trip::new(
        trip_id,
        trip_name,
        destination,
        start_date,
        end_date,
        cost,
        coordinator,
    ))
}

pub fn prompt_new_trip_leg() -> Result<TripLeg> {
    let leg_id = Text::new("Leg ID:").prompt()?;
    let trip_id = Text::new("Trip ID:").prompt()?;
    let leg_name = Text::new("Leg name:").prompt()?;
    let start_date = Text::new("Start date (YYYY-MM-DD):").prompt()?;
    let end_date = Text::new("End date (YYYY-MM-DD):").prompt()?;
    let destination = Text::new("Destination:").prompt()?;

    Ok(TripLeg::new(
        leg_id,
        trip_id,
        leg_name,
        start_date,
        end_date,
        destination,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_are_numbered_in_order() {
        for (index, choice) in MainChoice::ALL.iter().enumerate() {
            assert!(choice.to_string().starts_with(&format!("{}. ", index + 1)));
        }
        for (index, choice) in ManagerChoice::ALL.iter().enumerate() {
            assert!(choice.to_string().starts_with(&format!("{}. ", index + 1)));
        }
    }
}
