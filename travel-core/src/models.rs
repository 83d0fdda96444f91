use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::credentials;

/// Format of the dates stored in the CSV files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Describes how one record kind is laid out on disk
pub trait Record: Serialize + DeserializeOwned {
    /// Human readable name used in messages
    const KIND: &'static str;
    /// Fixed file name inside the data directory
    const FILE_NAME: &'static str;
    /// Column names, in the order they are written
    const HEADERS: &'static [&'static str];
}

/// Parses a numeric column, ignoring whitespace around the value
fn trimmed_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(D::Error::custom)
}

/// A trip offered to travellers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: String,
    pub trip_name: String,
    pub destination: String,

    /// ISO date, e.g. "2024-03-05"
    pub start_date: String,
    pub end_date: String,

    #[serde(deserialize_with = "trimmed_number")]
    pub cost: f64,

    /// User id of the staff member coordinating the trip
    #[serde(deserialize_with = "trimmed_number")]
    pub trip_coordinator_id: i64,
}

impl Trip {
    pub fn new(
        trip_id: impl Into<String>,
        trip_name: impl Into<String>,
        destination: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        cost: f64,
        trip_coordinator_id: i64,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            trip_name: trip_name.into(),
            destination: destination.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            cost,
            trip_coordinator_id,
        }
    }

    /// True when the trip starts on or after `today`.
    /// Both sides must be zero-padded ISO dates for this to be chronological.
    pub fn starts_on_or_after(&self, today: &str) -> bool {
        self.start_date.as_str() >= today
    }
}

impl Record for Trip {
    const KIND: &'static str = "trips";
    const FILE_NAME: &'static str = "trips.csv";
    const HEADERS: &'static [&'static str] = &[
        "trip_id",
        "trip_name",
        "destination",
        "start_date",
        "end_date",
        "cost",
        "trip_coordinator_id",
    ];
}

/// One leg of a trip (a flight, a stay, a transfer...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLeg {
    pub leg_id: String,
    /// Parent trip; not checked against the trip list
    pub trip_id: String,
    pub leg_name: String,
    pub start_date: String,
    pub end_date: String,
    pub destination: String,
}

impl TripLeg {
    pub fn new(
        leg_id: impl Into<String>,
        trip_id: impl Into<String>,
        leg_name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            leg_id: leg_id.into(),
            trip_id: trip_id.into(),
            leg_name: leg_name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            destination: destination.into(),
        }
    }
}

impl Record for TripLeg {
    const KIND: &'static str = "trip legs";
    const FILE_NAME: &'static str = "trip_legs.csv";
    const HEADERS: &'static [&'static str] = &[
        "leg_id",
        "trip_id",
        "leg_name",
        "start_date",
        "end_date",
        "destination",
    ];
}

/// Represents the status of a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Represents the payment state of a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    NotPaid,
    Paid,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::NotPaid => write!(f, "not_paid"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// A traveller's request to join a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub trip_id: String,

    /// Copy of the trip name taken when the booking was made
    pub trip_name: String,

    #[serde(deserialize_with = "trimmed_number")]
    pub traveller_id: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(deserialize_with = "trimmed_number")]
    pub total_amount: f64,
}

impl Booking {
    /// Creates a pending, unpaid booking for `trip`
    pub fn new(booking_id: impl Into<String>, trip: &Trip, traveller_id: i64) -> Self {
        Self {
            booking_id: booking_id.into(),
            trip_id: trip.trip_id.clone(),
            trip_name: trip.trip_name.clone(),
            traveller_id,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::NotPaid,
            total_amount: 0.0,
        }
    }
}

impl Record for Booking {
    const KIND: &'static str = "bookings";
    const FILE_NAME: &'static str = "bookings.csv";
    const HEADERS: &'static [&'static str] = &[
        "booking_id",
        "trip_id",
        "trip_name",
        "traveller_id",
        "status",
        "payment_status",
        "total_amount",
    ];
}

/// Role a user account plays in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    TripManager,
    Traveller,
    /// Any other role string, kept as written
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "trip_manager" => Role::TripManager,
            "traveller" => Role::Traveller,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::TripManager => write!(f, "trip_manager"),
            Role::Traveller => write!(f, "traveller"),
            Role::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A user account; staff log in with these
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "trimmed_number")]
    pub user_id: i64,
    pub username: String,

    /// Plaintext, or `sha256$<salt>$<digest>` (see [`credentials`])
    pub password: String,

    pub role: Role,
    pub email: String,
    pub phone_number: String,

    #[serde(default)]
    pub staff_id: Option<String>,
}

impl User {
    /// Checks `password` against the stored credential
    pub fn verify_password(&self, password: &str) -> bool {
        credentials::verify(&self.password, password)
    }

    pub fn is_trip_manager(&self) -> bool {
        self.role == Role::TripManager
    }
}

impl Record for User {
    const KIND: &'static str = "users";
    const FILE_NAME: &'static str = "users.csv";
    const HEADERS: &'static [&'static str] = &[
        "user_id",
        "username",
        "password",
        "role",
        "email",
        "phone_number",
        "staff_id",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trip() -> Trip {
        Trip::new("T1", "Alps", "Zermatt", "2024-03-05", "2024-03-12", 1500.0, 7)
    }

    #[test]
    fn test_starts_on_or_after() {
        let trip = sample_trip();
        assert!(trip.starts_on_or_after("2024-03-05"));
        assert!(trip.starts_on_or_after("2024-01-31"));
        assert!(!trip.starts_on_or_after("2024-03-06"));
    }

    #[test]
    fn test_new_booking_snapshots_trip() {
        let mut trip = sample_trip();
        let booking = Booking::new("B2", &trip, 42);

        assert_eq!(booking.trip_id, "T1");
        assert_eq!(booking.trip_name, "Alps");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::NotPaid);
        assert_eq!(booking.total_amount, 0.0);

        // Renaming the trip later does not touch the booking
        trip.trip_name = "Alps Deluxe".into();
        assert_eq!(booking.trip_name, "Alps");
    }

    #[test]
    fn test_role_from_string() {
        assert_eq!(Role::from("trip_manager".to_string()), Role::TripManager);
        assert_eq!(Role::from("traveller".to_string()), Role::Traveller);
        assert_eq!(
            Role::from("admin".to_string()),
            Role::Other("admin".to_string())
        );
        assert_eq!(String::from(Role::Other("admin".into())), "admin");
    }

    #[test]
    fn test_status_display_matches_file_format() {
        assert_eq!(BookingStatus::Pending.to_string(), "pending");
        assert_eq!(PaymentStatus::NotPaid.to_string(), "not_paid");
    }

    #[test]
    fn test_numeric_columns_ignore_whitespace() {
        let header = csv::StringRecord::from(Trip::HEADERS.to_vec());
        let row = csv::StringRecord::from(vec![
            "T1", "Alps", "Zermatt", "2024-03-05", "2024-03-12", " 1500 ", " 7",
        ]);

        let trip: Trip = row.deserialize(Some(&header)).unwrap();
        assert_eq!(trip.cost, 1500.0);
        assert_eq!(trip.trip_coordinator_id, 7);
        // Text columns are kept as written
        assert_eq!(trip.trip_name, "Alps");

        let bad = csv::StringRecord::from(vec![
            "T1", "Alps", "Zermatt", "2024-03-05", "2024-03-12", "cheap", "7",
        ]);
        assert!(bad.deserialize::<Trip>(Some(&header)).is_err());
    }

    #[test]
    fn test_headers_match_field_count() {
        assert_eq!(Trip::HEADERS.len(), 7);
        assert_eq!(TripLeg::HEADERS.len(), 6);
        assert_eq!(Booking::HEADERS.len(), 7);
        assert_eq!(User::HEADERS.len(), 7);
    }
}
