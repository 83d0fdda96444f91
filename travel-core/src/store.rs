//! The record store: trips, trip legs, bookings and users held in memory
//! and backed by one CSV file each.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::models::{Booking, Record, Trip, TripLeg, User, DATE_FORMAT};
use crate::storage::Storage;

/// Today's local date in the format stored in `trips.csv`
pub fn today() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Owns the four collections for the lifetime of the process.
///
/// Load problems never fail construction: the affected collection is left
/// empty and the problem is kept in [`TravelStore::warnings`].
pub struct TravelStore {
    data_dir: PathBuf,
    trips: Vec<Trip>,
    trip_legs: Vec<TripLeg>,
    bookings: Vec<Booking>,
    users: Vec<User>,
    warnings: Vec<StoreError>,
}

impl TravelStore {
    /// Creates a store over `data_dir` and loads every collection
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Self {
        let mut store = Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            trips: Vec::new(),
            trip_legs: Vec::new(),
            bookings: Vec::new(),
            users: Vec::new(),
            warnings: Vec::new(),
        };

        store.load_trips();
        store.load_trip_legs();
        store.load_bookings();
        store.load_users();
        store
    }

    fn storage<T: Record>(&self) -> Storage {
        Storage::for_record::<T>(&self.data_dir)
    }

    fn load_or_empty<T: Record>(&mut self) -> Vec<T> {
        match self.storage::<T>().load() {
            Ok(records) => {
                info!("Loaded {} {}", records.len(), T::KIND);
                records
            }
            Err(e) => {
                warn!("Could not load {}: {}", T::KIND, e);
                self.warnings.push(e);
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replaces the in-memory trips with the contents of trips.csv
    pub fn load_trips(&mut self) {
        self.trips = self.load_or_empty();
    }

    pub fn load_trip_legs(&mut self) {
        self.trip_legs = self.load_or_empty();
    }

    pub fn load_bookings(&mut self) {
        self.bookings = self.load_or_empty();
    }

    pub fn load_users(&mut self) {
        self.users = self.load_or_empty();
    }

    /// Problems reported while loading, oldest first
    pub fn warnings(&self) -> &[StoreError] {
        &self.warnings
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip_legs(&self) -> &[TripLeg] {
        &self.trip_legs
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Trips starting today or later, in file order
    pub fn get_upcoming_trips(&self) -> Vec<&Trip> {
        self.upcoming_trips_on(&today())
    }

    /// Trips whose start date is on or after `today` (compared as strings)
    pub fn upcoming_trips_on(&self, today: &str) -> Vec<&Trip> {
        self.trips
            .iter()
            .filter(|trip| trip.starts_on_or_after(today))
            .collect()
    }

    /// First trip with the given id
    pub fn find_trip(&self, trip_id: &str) -> Option<&Trip> {
        let trip = self.trips.iter().find(|t| t.trip_id == trip_id);
        debug!("Trip lookup '{}': {}", trip_id, trip.is_some());
        trip
    }

    pub fn legs_for_trip(&self, trip_id: &str) -> Vec<&TripLeg> {
        self.trip_legs
            .iter()
            .filter(|leg| leg.trip_id == trip_id)
            .collect()
    }

    pub fn bookings_for_traveller(&self, traveller_id: i64) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| b.traveller_id == traveller_id)
            .collect()
    }

    /// Id for the next booking: "B" followed by the trip count plus one.
    ///
    /// Derived from the number of trips, not bookings, to stay compatible
    /// with existing bookings.csv files. Repeats once a second booking is
    /// made without a new trip in between.
    pub fn next_booking_id(&self) -> String {
        format!("B{}", self.trips.len() + 1)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Books `trip_id` for a traveller and appends the booking to bookings.csv.
    ///
    /// Fails with `LookupMiss` (file untouched) when no trip has that id.
    pub fn request_to_book_trip(
        &mut self,
        traveller_id: i64,
        trip_id: &str,
    ) -> StoreResult<Booking> {
        let Some(trip) = self.find_trip(trip_id) else {
            warn!("Booking refused, no trip '{}'", trip_id);
            return Err(StoreError::LookupMiss {
                kind: "trip",
                key: trip_id.to_string(),
            });
        };

        let booking = Booking::new(self.next_booking_id(), trip, traveller_id);
        self.save_booking(&booking)?;

        info!(
            "Booked {} for traveller {} on trip {}",
            booking.booking_id, traveller_id, booking.trip_id
        );
        self.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Appends one booking row; existing rows are never rewritten
    pub fn save_booking(&self, booking: &Booking) -> StoreResult<()> {
        self.storage::<Booking>().append(booking).inspect_err(|e| {
            warn!("Failed to save booking {}: {}", booking.booking_id, e);
        })
    }

    /// Rewrites trips.csv from the in-memory trips
    pub fn save_trips(&self) -> StoreResult<()> {
        self.save_all(&self.trips)
    }

    /// Rewrites trip_legs.csv from the in-memory legs
    pub fn save_trip_legs(&self) -> StoreResult<()> {
        self.save_all(&self.trip_legs)
    }

    fn save_all<T: Record>(&self, records: &[T]) -> StoreResult<()> {
        let storage = self.storage::<T>();
        match storage.save(records) {
            Ok(()) => {
                info!("Saved {} {} to {:?}", records.len(), T::KIND, storage.path());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to save {}: {}", T::KIND, e);
                Err(e)
            }
        }
    }

    /// Adds a trip and rewrites trips.csv.
    ///
    /// Nothing is validated. The trip stays in memory even if the save fails.
    pub fn create_trip(&mut self, trip: Trip) -> StoreResult<()> {
        debug!("Creating trip '{}'", trip.trip_id);
        self.trips.push(trip);
        self.save_trips()
    }

    /// Adds a trip leg and rewrites trip_legs.csv.
    ///
    /// The parent trip is not required to exist.
    pub fn create_trip_leg(&mut self, leg: TripLeg) -> StoreResult<()> {
        debug!("Creating leg '{}' for trip '{}'", leg.leg_id, leg.trip_id);
        self.trip_legs.push(leg);
        self.save_trip_legs()
    }

    /// First user whose username and password both match
    pub fn login(&self, username: &str, password: &str) -> StoreResult<&User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.verify_password(password))
            .ok_or_else(|| {
                warn!("Login failed for '{}'", username);
                StoreError::AuthFailure {
                    username: username.to_string(),
                }
            })
    }
}
