pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{determine_data_dir, get_config_path, Config};
pub use credentials::hash_password;
pub use error::{StoreError, StoreResult};
pub use models::{Booking, BookingStatus, PaymentStatus, Record, Role, Trip, TripLeg, User};
pub use storage::Storage;
pub use store::{today, TravelStore};
