use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Browse trips, request bookings and manage trips")]
pub struct Cli {
    /// Folder holding trips.csv, bookings.csv, trip_legs.csv and users.csv
    #[clap(long, short = 'd')]
    pub data_dir: Option<PathBuf>,

    /// Log store activity (RUST_LOG overrides)
    #[clap(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Log filter used when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["travel"]);
        assert!(cli.data_dir.is_none());
        assert_eq!(cli.default_log_filter(), "warn");
    }

    #[test]
    fn test_data_dir_and_verbose() {
        let cli = Cli::parse_from(["travel", "--data-dir", "/srv/trips", "-v"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/trips")));
        assert_eq!(cli.default_log_filter(), "info");
    }
}
