//! Headless list-management components.
//!
//! Components own only their controlled value and forward user events to
//! caller-supplied callbacks, unbatched and untransformed.

pub mod patients;

pub use patients::{filter_patients, PatientsHeader, SearchBar};
