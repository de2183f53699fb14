//! API endpoint handlers.
//!
//! Handlers stay thin: they resolve state from `ApiContext` and hand plain
//! values to the validation, lookup and document modules.

pub mod health;
pub mod materials;
pub mod profiles;
pub mod requests;
