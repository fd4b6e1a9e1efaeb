//! Adapters between the engine and the outside world: CSV files and the console.

pub mod console;
pub mod csv;
