//! Concrete rule configuration stores.

pub mod in_memory;
pub mod json_file;
