pub mod date;
pub mod sanitize;

pub use date::normalize_date;
pub use sanitize::{cell, join_descriptions, normalize_url, optional_cell};
