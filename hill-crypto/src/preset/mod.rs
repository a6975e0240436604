//! Built-in data shipped with the crate.

pub mod alphabets;
