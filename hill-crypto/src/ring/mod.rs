//! # Ring Module
//!
//! Provides the [`Ring`] struct for representing Z/mZ and performing modular arithmetic,
//! plus the integer helpers and mod-m matrix products the cipher is built on.

pub mod helper;
pub mod math;
pub mod matrix_ops;

/// Represents a mathematical vector using a `Vec<i64>`.
pub type Vector = Vec<i64>;
/// Represents a mathematical matrix using a `Vec<Vec<i64>>`.
pub type Matrix = Vec<Vec<i64>>;

pub use helper::{extended_gcd, gcd, is_coprime, is_prime, lcm, mod_inverse};
pub use math::Ring;
