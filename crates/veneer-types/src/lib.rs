//! Foundation types for VENEER.
//!
//! This crate contains the pieces shared by every VENEER crate: the error
//! taxonomy, the output line model handed to the surrounding UI, and the
//! shell configuration.

pub mod config;
pub mod error;
pub mod output;
