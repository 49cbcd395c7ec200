//! Tests for the script VM
//!
//! Organized by feature area

mod helpers;

mod error_tests;
mod load_tests;
