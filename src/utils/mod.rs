//! Utility functions and helpers.
//!
//! This module contains the filesystem measurement and size formatting
//! helpers used throughout the application.

pub mod size;

pub use size::{
    DirMeasurement, WalkIssue, calculate_dir_size, calculate_dir_size_with, format_size,
    measure_dir,
};
