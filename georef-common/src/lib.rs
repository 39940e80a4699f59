//! # georef common library
//!
//! Shared code for the georef services:
//! - Error type
//! - Bootstrap configuration loading
//! - API response types

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
