//! # Soundscape Common Library
//!
//! Shared code for the soundscape services:
//! - Error and result types
//! - TOML configuration model and file discovery
//! - Tiered setting resolution (CLI → ENV → TOML → default)

pub mod config;
pub mod error;

pub use error::{Error, Result};
