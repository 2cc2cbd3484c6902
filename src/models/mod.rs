//! Data models for the fallback configuration.
//!
//! This module contains the company areas, their contacts, the validated
//! configuration document and the response payload built from them.

pub mod area;
pub mod fallback_config;
pub mod response;

pub use area::{AreaContact, CompanyArea};
pub use fallback_config::{parse_timestamp, FallbackConfig};
pub use response::{FallbackResponse, DEFAULT_AREA_DESCRIPTION, DEFAULT_MESSAGE};
