//! USMCA rules-of-origin qualification and tariff-savings estimation.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
