//! Sentinel - booking decision engine for secure transport
//!
//! This library prices bookings, matches them to drivers and combines both
//! with customer and demand advice into a single decision, degrading instead
//! of failing when a subsystem is unavailable.

pub mod advisory;
pub mod booking;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod external;
pub mod health;
pub mod logging;
pub mod orchestrator;
pub mod pricing;
pub mod registry;
