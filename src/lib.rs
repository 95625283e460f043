//! Storeplex - entitlement and lifecycle engine for multi-location merchants
//!
//! Resolves what a tenant may do from its subscription tier, governs the
//! operational status of each location, and mirrors status changes to an
//! external directory through a bounded side-effect queue.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
