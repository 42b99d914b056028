//! Showrunner - show progression API for live cooking broadcasts
//!
//! Shows move through an ordered list of steps; the service tracks which step
//! the audience is on and whether the show has started or finished.

pub mod config;
pub mod logging;
pub mod rest;
pub mod shows;
pub mod store;
