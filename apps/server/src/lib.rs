//! Botnest server library.
//!
//! Bot creation, listing and replies over a hosted record store, plus the
//! explore page and the stdin CLI.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
