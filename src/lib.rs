//! Loan Tracker Backend Library
//!
//! Loan records with a create/pay lifecycle, exposed over a small JSON API.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod loan;
pub mod middleware;
pub mod routes;
