//! Accounts API library.
//!
//! User account management over HTTP: list, fetch, create, update and delete
//! users, plus cookie-backed login sessions. The binary in `main.rs` wires
//! this library to configuration, Sentry and a listener; tests drive
//! [`routes::app`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
