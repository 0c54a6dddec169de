#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication and session"]
#![doc = "handling, email dispatch, routing configuration, and error handling"]
#![doc = "for the task-board backend. It is used by the main binary (`main.rs`)"]
#![doc = "to construct and run the application."]

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
