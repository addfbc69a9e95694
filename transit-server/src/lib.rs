//! Transit backend server.
//!
//! Serves bus routes and their timetables, and answers: "I'm at this stop,
//! which other routes can I walk to from here?"

pub mod catalog;
pub mod config;
pub mod connections;
pub mod domain;
pub mod geo;
pub mod store;
pub mod web;
