//! DHIS2 (source system) adapter

pub mod client;
pub mod models;

pub use client::Dhis2Client;
