//! Go.Data (destination system) adapter

pub mod client;
pub mod models;

pub use client::GoDataClient;
