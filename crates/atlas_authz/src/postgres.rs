mod client;
mod config;
mod permission_store;

pub use client::*;
pub use config::*;
pub use permission_store::*;
