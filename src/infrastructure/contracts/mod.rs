// Contract integration module
// Everything that talks to the MultiSigApproval contracts lives here

pub mod abis;
pub mod addresses;
pub mod client;
pub mod config;
pub mod connection;
pub mod deployer;
pub mod event_utils;
pub mod types;
pub mod utils;

pub use client::MultiSigSdk;
pub use types::*;
