//! MPDB daemon
//!
//! - [`ServerConfig`]: `mpdb.toml` plus defaults
//! - [`Server`]: TCP accept loop speaking line-delimited JSON
//!
//! The binary `mpdbd` wires these to the command line and logging.

#![warn(missing_docs)]

pub mod config;
pub mod server;

pub use config::{ServerConfig, CONFIG_FILE_NAME};
pub use server::Server;
