pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod hash;
pub mod output;

pub use client::{ClientConfig, Hashlookup, Page, TxtResolver};
pub use config::Config;
pub use error::{Error, Result};
pub use hash::{HashKind, Query};
