pub mod agent;
pub mod build;
pub mod config;
pub mod docs;
pub mod error;
pub mod io;
pub mod loader;
pub mod markdown;
pub mod paths;
pub mod render;
pub mod schema;
pub mod target;

pub use error::{InstallerError, Result};
