//! External directory adapters.

mod http_client;

pub use http_client::{DirectoryClientConfig, HttpDirectoryClient};
