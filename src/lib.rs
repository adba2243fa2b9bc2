pub mod config;
pub mod error;
pub mod inference;
pub mod response;
pub mod server;
pub mod upload;

pub use error::{Error, Result};
