pub mod config;
pub mod corpus;
pub mod error;
pub mod sink;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
