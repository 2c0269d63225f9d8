pub mod constructors;
pub mod types;

pub(crate) use constructors::{configuration, connect, request};
pub use types::{Error, Kind, Result};
