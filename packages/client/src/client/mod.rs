//! The immutable client and its request execution

mod core;
mod prepare;

pub use self::core::Client;
pub(crate) use self::prepare::Prepared;
