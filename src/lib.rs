extern crate self as schemaline;

mod configuration;
mod connection;
mod connection_options;
pub mod driver;
pub mod error;
pub mod migrate;
mod parameter;
pub mod platform;
mod result;
pub mod revisions;
mod rows;
pub mod schema;
pub mod r#type;
mod util;
mod value;

#[cfg(test)]
mod tests;

pub use configuration::Configuration;
pub use connection::Connection;
pub use connection_options::ConnectionOptions;
pub use error::Error;
pub use parameter::{Parameter, ParameterType, Parameters};
pub use result::{AsyncResult, Result};
pub use rows::{Row, Rows};
pub use schemaline_macros::migrator;
pub use value::Value;
