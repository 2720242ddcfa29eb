pub mod connection;
pub mod entities;
pub mod migrations;
#[doc(hidden)]
pub mod test_utils;

pub use connection::{establish_connection, get_database_url, setup_database};
