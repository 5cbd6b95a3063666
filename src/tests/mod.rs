mod connection;

pub use connection::create_connection;
pub use connection::get_database_dsn;
pub use functional_tests_helper::FunctionalTestsHelper;
