pub mod db;
pub mod error;
pub mod store;
pub mod versioner;
