pub mod analyze;
pub mod db;
pub mod provider;
pub mod settings;
