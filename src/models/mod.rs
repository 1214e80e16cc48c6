pub mod benchmark;
pub mod cognitive;
pub mod history;
pub mod snapshot;
pub mod visual;
