pub mod autotag;
pub mod fetch;
pub mod library;
pub mod plugins;
pub mod query;
