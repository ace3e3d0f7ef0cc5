pub mod application;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod logging;
pub mod recovery;
pub mod validation;
