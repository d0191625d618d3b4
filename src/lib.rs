pub mod config;
pub mod logging;

// Core modules
pub mod lookup;
pub mod prefetch;
pub mod progress;
pub mod workers;
