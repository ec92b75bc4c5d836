// Domain layer - Telemetry types and bounded view state
pub mod alert;
pub mod classifier;
pub mod command;
pub mod connectivity;
pub mod history;
pub mod reading;
pub mod series;
pub mod view;
