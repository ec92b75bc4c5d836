// Presentation layer - HTTP ingress and console API
pub mod app_state;
pub mod handlers;
