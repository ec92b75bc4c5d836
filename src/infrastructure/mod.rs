// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod http_command_sender;
pub mod http_history_source;
pub mod http_response;
pub mod view_hub;
