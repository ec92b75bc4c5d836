// Application layer - Controller, ports, and the event loop
pub mod event_loop;
pub mod ports;
pub mod telemetry_controller;

#[cfg(test)]
pub mod testing;
