/// FinLex - Financial Legal Assistant (terminal client)
///
/// Core library providing the chat transcript, references sidebar,
/// document viewer, and keyword search panels over the assistant
/// service's HTTP API.

pub mod api;
pub mod config;
pub mod logging;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
