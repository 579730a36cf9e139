//! Terminal UI: Elm-style event loop over four panels (conversation,
//! references, document viewer, search).

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;
