//! In-tree integration tests driving the event loop state machine
//! without a terminal or a live server.
