pub mod chat;
pub mod document;
pub mod references;
pub mod search;
