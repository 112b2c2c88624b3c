mod auth;
mod chat;
mod document;

pub use auth::*;
pub use chat::*;
pub use document::*;
