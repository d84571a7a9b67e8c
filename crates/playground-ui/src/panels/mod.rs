pub mod chat;
pub mod code;
pub mod preview;
pub mod sessions;
pub mod settings;
