pub mod ports;
pub mod event_bus;
pub mod image;
pub mod transform;
pub mod generation;
pub mod sandbox;
pub mod store;
pub mod dispatcher;
pub mod autosave;
pub mod playground;


pub use playground::{PlaygroundServices, PlaygroundSession};
