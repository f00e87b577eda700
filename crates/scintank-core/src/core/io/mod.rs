pub mod events;
pub mod spectrum;
