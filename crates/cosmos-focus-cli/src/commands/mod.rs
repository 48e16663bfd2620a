pub mod ambience;
pub mod config;
pub mod quote;
pub mod settings;
pub mod task;
pub mod timer;
