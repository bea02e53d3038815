pub mod app;
pub mod credential;
pub mod preview;
pub mod settings;
pub mod settings_io;
pub mod steps;
