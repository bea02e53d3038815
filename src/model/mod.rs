pub mod catalog;
pub mod character;
pub mod credential;
pub mod story;
