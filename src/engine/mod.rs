pub mod engine;
pub mod protocol;

pub mod export;
pub mod illustration;
pub mod safety;
pub mod synthesizer;
pub mod wizard;
