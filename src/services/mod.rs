pub mod ai;
pub mod processor;
pub mod search;
