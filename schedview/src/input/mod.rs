pub mod dataset;
pub mod script;
