pub mod analytics;
pub mod dataset;
pub mod employee;
pub mod settings;
