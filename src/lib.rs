pub mod config;
pub mod generator;
pub mod json_schema;
pub mod patron;
pub mod writer;
