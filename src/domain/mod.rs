pub mod project_config;
pub mod report;
pub mod ticket;
