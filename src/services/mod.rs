pub mod data_source;
pub mod forecast_report;
pub mod project_config_yaml;
pub mod project_forecast;
pub mod ticket_csv;
pub mod ticket_list;
