pub mod aggregator;
pub mod analytics;
pub mod csv_parser;
pub mod dataset;
pub mod drill_down;
pub mod historical;
pub mod presentation;
pub mod scaling;
