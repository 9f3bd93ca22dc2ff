pub mod identifier_queries;
pub mod record_queries;
pub mod stats_queries;
