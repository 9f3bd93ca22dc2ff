pub mod auth_handlers;
pub mod health_handlers;
pub mod record_handlers;
pub mod stats_handlers;

pub use auth_handlers::*;
pub use health_handlers::*;
pub use record_handlers::*;
pub use stats_handlers::*;
