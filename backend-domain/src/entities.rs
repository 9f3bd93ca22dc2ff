// Domain entities

pub mod config;
pub mod page;
pub mod record;
pub mod session;

pub use config::*;
pub use page::*;
pub use record::*;
pub use session::*;
