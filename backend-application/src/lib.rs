// Backend Application Layer

pub mod commands;
pub mod error;
pub mod queries;
pub mod session;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::AppError;
pub use state::AppState;
