pub mod clock;
pub mod name_directory;

pub use clock::*;
pub use name_directory::*;
