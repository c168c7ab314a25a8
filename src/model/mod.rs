pub mod collection;
pub mod config;
pub mod todo;

pub use collection::*;
pub use config::*;
pub use todo::*;
