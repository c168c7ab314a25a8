pub mod atomic;
pub mod git;
pub mod project_io;
pub mod store;
