pub mod doctor;
pub mod focus;
pub mod todo_ops;
