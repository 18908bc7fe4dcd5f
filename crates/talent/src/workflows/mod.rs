pub mod employees;
pub mod snapshot;
