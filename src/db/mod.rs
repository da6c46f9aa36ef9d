pub mod fields;
pub mod forms;
pub mod responses;
