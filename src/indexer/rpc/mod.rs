pub mod contracts;
pub mod logs;
