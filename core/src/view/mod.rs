pub mod cursor;
pub mod dual;
pub mod mode;
pub mod plan;
