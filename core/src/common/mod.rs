pub mod range;
pub mod stats;
