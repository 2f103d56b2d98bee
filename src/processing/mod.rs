pub mod compare;
pub mod pivot;
pub mod reshape;
pub mod statistics;
