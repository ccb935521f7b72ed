// top-level library module

pub mod comparisons;
pub mod sweep;
