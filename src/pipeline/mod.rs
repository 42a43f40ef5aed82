pub mod audit;
pub mod extraction;
pub mod statistics;
