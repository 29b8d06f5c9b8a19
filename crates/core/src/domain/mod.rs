pub mod chart;
pub mod contract;
