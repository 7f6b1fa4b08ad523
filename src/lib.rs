pub mod cli;
pub mod data;
pub mod model;
pub mod optimizer;
pub mod parallel;
pub mod report;
