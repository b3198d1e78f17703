pub mod add;
pub mod edit;
pub mod export;
pub mod remove;
pub mod report;
pub mod visualize;
