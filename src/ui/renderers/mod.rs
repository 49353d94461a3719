pub mod learning;
pub mod jobs;
