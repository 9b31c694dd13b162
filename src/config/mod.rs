mod errors;
mod job_config;

pub use job_config::{ColumnBindings, JobConfig, NeighborhoodSettings};
