pub mod checks;
pub mod ci;
pub mod complexity;
pub mod config;
pub mod coverage;
pub mod error;
pub mod history;
pub mod io;
pub mod jenkins;
pub mod liveness;
pub mod paths;
pub mod perf;
pub mod pipeline;
pub mod render;
pub mod repos;
pub mod results;
pub mod status;
pub mod types;

pub use error::{DashboardError, Result};
