//! Time-bounded iteration workers and the aggregator that runs them.
mod aggregator;
mod worker;


pub use aggregator::{Aggregator, RunSettings};
pub use worker::{IterationWorker, WorkerState, session_cookies};
