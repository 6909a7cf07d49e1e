use std::path::PathBuf;

use crate::args::OutputFormat;
use crate::runner::RunSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(in crate::entry) struct OutputPlan {
    pub(super) format: OutputFormat,
    pub(super) path: Option<PathBuf>,
    pub(super) color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(in crate::entry) enum RunPlan {
    /// One instrumented fetch of the page, printed as JSON.
    Fetch(RunSettings),
    /// One page round, printed as JSON.
    FetchAll(RunSettings),
    Load {
        settings: RunSettings,
        output: OutputPlan,
    },
}
