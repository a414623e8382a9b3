//! Step pipeline
//!
//! An export is a tree of titled steps run strictly in order against one
//! shared [`ExportContext`]. Steps carry optional skip predicates, may be
//! grouped, and may expand into further steps at run time. The first failing
//! step aborts the whole run.

pub mod context;
pub mod executor;
pub mod render;
pub mod step;

pub use context::{AssetDownloadSummary, ExportContext, ExportData};
pub use executor::PipelineExecutor;
pub use render::{renderer_for, SilentRenderer, StepRenderer, UpdateRenderer, VerboseRenderer};
pub use step::{SkipPredicate, Step, StepAction, StepBody, StepIo, StepOutcome};
