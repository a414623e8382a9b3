//! Pipeline steps
//!
//! A [`Step`] is a titled unit of work with an optional skip predicate. Its
//! body is either an action or a group of child steps. An action may itself
//! return a list of further steps ([`StepOutcome::Expand`]), which the
//! executor runs immediately against the same context.

use super::context::ExportContext;
use super::render::StepRenderer;
use crate::core::runlog::RunLog;
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// What an action produced
pub enum StepOutcome {
    /// The step is finished
    Done,
    /// The step continues as these nested steps, run in order
    Expand(Vec<Step>),
}

/// Per-step handle given to actions: the run log and a progress output line
pub struct StepIo {
    title: String,
    depth: usize,
    log: RunLog,
    renderer: Arc<dyn StepRenderer>,
}

impl StepIo {
    pub(crate) fn new(
        title: &str,
        depth: usize,
        log: RunLog,
        renderer: Arc<dyn StepRenderer>,
    ) -> Self {
        Self {
            title: title.to_string(),
            depth,
            log,
            renderer,
        }
    }

    /// Run log shared by every step of the run
    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Updates the progress line of the running step
    pub fn output(&self, message: impl AsRef<str>) {
        self.renderer
            .output(&self.title, self.depth, message.as_ref());
    }

    /// Title of the running step
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Work performed by a step
///
/// Returning `Err` aborts the whole pipeline. Recoverable problems should be
/// recorded on the run log instead, and the action should return `Ok`.
#[async_trait]
pub trait StepAction: Send + Sync {
    async fn run(&self, ctx: &mut ExportContext, io: &StepIo) -> Result<StepOutcome>;
}

struct SyncAction<F>(F);

#[async_trait]
impl<F> StepAction for SyncAction<F>
where
    F: Fn(&mut ExportContext, &StepIo) -> Result<StepOutcome> + Send + Sync,
{
    async fn run(&self, ctx: &mut ExportContext, io: &StepIo) -> Result<StepOutcome> {
        (self.0)(ctx, io)
    }
}

/// Pure check over the current context; `true` bypasses the step
pub type SkipPredicate = Box<dyn Fn(&ExportContext) -> bool + Send + Sync>;

/// Body of a step
pub enum StepBody {
    Action(Box<dyn StepAction>),
    Group(Vec<Step>),
}

/// One titled unit of pipeline work
pub struct Step {
    title: String,
    body: StepBody,
    skip: Option<SkipPredicate>,
}

impl Step {
    /// Step backed by an async action
    pub fn action(title: impl Into<String>, action: impl StepAction + 'static) -> Self {
        Self {
            title: title.into(),
            body: StepBody::Action(Box::new(action)),
            skip: None,
        }
    }

    /// Step backed by a synchronous closure
    pub fn sync<F>(title: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ExportContext, &StepIo) -> Result<StepOutcome> + Send + Sync + 'static,
    {
        Self::action(title, SyncAction(action))
    }

    /// Ordered group of child steps; the group's skip predicate gates all of them
    pub fn group(title: impl Into<String>, children: Vec<Step>) -> Self {
        Self {
            title: title.into(),
            body: StepBody::Group(children),
            skip: None,
        }
    }

    /// Sets the skip predicate
    pub fn skip_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&ExportContext) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Box::new(predicate));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &StepBody {
        &self.body
    }

    /// Evaluates the skip predicate against the current context
    pub fn should_skip(&self, ctx: &ExportContext) -> bool {
        self.skip.as_ref().is_some_and(|skip| skip(ctx))
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Step");
        s.field("title", &self.title);
        match &self.body {
            StepBody::Action(_) => s.field("body", &"action"),
            StepBody::Group(children) => s.field("children", children),
        };
        s.field("skippable", &self.skip.is_some()).finish()
    }
}
