//! Sequential step executor

use super::context::ExportContext;
use super::render::StepRenderer;
use super::step::{Step, StepBody, StepIo, StepOutcome};
use crate::core::runlog::RunLog;
use crate::domain::Result;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Runs a step tree strictly in order against one context
///
/// For each step the skip predicate is evaluated first, against the context
/// as it stands at that moment. The first failing step aborts the run: no
/// later sibling, and no later step at any outer level, is started. The
/// failure is wrapped with the title of the action that raised it and is
/// passed through enclosing groups unchanged.
pub struct PipelineExecutor {
    log: RunLog,
    renderer: Arc<dyn StepRenderer>,
}

impl PipelineExecutor {
    pub fn new(log: RunLog, renderer: Arc<dyn StepRenderer>) -> Self {
        Self { log, renderer }
    }

    /// Runs the top-level steps
    pub async fn run(&self, steps: &[Step], ctx: &mut ExportContext) -> Result<()> {
        tracing::debug!(steps = steps.len(), "Starting pipeline");
        let result = self.run_steps(steps, ctx, 0).await;
        match &result {
            Ok(()) => tracing::debug!("Pipeline completed"),
            Err(e) => tracing::debug!(error = %e, "Pipeline aborted"),
        }
        result
    }

    fn run_steps<'a>(
        &'a self,
        steps: &'a [Step],
        ctx: &'a mut ExportContext,
        depth: usize,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            for step in steps {
                self.run_step(step, ctx, depth).await?;
            }
            Ok(())
        })
    }

    async fn run_step(&self, step: &Step, ctx: &mut ExportContext, depth: usize) -> Result<()> {
        let title = step.title();

        if step.should_skip(ctx) {
            tracing::debug!(step = title, depth, "Step skipped");
            self.renderer.skipped(title, depth);
            return Ok(());
        }

        tracing::debug!(step = title, depth, "Step started");
        self.renderer.started(title, depth);

        let result = match step.body() {
            StepBody::Group(children) => self.run_steps(children, ctx, depth + 1).await,
            StepBody::Action(action) => {
                let io = StepIo::new(title, depth, self.log.clone(), Arc::clone(&self.renderer));
                match action.run(ctx, &io).await {
                    Ok(StepOutcome::Done) => Ok(()),
                    Ok(StepOutcome::Expand(children)) => {
                        self.run_steps(&children, ctx, depth + 1).await
                    }
                    Err(e) => {
                        tracing::error!(step = title, depth, error = %e, "Step failed");
                        Err(e.in_step(title))
                    }
                }
            }
        };

        match &result {
            Ok(()) => self.renderer.completed(title, depth),
            Err(e) => self.renderer.failed(title, depth, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::render::testing::RecordingRenderer;
    use crate::domain::SpacedumpError;
    use serde_json::json;

    fn executor() -> (PipelineExecutor, Arc<RecordingRenderer>, RunLog) {
        let renderer = Arc::new(RecordingRenderer::default());
        let log = RunLog::new();
        let executor = PipelineExecutor::new(log.clone(), renderer.clone());
        (executor, renderer, log)
    }

    fn push(name: &'static str) -> Step {
        Step::sync(name, move |ctx, _| {
            ctx.extend_collection("order", vec![json!(name)]);
            Ok(StepOutcome::Done)
        })
    }

    fn fail(name: &'static str) -> Step {
        Step::sync(name, |_, _| Err(SpacedumpError::Other("boom".to_string())))
    }

    fn order(ctx: &ExportContext) -> Vec<String> {
        ctx.collection("order")
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    #[tokio::test]
    async fn test_runs_steps_in_order() {
        let (executor, renderer, _) = executor();
        let steps = vec![push("a"), push("b"), push("c")];
        let mut ctx = ExportContext::new();

        executor.run(&steps, &mut ctx).await.unwrap();

        assert_eq!(order(&ctx), ["a", "b", "c"]);
        assert_eq!(
            renderer.events(),
            [
                "started:0:a",
                "completed:0:a",
                "started:0:b",
                "completed:0:b",
                "started:0:c",
                "completed:0:c"
            ]
        );
    }

    #[tokio::test]
    async fn test_skip_predicate_sees_earlier_writes() {
        let (executor, renderer, _) = executor();
        let steps = vec![
            Step::sync("probe", |ctx, _| {
                ctx.log_directory_exists = true;
                Ok(StepOutcome::Done)
            }),
            push("create").skip_if(|ctx| ctx.log_directory_exists),
            push("write"),
        ];
        let mut ctx = ExportContext::new();

        executor.run(&steps, &mut ctx).await.unwrap();

        assert_eq!(order(&ctx), ["write"]);
        assert!(renderer.events().contains(&"skipped:0:create".to_string()));
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_steps() {
        let (executor, renderer, _) = executor();
        let steps = vec![
            push("a"),
            Step::group("group", vec![push("b"), fail("c"), push("d")]),
            push("e"),
        ];
        let mut ctx = ExportContext::new();

        let err = executor.run(&steps, &mut ctx).await.unwrap_err();

        assert_eq!(order(&ctx), ["a", "b"]);
        match &err {
            SpacedumpError::StepFailed { step, source } => {
                assert_eq!(step, "c");
                assert!(matches!(**source, SpacedumpError::Other(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let events = renderer.events();
        assert!(events.contains(&"failed:1:c".to_string()));
        assert!(events.contains(&"failed:0:group".to_string()));
        assert!(!events.iter().any(|e| e.ends_with(":d") || e.ends_with(":e")));
    }

    #[tokio::test]
    async fn test_skipped_group_skips_children() {
        let (executor, renderer, _) = executor();
        let steps = vec![
            Step::group("write", vec![push("x"), push("y")]).skip_if(|_| true),
            push("after"),
        ];
        let mut ctx = ExportContext::new();

        executor.run(&steps, &mut ctx).await.unwrap();

        assert_eq!(order(&ctx), ["after"]);
        assert_eq!(renderer.events()[0], "skipped:0:write");
    }

    #[tokio::test]
    async fn test_expanded_steps_run_nested() {
        let (executor, renderer, log) = executor();
        let steps = vec![
            Step::sync("fetch", |_, io| {
                io.log().info("expanding");
                Ok(StepOutcome::Expand(vec![push("entries"), push("assets")]))
            }),
            push("done"),
        ];
        let mut ctx = ExportContext::new();

        executor.run(&steps, &mut ctx).await.unwrap();

        assert_eq!(order(&ctx), ["entries", "assets", "done"]);
        assert_eq!(log.len(), 1);
        let events = renderer.events();
        assert!(events.contains(&"started:1:entries".to_string()));
        let fetch_done = events.iter().position(|e| e == "completed:0:fetch").unwrap();
        let assets_done = events.iter().position(|e| e == "completed:1:assets").unwrap();
        assert!(assets_done < fetch_done);
    }

    #[tokio::test]
    async fn test_failure_inside_expansion_names_the_leaf() {
        let (executor, _, _) = executor();
        let steps = vec![Step::sync("fetch", |_, _| {
            Ok(StepOutcome::Expand(vec![fail("Fetching entries")]))
        })];
        let mut ctx = ExportContext::new();

        let err = executor.run(&steps, &mut ctx).await.unwrap_err();
        assert!(matches!(err, SpacedumpError::StepFailed { ref step, .. } if step == "Fetching entries"));
    }

    #[tokio::test]
    async fn test_empty_pipeline_succeeds() {
        let (executor, renderer, _) = executor();
        let mut ctx = ExportContext::new();
        executor.run(&[], &mut ctx).await.unwrap();
        assert!(renderer.events().is_empty());
    }
}
