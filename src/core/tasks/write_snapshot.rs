//! "Write export log file" step group

use crate::core::pipeline::{ExportContext, Step, StepOutcome};
use crate::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "Write export log file";
pub const LOOKUP_TITLE: &str = "Lookup directory to store the logs";
pub const CREATE_TITLE: &str = "Create log directory";
pub const WRITE_TITLE: &str = "Writing data to file";

/// Probes the export directory, creates it when missing, then writes the
/// snapshot as two-space indented JSON
///
/// The whole group is skipped when `save_file` is off.
pub fn step(save_file: bool, export_dir: impl Into<PathBuf>, content_file: impl Into<PathBuf>) -> Step {
    let export_dir = export_dir.into();
    let content_file = content_file.into();
    let probe_dir = export_dir.clone();

    Step::group(
        TITLE,
        vec![
            Step::sync(LOOKUP_TITLE, move |ctx, _| {
                ctx.log_directory_exists = probe_dir.is_dir();
                tracing::debug!(
                    path = %probe_dir.display(),
                    exists = ctx.log_directory_exists,
                    "Export directory probed"
                );
                Ok(StepOutcome::Done)
            }),
            Step::sync(CREATE_TITLE, move |_, io| {
                fs::create_dir_all(&export_dir)?;
                io.log()
                    .info(format!("Created directory {}", export_dir.display()));
                Ok(StepOutcome::Done)
            })
            .skip_if(|ctx| ctx.log_directory_exists),
            Step::sync(WRITE_TITLE, move |ctx, io| {
                write_json(ctx, &content_file)?;
                io.log()
                    .info(format!("Wrote snapshot to {}", content_file.display()));
                Ok(StepOutcome::Done)
            }),
        ],
    )
    .skip_if(move |_| !save_file)
}

fn write_json(ctx: &ExportContext, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, ctx.data())?;
    std::io::Write::flush(&mut writer)?;
    tracing::info!(path = %path.display(), collections = ctx.data().len(), "Snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::{PipelineExecutor, StepRenderer};
    use crate::core::pipeline::render::testing::RecordingRenderer;
    use crate::core::runlog::RunLog;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn run(step: Step, ctx: &mut ExportContext) -> Vec<String> {
        let renderer = Arc::new(RecordingRenderer::default());
        let executor = PipelineExecutor::new(
            RunLog::new(),
            renderer.clone() as Arc<dyn StepRenderer>,
        );
        executor.run(&[step], ctx).await.unwrap();
        renderer.events()
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let root = TempDir::new().unwrap();
        let export_dir = root.path().join("out");
        let content_file = export_dir.join("snapshot.json");
        let mut ctx = ExportContext::new();
        ctx.extend_collection("entries", vec![json!({"sys": {"id": "e1"}})]);

        let events = run(step(true, &export_dir, &content_file), &mut ctx).await;

        assert!(!ctx.log_directory_exists);
        assert!(events.contains(&format!("completed:1:{CREATE_TITLE}")));

        let written = fs::read_to_string(&content_file).unwrap();
        assert!(written.starts_with("{\n  \"entries\""));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["entries"][0]["sys"]["id"], "e1");
    }

    #[tokio::test]
    async fn test_existing_directory_skips_creation() {
        let root = TempDir::new().unwrap();
        let content_file = root.path().join("snapshot.json");
        let mut ctx = ExportContext::new();

        let events = run(step(true, root.path(), &content_file), &mut ctx).await;

        assert!(ctx.log_directory_exists);
        assert!(events.contains(&format!("skipped:1:{CREATE_TITLE}")));
        assert_eq!(fs::read_to_string(&content_file).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_group_skipped_without_save_file() {
        let root = TempDir::new().unwrap();
        let content_file = root.path().join("snapshot.json");
        let mut ctx = ExportContext::new();

        let events = run(step(false, root.path(), &content_file), &mut ctx).await;

        assert_eq!(events, [format!("skipped:0:{TITLE}")]);
        assert!(!content_file.exists());
    }
}
