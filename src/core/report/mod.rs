//! End-of-run report and decision
//!
//! Once the pipeline has settled (completed or aborted) the [`Reporter`]
//! prints the summary of the run and decides its outcome: the exported data
//! when no error was recorded, otherwise an aggregate failure carrying every
//! error entry, after writing them to the error log file.

pub mod format;

use crate::core::pipeline::{ExportContext, ExportData};
use crate::core::runlog::{LogEntry, LogPayload, RunLog};
use crate::domain::{MultiError, Result, SpacedumpError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub use format::{downloads_table, entity_table, humanize_duration, start_case};

/// Classification of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    SuccessWithWarnings,
    HardFailure,
}

impl RunOutcome {
    /// Derives the outcome from the recorded entries
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        if entries.iter().any(LogEntry::is_error) {
            RunOutcome::HardFailure
        } else if entries.iter().any(LogEntry::is_displayed) {
            RunOutcome::SuccessWithWarnings
        } else {
            RunOutcome::Success
        }
    }

    pub fn is_success(self) -> bool {
        self != RunOutcome::HardFailure
    }
}

/// Settings of the report that do not depend on the run itself
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether the pipeline was configured to write the snapshot
    pub save_file: bool,
    pub content_file: PathBuf,
    pub error_log_file: PathBuf,
    pub started_at: Instant,
}

/// Prints the end-of-run report to a sink and resolves the run
pub struct Reporter<W: Write> {
    out: W,
    options: ReportOptions,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, options: ReportOptions) -> Self {
        Self { out, options }
    }

    /// Reports on a settled run and returns its final result
    ///
    /// A pipeline failure is first recorded as one more error entry. The
    /// entity and download tables are printed in either case. Console output
    /// is best effort: a failing sink never changes the outcome, and the
    /// error log file is written before the aggregate failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SpacedumpError::Aggregate`] when the log holds any error
    /// entry.
    pub fn finish(
        &mut self,
        ctx: ExportContext,
        log: &RunLog,
        run: Result<()>,
    ) -> Result<ExportData> {
        let aborted = match &run {
            Ok(()) => false,
            Err(e) => {
                log.record(LogEntry::from_error(e));
                true
            }
        };

        let printed = self.print_summary(&ctx, log, aborted);
        self.console(printed);

        let entries = log.entries();
        let outcome = RunOutcome::from_entries(&entries);
        tracing::info!(
            outcome = ?outcome,
            entries = entries.len(),
            aborted,
            "Export run settled"
        );

        let errors = log.error_log();
        if errors.is_empty() {
            let printed: Result<()> =
                writeln!(self.out, "The export was successful.").map_err(Into::into);
            self.console(printed);
            return Ok(ctx.into_data());
        }

        let path = self.options.error_log_file.clone();
        let printed = match write_error_log(&path, &errors) {
            Ok(()) => writeln!(
                self.out,
                "Stored the detailed error log file at: {}",
                path.display()
            ),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to write error log");
                writeln!(
                    self.out,
                    "Could not write the error log file at {}: {e}",
                    path.display()
                )
            }
        };
        self.console(printed.map_err(Into::into));

        Err(SpacedumpError::Aggregate(MultiError::new(errors)))
    }

    /// Tables, duration, stored-file line and display log
    fn print_summary(&mut self, ctx: &ExportContext, log: &RunLog, aborted: bool) -> Result<()> {
        self.print_tables(ctx)?;
        self.print_duration()?;

        if self.options.save_file && !aborted {
            writeln!(
                self.out,
                "\nStored space data to json file at: {}",
                self.options.content_file.display()
            )?;
        }

        self.print_display_log(&log.display_log())
    }

    fn console(&self, printed: Result<()>) {
        if let Err(e) = printed {
            tracing::warn!(error = %e, "Could not write the export report");
        }
    }

    fn print_tables(&mut self, ctx: &ExportContext) -> Result<()> {
        if ctx.data().is_empty() {
            writeln!(self.out, "No data was exported")?;
        } else {
            writeln!(self.out, "{}", entity_table(ctx.data()))?;
        }

        if let Some(summary) = &ctx.asset_downloads {
            writeln!(self.out, "{}", downloads_table(summary))?;
        }
        Ok(())
    }

    fn print_duration(&mut self) -> Result<()> {
        let elapsed = self.options.started_at.elapsed();
        writeln!(
            self.out,
            "The export took {} ({}s)",
            humanize_duration(elapsed),
            elapsed.as_secs()
        )?;
        Ok(())
    }

    fn print_display_log(&mut self, display: &[LogEntry]) -> Result<()> {
        if display.is_empty() {
            writeln!(self.out, "No errors or warnings occurred")?;
            return Ok(());
        }

        let (mut errors, mut warnings) = (0, 0);
        for entry in display {
            match entry.payload() {
                LogPayload::Error(_) => errors += 1,
                LogPayload::Warning(_) => warnings += 1,
                LogPayload::Info(_) => {}
            }
        }

        writeln!(
            self.out,
            "\nThe following {errors} errors and {warnings} warnings occurred:\n"
        )?;
        for entry in display {
            writeln!(self.out, "{}", entry.summary_line())?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Returns the sink, e.g. to inspect captured output
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Writes error entries as a pretty-printed JSON array
fn write_error_log(path: &Path, errors: &[LogEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(errors)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::format::testing::{row, rows};
    use super::*;
    use crate::core::pipeline::AssetDownloadSummary;
    use crate::core::runlog::FailureDetail;
    use serde_json::json;
    use tempfile::TempDir;

    struct Harness {
        dir: TempDir,
        log: RunLog,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                log: RunLog::new(),
            }
        }

        fn error_log_path(&self) -> PathBuf {
            self.dir.path().join("errors.json")
        }

        fn reporter(&self, save_file: bool) -> Reporter<Vec<u8>> {
            Reporter::new(
                Vec::new(),
                ReportOptions {
                    save_file,
                    content_file: self.dir.path().join("snapshot.json"),
                    error_log_file: self.error_log_path(),
                    started_at: Instant::now(),
                },
            )
        }

        fn finish(
            &self,
            save_file: bool,
            ctx: ExportContext,
            run: Result<()>,
        ) -> (Result<ExportData>, String) {
            let mut reporter = self.reporter(save_file);
            let result = reporter.finish(ctx, &self.log, run);
            let output = String::from_utf8(reporter.into_inner()).unwrap();
            (result, output)
        }
    }

    #[test]
    fn test_empty_run_is_successful() {
        let harness = Harness::new();
        let (result, output) = harness.finish(false, ExportContext::new(), Ok(()));

        assert!(result.unwrap().is_empty());
        assert!(output.contains("No data was exported"));
        assert!(output.contains("The export took a few seconds (0s)"));
        assert!(output.contains("No errors or warnings occurred"));
        assert!(output.contains("The export was successful."));
        assert!(!output.contains("Stored space data"));
        assert!(!harness.error_log_path().exists());
    }

    #[test]
    fn test_entity_rows_without_download_table() {
        let harness = Harness::new();
        let mut ctx = ExportContext::new();
        ctx.extend_collection("entries", vec![json!({}), json!({})]);
        ctx.extend_collection("assets", vec![json!({})]);

        let (result, output) = harness.finish(true, ctx, Ok(()));

        let data = result.unwrap();
        assert_eq!(data["entries"].len(), 2);
        assert_eq!(
            rows(&output),
            [
                row("Exported entities", ""),
                row("Entries", "2"),
                row("Assets", "1"),
            ]
        );
        assert!(!output.contains("Asset file download results"));
        assert!(output.contains("Stored space data to json file at:"));
    }

    #[test]
    fn test_download_summary_with_warning_is_success() {
        let harness = Harness::new();
        let mut ctx = ExportContext::new();
        ctx.extend_collection("assets", vec![json!({}); 4]);
        ctx.asset_downloads = Some(AssetDownloadSummary {
            success_count: 3,
            warning_count: 1,
            error_count: 0,
        });
        harness.log.warning("Asset 4 has no file");

        let (result, output) = harness.finish(false, ctx, Ok(()));

        assert!(result.is_ok());
        let table = rows(&output);
        assert_eq!(
            table[table.len() - 4..],
            [
                row("Asset file download results", ""),
                row("Successful", "3"),
                row("Warnings", "1"),
                row("Errors", "0"),
            ]
        );
        assert!(output.contains("The following 0 errors and 1 warnings occurred:"));
        assert!(output.contains("Warning: Asset 4 has no file"));
        assert!(output.contains("The export was successful."));
    }

    #[test]
    fn test_zero_download_summary_still_prints_table() {
        let harness = Harness::new();
        let mut ctx = ExportContext::new();
        ctx.asset_downloads = Some(AssetDownloadSummary::default());

        let (_, output) = harness.finish(false, ctx, Ok(()));
        assert!(output.contains("Asset file download results"));
    }

    #[test]
    fn test_aborted_run_writes_error_artifact() {
        let harness = Harness::new();
        let mut ctx = ExportContext::new();
        ctx.extend_collection("contentTypes", vec![json!({})]);
        harness.log.warning("before the failure");

        let failure = SpacedumpError::Other("connection reset".to_string()).in_step("Fetching entries");
        let (result, output) = harness.finish(true, ctx, Err(failure));

        let err = result.unwrap_err();
        match &err {
            SpacedumpError::Aggregate(multi) => assert_eq!(multi.len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind_name(), "SpacedumpMultiError");

        // Exactly one extra error entry for the abort
        assert_eq!(harness.log.error_log().len(), 1);
        assert_eq!(harness.log.len(), 2);

        assert!(output.contains("Exported entities"));
        assert!(!output.contains("Stored space data"));
        assert!(output.contains("The following 1 errors and 1 warnings occurred:"));
        assert!(output.contains("Stored the detailed error log file at:"));
        assert!(!output.contains("The export was successful."));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(harness.error_log_path()).unwrap())
                .unwrap();
        let entries = written.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["level"], "error");
        assert_eq!(entries[0]["error"]["step"], "Fetching entries");
    }

    #[test]
    fn test_recorded_error_without_abort_fails_run() {
        let harness = Harness::new();
        harness
            .log
            .error(FailureDetail::new("ApiError", "editor interface missing"));

        let (result, output) = harness.finish(true, ExportContext::new(), Ok(()));

        assert!(matches!(result, Err(SpacedumpError::Aggregate(_))));
        // Not aborted, so the stored-file line is still printed
        assert!(output.contains("Stored space data"));
        assert!(harness.error_log_path().exists());
    }

    #[test]
    fn test_output_order() {
        let harness = Harness::new();
        let mut ctx = ExportContext::new();
        ctx.extend_collection("entries", vec![json!({})]);
        ctx.asset_downloads = Some(AssetDownloadSummary::default());

        let (_, output) = harness.finish(true, ctx, Ok(()));

        let positions: Vec<usize> = [
            "Exported entities",
            "Asset file download results",
            "The export took",
            "Stored space data",
            "No errors or warnings occurred",
            "The export was successful.",
        ]
        .iter()
        .map(|needle| output.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    fn closed_reporter(harness: &Harness) -> Reporter<ClosedSink> {
        Reporter::new(
            ClosedSink,
            ReportOptions {
                save_file: true,
                content_file: harness.dir.path().join("snapshot.json"),
                error_log_file: harness.error_log_path(),
                started_at: Instant::now(),
            },
        )
    }

    #[test]
    fn test_closed_console_still_writes_error_artifact() {
        let harness = Harness::new();
        harness
            .log
            .error(FailureDetail::new("ApiError", "editor interface missing"));

        let result = closed_reporter(&harness).finish(ExportContext::new(), &harness.log, Ok(()));

        match result {
            Err(SpacedumpError::Aggregate(multi)) => assert_eq!(multi.len(), 1),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(harness.error_log_path().exists());
    }

    #[test]
    fn test_closed_console_keeps_successful_data() {
        let harness = Harness::new();
        let mut ctx = ExportContext::new();
        ctx.extend_collection("locales", vec![json!({"code": "en-US"})]);

        let data = closed_reporter(&harness)
            .finish(ctx, &harness.log, Ok(()))
            .unwrap();
        assert_eq!(data["locales"].len(), 1);
        assert!(!harness.error_log_path().exists());
    }

    #[test]
    fn test_run_outcome() {
        assert_eq!(RunOutcome::from_entries(&[]), RunOutcome::Success);
        assert_eq!(
            RunOutcome::from_entries(&[LogEntry::info("x"), LogEntry::warning("y")]),
            RunOutcome::SuccessWithWarnings
        );
        let outcome = RunOutcome::from_entries(&[LogEntry::error(FailureDetail::new("E", "z"))]);
        assert_eq!(outcome, RunOutcome::HardFailure);
        assert!(!outcome.is_success());
        assert!(RunOutcome::SuccessWithWarnings.is_success());
    }
}
