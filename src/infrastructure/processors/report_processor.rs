use crate::core::config::ReportingConfig;
use crate::core::models::{ProcessingStats, ProcessorId};
use crate::utils::{format_bytes, savings_percent, Result};
use colored::*;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::path::Path;

const SHOWN_ERRORS: usize = 3;
const LOW_JS_SAVINGS: f64 = 20.0;
const LOW_COMPRESSION_RATIO: f64 = 30.0;

/// Aggregated figures across every recorded processor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub files_processed: usize,
    pub original_size: u64,
    pub compressed_size: u64,
    pub errors: usize,
}

impl ReportTotals {
    pub fn saved_bytes(&self) -> u64 {
        self.original_size.saturating_sub(self.compressed_size)
    }

    pub fn savings_percent(&self) -> f64 {
        savings_percent(self.original_size, self.compressed_size)
    }
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    name: &'a str,
    #[serde(flatten)]
    stats: &'a ProcessingStats,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    processors: Vec<ReportEntry<'a>>,
    totals: ReportTotals,
    recommendations: Vec<String>,
}

/// Collects per-processor stats and renders the end-of-run summary
#[derive(Debug, Clone, Default)]
pub struct ReportProcessor {
    config: ReportingConfig,
    entries: Vec<(String, ProcessingStats)>,
}

impl ReportProcessor {
    pub fn new(config: ReportingConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    /// Record stats under `name`, replacing any earlier entry with that name
    pub fn add_stats(&mut self, name: impl Into<String>, stats: ProcessingStats) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = stats,
            None => self.entries.push((name, stats)),
        }
    }

    pub fn stats(&self, name: &str) -> Option<&ProcessingStats> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, stats)| stats)
    }

    pub fn entries(&self) -> &[(String, ProcessingStats)] {
        &self.entries
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Sums every recorded entry, including zero-file runs and stub failures.
    /// The rendered per-processor sections only list entries with files.
    pub fn totals(&self) -> ReportTotals {
        let mut totals = ReportTotals::default();
        for (_, stats) in &self.entries {
            totals.files_processed += stats.file_count;
            totals.errors += stats.errors.len();
            if let Some((original, compressed)) = stats.sizes() {
                totals.original_size += original;
                totals.compressed_size += compressed;
            }
        }
        totals
    }

    pub fn recommendations(&self) -> Vec<String> {
        let mut tips = Vec::new();
        let active = |id: ProcessorId| self.stats(id.name()).filter(|s| s.file_count > 0);

        if let Some((original, compressed)) = active(ProcessorId::JavaScript).and_then(|s| s.sizes()) {
            if savings_percent(original, compressed) < LOW_JS_SAVINGS {
                tips.push(
                    "JavaScript savings are low; the bundler may already minify its output".to_string(),
                );
            }
        }

        for id in [ProcessorId::Gzip, ProcessorId::Brotli] {
            if let Some((original, compressed)) = active(id).and_then(|s| s.sizes()) {
                if savings_percent(original, compressed) < LOW_COMPRESSION_RATIO {
                    tips.push(format!(
                        "{} ratio is low; consider excluding already-compressed assets",
                        id.display_name()
                    ));
                }
            }
        }

        if active(ProcessorId::Html).is_some() {
            tips.push("HTML is minified; also enable gzip/brotli compression on the web server".to_string());
        }

        if active(ProcessorId::Gzip).is_some() || active(ProcessorId::Brotli).is_some() {
            tips.push(
                "Pre-compressed files were generated; configure the server to serve them (e.g. nginx gzip_static on)"
                    .to_string(),
            );
        }

        if self.totals().errors > 0 {
            tips.push("Some files failed to process; re-run with --verbose for details".to_string());
        }

        tips
    }

    /// The human-readable report, or `None` when reporting is disabled
    pub fn render(&self) -> Option<String> {
        if !self.config.enabled {
            return None;
        }

        let mut out = String::new();
        self.write_report(&mut out).ok()?;
        Some(out)
    }

    fn write_report(&self, out: &mut String) -> fmt::Result {
        let rule = "═".repeat(50);

        writeln!(out)?;
        writeln!(out, "{}", rule.bright_blue())?;
        writeln!(out, "{}", "📊 Post-build report".bold())?;
        writeln!(out, "{}", rule.bright_blue())?;

        for (name, stats) in self.entries.iter().filter(|(_, s)| s.file_count > 0) {
            self.write_entry(out, name, stats)?;
        }

        let totals = self.totals();
        writeln!(out)?;
        writeln!(out, "{}", "📈 Totals".bold())?;
        writeln!(out, "   Files processed: {}", totals.files_processed.to_string().cyan())?;
        if totals.original_size > 0 {
            writeln!(
                out,
                "   Size: {} → {} (saved {}, {:.1}%)",
                format_bytes(totals.original_size),
                format_bytes(totals.compressed_size),
                format_bytes(totals.saved_bytes()).green(),
                totals.savings_percent()
            )?;
        }
        let errors = totals.errors.to_string();
        writeln!(
            out,
            "   Errors: {}",
            if totals.errors > 0 { errors.red() } else { errors.green() }
        )?;

        let tips = self.recommendations();
        if !tips.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "💡 Recommendations".bold())?;
            for tip in tips {
                writeln!(out, "   - {}", tip)?;
            }
        }

        Ok(())
    }

    fn write_entry(&self, out: &mut String, name: &str, stats: &ProcessingStats) -> fmt::Result {
        let heading = match name.parse::<ProcessorId>() {
            Ok(id) => format!("{} {}", id.emoji(), id.display_name()),
            Err(_) => name.to_string(),
        };

        writeln!(out)?;
        writeln!(out, "{}", heading.bold())?;
        writeln!(out, "   Files processed: {}", stats.file_count.to_string().cyan())?;

        if let Some((original, compressed)) = stats.sizes() {
            writeln!(
                out,
                "   Size: {} → {} (saved {}, {:.1}%)",
                format_bytes(original),
                format_bytes(compressed),
                format_bytes(original.saturating_sub(compressed)).green(),
                savings_percent(original, compressed)
            )?;
        }

        if !stats.deleted_dirs().is_empty() {
            writeln!(out, "   Deleted folders: {}", stats.deleted_dirs().len())?;
        }

        if !stats.errors.is_empty() {
            writeln!(out, "   {} {}", "⚠️  Errors:".yellow(), stats.errors.len())?;
            if self.config.show_file_details {
                for message in stats.errors.iter().take(SHOWN_ERRORS) {
                    writeln!(out, "     - {}", message.red())?;
                }
                if stats.errors.len() > SHOWN_ERRORS {
                    writeln!(out, "     ... and {} more errors", stats.errors.len() - SHOWN_ERRORS)?;
                }
            }
        }

        Ok(())
    }

    /// Print the report to stdout. Does nothing when reporting is disabled.
    pub fn generate_report(&self) {
        if let Some(report) = self.render() {
            println!("{}", report);
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let report = JsonReport {
            processors: self
                .entries
                .iter()
                .map(|(name, stats)| ReportEntry { name, stats })
                .collect(),
            totals: self.totals(),
            recommendations: self.recommendations(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.to_json()?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(files: usize, before: u64, after: u64) -> ProcessingStats {
        let mut stats = ProcessingStats::sized();
        for _ in 0..files {
            stats.record_size(before / files as u64, after / files as u64);
        }
        stats
    }

    fn report() -> ReportProcessor {
        colored::control::set_override(false);
        ReportProcessor::new(ReportingConfig::default())
    }

    #[test]
    fn test_add_stats_replaces_instead_of_summing() {
        let mut report = report();
        report.add_stats("javascript", sized(2, 1000, 400));
        report.add_stats("javascript", sized(1, 500, 200));

        assert_eq!(report.entries().len(), 1);
        assert_eq!(report.stats("javascript").unwrap().file_count, 1);
        assert_eq!(report.totals().original_size, 500);
    }

    #[test]
    fn test_totals_span_all_entries() {
        let mut report = report();
        report.add_stats("javascript", sized(2, 1000, 400));
        let mut cleanup = ProcessingStats::cleanup();
        cleanup.record_deleted_file("a.map".into());
        cleanup.record_error("b.map: permission denied");
        report.add_stats("cleanup", cleanup);
        report.add_stats("brotli", ProcessingStats::failed("Unsupported compression algorithm: zstd"));

        let totals = report.totals();
        assert_eq!(totals.files_processed, 3);
        assert_eq!(totals.original_size, 1000);
        assert_eq!(totals.compressed_size, 400);
        assert_eq!(totals.errors, 2);
    }

    #[test]
    fn test_stub_failure_counted_in_totals_but_not_listed() {
        let mut report = report();
        report.add_stats("javascript", sized(1, 800, 300));
        report.add_stats("brotli", ProcessingStats::failed("timed out after 5s"));

        assert_eq!(report.totals().errors, 1);
        let text = report.render().unwrap();
        assert!(!text.contains("Brotli"));
        assert!(text.contains("Errors: "));
    }

    #[test]
    fn test_render_lists_only_active_processors() {
        let mut report = report();
        report.add_stats("javascript", sized(1, 1000, 300));
        report.add_stats("css", ProcessingStats::sized());

        let text = report.render().unwrap();
        assert!(text.contains("JavaScript compression"));
        assert!(!text.contains("CSS compression"));
        assert!(text.contains("saved 700 B"));
    }

    #[test]
    fn test_error_details_are_truncated() {
        let mut report = report();
        let mut stats = sized(1, 100, 50);
        for i in 0..5 {
            stats.record_error(format!("dist/{}.html: bad markup", i));
        }
        report.add_stats("html", stats);

        let text = report.render().unwrap();
        assert!(text.contains("dist/2.html"));
        assert!(!text.contains("dist/3.html"));
        assert!(text.contains("... and 2 more errors"));
    }

    #[test]
    fn test_error_details_hidden_when_disabled() {
        colored::control::set_override(false);
        let mut report = ReportProcessor::new(ReportingConfig {
            enabled: true,
            show_file_details: false,
        });
        let mut stats = sized(1, 100, 50);
        stats.record_error("dist/a.html: bad markup");
        report.add_stats("html", stats);

        let text = report.render().unwrap();
        assert!(text.contains("Errors:"));
        assert!(!text.contains("dist/a.html"));
    }

    #[test]
    fn test_disabled_report_renders_nothing() {
        let mut report = ReportProcessor::new(ReportingConfig {
            enabled: false,
            show_file_details: true,
        });
        report.add_stats("javascript", sized(1, 10, 5));
        assert!(report.render().is_none());
    }

    #[test]
    fn test_recommendations() {
        let mut report = report();
        report.add_stats("javascript", sized(1, 1000, 900));
        report.add_stats("html", sized(1, 1000, 500));
        report.add_stats("gzip", sized(1, 1000, 800));

        let tips = report.recommendations();
        assert!(tips.iter().any(|t| t.contains("JavaScript savings are low")));
        assert!(tips.iter().any(|t| t.contains("Gzip compression ratio is low")));
        assert!(tips.iter().any(|t| t.contains("web server")));
        assert!(tips.iter().any(|t| t.contains("gzip_static")));
        assert!(!tips.iter().any(|t| t.contains("--verbose")));
    }

    #[test]
    fn test_json_report_shape() {
        let mut report = report();
        report.add_stats("gzip", sized(1, 2000, 600));

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["processors"][0]["name"], "gzip");
        assert_eq!(value["processors"][0]["fileCount"], 1);
        assert_eq!(value["processors"][0]["detail"]["kind"], "size");
        assert_eq!(value["totals"]["compressedSize"], 600);
    }

    #[tokio::test]
    async fn test_write_json_creates_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("report.json");
        let mut report = report();
        report.add_stats("html", sized(1, 10, 5));

        report.write_json(&path).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"html\""));
    }
}
