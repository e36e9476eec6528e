//! `doctools render`: bring every diagram image up to date.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::{
    cli::RenderArgs,
    config::DocsConfig,
    core::is_shutdown,
    debug,
    diagram::{DiagramCache, RenderOutcome, Toolchain, collect_sources},
    freshness::Freshness,
    log,
    logger::ProgressLine,
    utils::{plural_count, plural_s},
};

/// Per-run tallies.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub cached: usize,
    pub degraded: usize,
    pub warnings: usize,
    pub failed: Vec<PathBuf>,
}

impl RenderSummary {
    fn record(&mut self, outcome: &RenderOutcome) {
        match outcome {
            RenderOutcome::Cached => self.cached += 1,
            RenderOutcome::Rendered => self.rendered += 1,
            RenderOutcome::Degraded(warnings) => {
                self.degraded += 1;
                self.warnings += warnings.len();
            }
        }
    }

    fn report(&self) {
        let mut parts = vec![
            format!("{} rendered", self.rendered),
            format!("{} cached", self.cached),
        ];
        if self.degraded > 0 {
            parts.push(format!(
                "{} with {}",
                self.degraded,
                plural_count(self.warnings, "warning")
            ));
        }
        if !self.failed.is_empty() {
            parts.push(format!("{} failed", self.failed.len()));
        }
        log!("render"; "{}", parts.join(", "));
    }
}

pub fn run_render(args: &RenderArgs, config: &DocsConfig) -> Result<()> {
    let paths = if args.paths.is_empty() {
        existing_dirs(&config.diagram.dirs)
    } else {
        args.paths.clone()
    };
    let sources = collect_sources(&paths, &config.diagram.extension);

    if sources.is_empty() {
        log!("render"; "no .{} sources found", config.diagram.extension);
        return Ok(());
    }

    let cache = DiagramCache::from_config(&config.diagram);

    if args.status {
        return report_status(&cache, &sources);
    }

    let summary = render_all(&cache, &sources, args.force);
    summary.report();

    if !summary.failed.is_empty() {
        bail!(
            "{} failed to render",
            plural_count(summary.failed.len(), "diagram")
        );
    }
    Ok(())
}

/// Configured directories that exist; missing ones are only noted.
fn existing_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                debug!("render"; "skipping missing directory {}", dir.display());
            }
            exists
        })
        .cloned()
        .collect()
}

/// Render sources in order; one failure does not stop the rest.
pub fn render_all<T: Toolchain>(
    cache: &DiagramCache<T>,
    sources: &[PathBuf],
    force: bool,
) -> RenderSummary {
    let progress = ProgressLine::new("render", &[("render", sources.len())]);
    let mut summary = RenderSummary::default();

    for source in sources {
        if is_shutdown() {
            break;
        }
        match cache.render(source, force) {
            Ok(outcome) => {
                debug!("render"; "{}: {:?}", source.display(), outcome);
                summary.record(&outcome);
            }
            Err(e) => {
                log!("error"; "{:#}", anyhow::Error::from(e));
                summary.failed.push(source.clone());
            }
        }
        progress.inc("render");
    }

    progress.finish();
    summary
}

/// Freshness tallies for `--status`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub stale: usize,
    pub failed: Vec<PathBuf>,
}

fn report_status<T: Toolchain>(cache: &DiagramCache<T>, sources: &[PathBuf]) -> Result<()> {
    let summary = check_status(cache, sources);
    log!(
        "render";
        "{} of {} source{} out of date",
        summary.stale,
        sources.len(),
        plural_s(sources.len())
    );
    if !summary.failed.is_empty() {
        bail!(
            "{} could not be checked",
            plural_count(summary.failed.len(), "source")
        );
    }
    Ok(())
}

/// Check every source; an unreadable one is logged and the rest still run.
fn check_status<T: Toolchain>(cache: &DiagramCache<T>, sources: &[PathBuf]) -> StatusSummary {
    let mut summary = StatusSummary::default();
    for source in sources {
        match cache.status(source) {
            Ok(Freshness::Fresh(_)) => debug!("render"; "{} is up to date", display(source)),
            Ok(Freshness::Missing(_)) => {
                summary.stale += 1;
                log!("render"; "{} has never been rendered", display(source));
            }
            Ok(Freshness::Stale { current, stored }) => {
                summary.stale += 1;
                let was = stored.get(..12).unwrap_or(&stored);
                log!("render"; "{} changed ({} -> {})", display(source), was, current);
            }
            Err(e) => {
                log!("error"; "{:#}", anyhow::Error::from(e));
                summary.failed.push(source.clone());
            }
        }
    }
    summary
}

fn display(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{RenderJob, Step, StepFailure};
    use crate::freshness::DigestKind;
    use std::fs;
    use tempfile::TempDir;

    /// Succeeds for every source except those named `broken.tex`.
    struct Fake;

    impl Toolchain for Fake {
        fn run(&self, step: Step, job: &RenderJob) -> Result<(), StepFailure> {
            if job.source.ends_with("broken.tex") {
                return Err(StepFailure {
                    program: "pdflatex".into(),
                    code: Some(1),
                    detail: String::new(),
                });
            }
            if step == Step::Crop {
                fs::write(job.cropped_pdf(), "pdf").unwrap();
            }
            Ok(())
        }
    }

    #[test]
    fn test_render_all_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        let sources: Vec<_> = ["a.tex", "broken.tex", "c.tex"]
            .iter()
            .map(|n| {
                let p = dir.path().join(n);
                fs::write(&p, n).unwrap();
                p
            })
            .collect();
        let cache = DiagramCache::new(Fake, DigestKind::Sha1, true);

        let summary = render_all(&cache, &sources, false);
        assert_eq!(summary.rendered, 2);
        assert_eq!(summary.failed, vec![dir.path().join("broken.tex")]);

        let again = render_all(&cache, &sources, false);
        assert_eq!(again.cached, 2);
        assert_eq!(again.rendered, 0);
        assert_eq!(again.failed.len(), 1);
    }

    #[test]
    fn test_status_continues_past_unreadable_sources() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.tex");
        let fresh = dir.path().join("a.tex");
        let new = dir.path().join("b.tex");
        fs::write(&fresh, "a").unwrap();
        fs::write(&new, "b").unwrap();
        let cache = DiagramCache::new(Fake, DigestKind::Sha1, true);
        cache.ensure_rendered(&fresh).unwrap();

        let sources = vec![missing.clone(), fresh, new];
        let summary = check_status(&cache, &sources);
        assert_eq!(
            summary,
            StatusSummary {
                stale: 1,
                failed: vec![missing],
            }
        );

        let err = report_status(&cache, &sources).unwrap_err();
        assert_eq!(err.to_string(), "1 source could not be checked");
    }

    #[test]
    fn test_existing_dirs_skips_missing() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().to_path_buf(), dir.path().join("missing")];
        assert_eq!(existing_dirs(&dirs), vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_summary_record() {
        let mut summary = RenderSummary::default();
        summary.record(&RenderOutcome::Cached);
        summary.record(&RenderOutcome::Rendered);
        summary.record(&RenderOutcome::Degraded(vec!["crop failed".into(), "rename".into()]));
        assert_eq!((summary.rendered, summary.cached, summary.degraded), (1, 1, 1));
        assert_eq!(summary.warnings, 2);
    }
}
