//! TikZ diagram build cache.
//!
//! A source is rendered to `<stem>.png` by three external steps
//! (compile, crop, rasterize). A hidden marker beside the source stores the
//! digest of the bytes that produced the current image, so unchanged sources
//! are skipped without spawning anything.
//!
//! ```text
//! fig.tex ──compile──▶ fig.pdf ──crop──▶ fig-crop.pdf ──rename──▶ fig.pdf
//!                                                                   │
//!                       .fig.tex ◀──digest── fig.png ◀──rasterize───┘
//! ```

mod error;
mod job;
mod scan;
mod toolchain;

pub use error::RenderError;
pub use job::RenderJob;
pub use scan::collect_sources;
pub use toolchain::{ExternalToolchain, Step, StepFailure, Toolchain};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::DiagramConfig;
use crate::freshness::{self, DigestKind, Freshness};
use crate::{debug, log};

/// A filesystem step and the path it failed on.
type FsResult = Result<(), (PathBuf, io::Error)>;

/// What `render` did for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Marker matched, nothing ran.
    Cached,
    /// All steps succeeded and the marker was updated.
    Rendered,
    /// Non-strict mode only: some steps failed, the marker was written anyway.
    Degraded(Vec<String>),
}

/// Content-hash gated renderer.
pub struct DiagramCache<T: Toolchain> {
    toolchain: T,
    digest: DigestKind,
    strict: bool,
}

impl DiagramCache<ExternalToolchain> {
    pub fn from_config(config: &DiagramConfig) -> Self {
        Self::new(
            ExternalToolchain::from_config(config),
            config.digest,
            config.strict,
        )
    }
}

impl<T: Toolchain> DiagramCache<T> {
    pub fn new(toolchain: T, digest: DigestKind, strict: bool) -> Self {
        Self {
            toolchain,
            digest,
            strict,
        }
    }

    /// Render `source` unless its marker says the image is current.
    pub fn ensure_rendered(&self, source: &Path) -> Result<RenderOutcome, RenderError> {
        self.render(source, false)
    }

    /// Compare `source` against its marker without rendering.
    pub fn status(&self, source: &Path) -> Result<Freshness, RenderError> {
        freshness::check(source, self.digest).map_err(|e| RenderError::source_path(source, e))
    }

    /// Render `source`; with `force` the marker is ignored.
    pub fn render(&self, source: &Path, force: bool) -> Result<RenderOutcome, RenderError> {
        let state = self.status(source)?;
        if state.is_fresh() && !force {
            return Ok(RenderOutcome::Cached);
        }
        debug!("render"; "{} -> {}", source.display(), state.digest());
        let digest = state.into_digest();
        let job = RenderJob::new(source);

        let mut warnings = Vec::new();

        self.step(Step::Compile, &job, &mut warnings)?;
        self.step(Step::Crop, &job, &mut warnings)?;
        self.settle(rename(&job.cropped_pdf(), &job.pdf()), &job, &mut warnings)?;
        self.step(Step::Rasterize, &job, &mut warnings)?;

        for path in job.transient() {
            self.settle(remove_if_exists(&path), &job, &mut warnings)?;
        }

        let marker = job.marker();
        freshness::write_marker(&marker, &digest)
            .map_err(|e| RenderError::filesystem(&marker, e))?;

        if warnings.is_empty() {
            Ok(RenderOutcome::Rendered)
        } else {
            Ok(RenderOutcome::Degraded(warnings))
        }
    }

    /// Run one step; strict mode turns a failure into an error.
    fn step(&self, step: Step, job: &RenderJob, warnings: &mut Vec<String>) -> Result<(), RenderError> {
        match self.toolchain.run(step, job) {
            Ok(()) => Ok(()),
            Err(failure) if self.strict => Err(RenderError::Step {
                step,
                path: job.source.clone(),
                log: job.log_file().display().to_string(),
                failure,
            }),
            Err(failure) => {
                let msg = format!("{step} failed for {}: {failure}", job.source.display());
                log!("warning"; "{}", msg);
                warnings.push(msg);
                Ok(())
            }
        }
    }

    /// Same policy as `step`, for filesystem moves between steps.
    fn settle(
        &self,
        result: FsResult,
        job: &RenderJob,
        warnings: &mut Vec<String>,
    ) -> Result<(), RenderError> {
        match result {
            Ok(()) => Ok(()),
            Err((path, e)) if self.strict => Err(RenderError::filesystem(path, e)),
            Err((path, e)) => {
                let msg = format!("{}: cannot update {}: {e}", job.source.display(), path.display());
                log!("warning"; "{}", msg);
                warnings.push(msg);
                Ok(())
            }
        }
    }
}

fn rename(from: &Path, to: &Path) -> FsResult {
    fs::rename(from, to).map_err(|e| (from.to_path_buf(), e))
}

fn remove_if_exists(path: &Path) -> FsResult {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err((path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use tempfile::TempDir;

    /// Writes the files each real tool would, and counts calls.
    #[derive(Default)]
    struct FakeToolchain {
        calls: RefCell<Vec<Step>>,
        fail: Cell<Option<Step>>,
    }

    impl FakeToolchain {
        fn failing(step: Step) -> Self {
            let tc = Self::default();
            tc.fail.set(Some(step));
            tc
        }

        fn compiles(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|s| **s == Step::Compile)
                .count()
        }
    }

    impl Toolchain for FakeToolchain {
        fn run(&self, step: Step, job: &RenderJob) -> Result<(), StepFailure> {
            self.calls.borrow_mut().push(step);
            if self.fail.get() == Some(step) {
                return Err(StepFailure {
                    program: step.to_string(),
                    code: Some(1),
                    detail: "boom".into(),
                });
            }
            let write = |p: PathBuf, s: &str| fs::write(p, s).unwrap();
            match step {
                Step::Compile => {
                    write(job.pdf(), "pdf");
                    let [aux, log] = job.transient();
                    write(aux, "aux");
                    write(log, "log");
                }
                Step::Crop => write(job.cropped_pdf(), "cropped"),
                Step::Rasterize => write(job.png(), "png"),
            }
            Ok(())
        }
    }

    fn source(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("fig.tex");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unchanged_source_renders_once() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        let cache = DiagramCache::new(FakeToolchain::default(), DigestKind::Sha1, true);

        assert_eq!(cache.ensure_rendered(&src).unwrap(), RenderOutcome::Rendered);
        assert_eq!(cache.ensure_rendered(&src).unwrap(), RenderOutcome::Cached);
        assert_eq!(cache.toolchain.compiles(), 1);
        assert_eq!(
            *cache.toolchain.calls.borrow(),
            [Step::Compile, Step::Crop, Step::Rasterize]
        );
    }

    #[test]
    fn test_marker_holds_sha1_of_source() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        let cache = DiagramCache::new(FakeToolchain::default(), DigestKind::Sha1, true);
        cache.ensure_rendered(&src).unwrap();

        let marker = fs::read_to_string(dir.path().join(".fig.tex")).unwrap();
        assert_eq!(marker, DigestKind::Sha1.digest_bytes(b"B1").as_hex());
        assert_eq!(marker.len(), 40);
    }

    #[test]
    fn test_changed_source_rerenders_and_overwrites_marker() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        let cache = DiagramCache::new(FakeToolchain::default(), DigestKind::Sha1, true);
        cache.ensure_rendered(&src).unwrap();

        fs::write(&src, "B2").unwrap();
        assert_eq!(cache.ensure_rendered(&src).unwrap(), RenderOutcome::Rendered);
        assert_eq!(cache.toolchain.compiles(), 2);

        let marker = fs::read_to_string(dir.path().join(".fig.tex")).unwrap();
        assert_eq!(marker, DigestKind::Sha1.digest_bytes(b"B2").as_hex());
    }

    #[test]
    fn test_artifacts_after_render() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        let cache = DiagramCache::new(FakeToolchain::default(), DigestKind::Sha1, true);
        cache.ensure_rendered(&src).unwrap();

        let job = RenderJob::new(&src);
        assert_eq!(fs::read_to_string(job.pdf()).unwrap(), "cropped");
        assert!(!job.cropped_pdf().exists());
        assert!(job.png().exists());
        for path in job.transient() {
            assert!(!path.exists(), "{} should be removed", path.display());
        }
    }

    #[test]
    fn test_strict_failure_leaves_no_marker_and_retries() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        let cache = DiagramCache::new(FakeToolchain::failing(Step::Crop), DigestKind::Sha1, true);

        let err = cache.ensure_rendered(&src).unwrap_err();
        assert!(matches!(err, RenderError::Step { step: Step::Crop, .. }));
        assert!(!dir.path().join(".fig.tex").exists());
        // the log stays for inspection
        assert!(dir.path().join("fig.log").exists());

        cache.toolchain.fail.set(None);
        assert_eq!(cache.ensure_rendered(&src).unwrap(), RenderOutcome::Rendered);
        assert_eq!(cache.toolchain.compiles(), 2);
    }

    #[test]
    fn test_lenient_failure_still_writes_marker() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        let cache = DiagramCache::new(FakeToolchain::failing(Step::Crop), DigestKind::Sha1, false);

        let outcome = cache.ensure_rendered(&src).unwrap();
        let RenderOutcome::Degraded(warnings) = outcome else {
            panic!("expected degraded outcome, got {outcome:?}");
        };
        // crop failed, so the rename that follows it fails too
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("crop failed"));
        assert!(dir.path().join(".fig.tex").exists());
        assert_eq!(
            *cache.toolchain.calls.borrow(),
            [Step::Compile, Step::Crop, Step::Rasterize]
        );

        assert_eq!(cache.ensure_rendered(&src).unwrap(), RenderOutcome::Cached);
    }

    #[test]
    fn test_force_ignores_marker() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        let cache = DiagramCache::new(FakeToolchain::default(), DigestKind::Sha1, true);
        cache.ensure_rendered(&src).unwrap();

        assert_eq!(cache.render(&src, true).unwrap(), RenderOutcome::Rendered);
        assert_eq!(cache.toolchain.compiles(), 2);
    }

    #[test]
    fn test_missing_source_is_error_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let cache = DiagramCache::new(FakeToolchain::default(), DigestKind::Sha1, true);

        let err = cache.ensure_rendered(&dir.path().join("nope.tex")).unwrap_err();
        assert!(matches!(err, RenderError::Source { .. }));
        assert!(cache.toolchain.calls.borrow().is_empty());
    }

    #[test]
    fn test_marker_from_other_digest_kind_is_stale() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir, "B1");
        DiagramCache::new(FakeToolchain::default(), DigestKind::Sha1, true)
            .ensure_rendered(&src)
            .unwrap();

        let cache = DiagramCache::new(FakeToolchain::default(), DigestKind::Blake3, true);
        assert!(!cache.status(&src).unwrap().is_fresh());
        assert_eq!(cache.ensure_rendered(&src).unwrap(), RenderOutcome::Rendered);
    }
}
