//! External programs that turn a TikZ source into a PNG.

use std::fmt;

use super::RenderJob;
use crate::config::DiagramConfig;
use crate::utils::exec::{Cmd, EMPTY_FILTER, FilterRule, format_error};

/// One external stage of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// source -> `<stem>.pdf`
    Compile,
    /// `<stem>.pdf` -> `<stem>-crop.pdf`
    Crop,
    /// `<stem>.pdf` -> `<stem>.png`
    Rasterize,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compile => "compile",
            Self::Crop => "crop",
            Self::Rasterize => "rasterize",
        })
    }
}

/// Why a step did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub program: String,
    /// Exit code; `None` when the process never started or was killed.
    pub code: Option<i32>,
    /// Captured output or the launch error.
    pub detail: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "`{}` exited with code {code}", self.program)?,
            None => write!(f, "`{}` did not complete", self.program)?,
        }
        if !self.detail.is_empty() {
            write!(f, "\n{}", self.detail)?;
        }
        Ok(())
    }
}

/// Runs render steps. Implemented by [`ExternalToolchain`] and by test doubles.
pub trait Toolchain {
    fn run(&self, step: Step, job: &RenderJob) -> Result<(), StepFailure>;
}

/// pdfTeX warnings that are noise for standalone TikZ pictures.
static LATEX_FILTER: FilterRule = FilterRule::new(&["entering extended mode", "restricted \\write18"]);

/// Shells out to the programs configured in `[diagram]`.
#[derive(Debug, Clone)]
pub struct ExternalToolchain {
    latex: Vec<String>,
    crop: Vec<String>,
    convert: Vec<String>,
}

impl ExternalToolchain {
    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            latex: config.latex.clone(),
            crop: config.crop.clone(),
            convert: config.convert.clone(),
        }
    }

    /// Build the command line for a step.
    pub fn command(&self, step: Step, job: &RenderJob) -> Cmd {
        let cmd = match step {
            Step::Compile => Cmd::from_slice(&self.latex)
                .arg(format!("-output-directory={}", job.dir.display()))
                .arg(&job.source)
                .filter(&LATEX_FILTER),
            Step::Crop => Cmd::from_slice(&self.crop).arg(job.pdf()).filter(&EMPTY_FILTER),
            Step::Rasterize => Cmd::from_slice(&self.convert)
                .arg(job.pdf())
                .arg(job.png())
                .filter(&EMPTY_FILTER),
        };
        cmd.cwd(&job.dir)
    }
}

impl Toolchain for ExternalToolchain {
    fn run(&self, step: Step, job: &RenderJob) -> Result<(), StepFailure> {
        let cmd = self.command(step, job);
        let program = cmd.program_name();
        let filter = cmd.output_filter();

        let output = cmd.output().map_err(|e| StepFailure {
            program: program.clone(),
            code: None,
            detail: format!("{e:#}"),
        })?;

        if output.status.success() {
            filter.log(&program, String::from_utf8_lossy(&output.stderr).trim());
            Ok(())
        } else {
            Err(StepFailure {
                program: program.clone(),
                code: output.status.code(),
                detail: format_error(&program, &output, filter),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn toolchain() -> ExternalToolchain {
        ExternalToolchain::from_config(&DiagramConfig {
            crop: vec!["perl".into(), "/usr/bin/pdfcrop".into()],
            ..Default::default()
        })
    }

    #[test]
    fn test_compile_command_line() {
        let job = RenderJob::new(Path::new("/docs/pics/fig.tex"));
        let cmd = toolchain().command(Step::Compile, &job);
        assert_eq!(
            cmd.display(),
            "pdflatex -halt-on-error -output-directory=/docs/pics /docs/pics/fig.tex"
        );
    }

    #[test]
    fn test_crop_and_rasterize_command_lines() {
        let job = RenderJob::new(Path::new("/docs/pics/fig.tex"));
        let tc = toolchain();
        assert_eq!(
            tc.command(Step::Crop, &job).display(),
            "perl /usr/bin/pdfcrop /docs/pics/fig.pdf"
        );
        assert_eq!(
            tc.command(Step::Rasterize, &job).display(),
            "convert /docs/pics/fig.pdf /docs/pics/fig.png"
        );
    }

    #[test]
    fn test_missing_program_is_step_failure() {
        let tc = ExternalToolchain {
            latex: vec!["no-such-latex-5512".into()],
            crop: vec![],
            convert: vec![],
        };
        let dir = tempfile::TempDir::new().unwrap();
        let job = RenderJob::new(&dir.path().join("fig.tex"));

        let failure = tc.run(Step::Compile, &job).unwrap_err();
        assert_eq!(failure.program, "no-such-latex-5512");
        assert_eq!(failure.code, None);
        assert!(failure.to_string().contains("did not complete"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_step_failure_with_code() {
        let tc = ExternalToolchain {
            latex: vec![],
            crop: vec!["sh".into(), "-c".into(), "echo 'cannot crop' >&2; exit 2".into()],
            convert: vec![],
        };
        let dir = tempfile::TempDir::new().unwrap();
        let job = RenderJob::new(&dir.path().join("fig.tex"));

        let failure = tc.run(Step::Crop, &job).unwrap_err();
        assert_eq!(failure.code, Some(2));
        assert!(failure.detail.contains("cannot crop"));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_source_reaches_the_tool() {
        // relative to the test's working directory
        let dir = tempfile::TempDir::new_in(".").unwrap();
        let pics = dir.path().join("pics");
        std::fs::create_dir(&pics).unwrap();
        std::fs::write(pics.join("fig.tex"), "tikz").unwrap();
        let source = pics.join("fig.tex");
        assert!(source.is_relative());

        // $1 is -output-directory, $2 the source
        let tc = ExternalToolchain {
            latex: vec![
                "sh".into(),
                "-c".into(),
                r#"test -f "$2" && test -d "${1#-output-directory=}""#.into(),
                "sh".into(),
            ],
            crop: vec!["sh".into(), "-c".into(), r#"test -f "$1""#.into(), "sh".into()],
            convert: vec![],
        };
        let job = RenderJob::new(&source);

        assert_eq!(tc.run(Step::Compile, &job), Ok(()));
        std::fs::write(job.pdf(), "pdf").unwrap();
        assert_eq!(tc.run(Step::Crop, &job), Ok(()));
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::Compile.to_string(), "compile");
        assert_eq!(Step::Rasterize.to_string(), "rasterize");
    }
}
