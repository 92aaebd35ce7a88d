use std::fmt;
use std::path::PathBuf;

/// Processing stage a check belongs to, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Project file and pipeline settings
    Configuration,
    /// Both baseline recordings and their fits
    Baselines,
    /// Measurement file and demultiplexing
    Measurement,
    /// Annotations and the position correction profile
    Correction,
    /// Result files
    Output,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Stage; 5] = [
        Stage::Configuration,
        Stage::Baselines,
        Stage::Measurement,
        Stage::Correction,
        Stage::Output,
    ];

    /// Section title used when rendering
    pub fn title(self) -> &'static str {
        match self {
            Stage::Configuration => "Configuration",
            Stage::Baselines => "Baselines",
            Stage::Measurement => "Measurement",
            Stage::Correction => "Position correction",
            Stage::Output => "Output",
        }
    }
}

/// Condition that does not prevent a run but changes its result
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// The measurement parses but yields no samples
    EmptyMeasurement,
    /// Four-row sweep blocks; frequencies are offset + frequency rows
    LegacyLayout,
    /// The correction end index was clipped to the measurement
    ClippedEnd {
        /// Index implied by the end frame
        requested: usize,
        /// Last sample index actually used
        used: usize,
    },
    /// A run would replace these files
    Overwrite(Vec<PathBuf>),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::EmptyMeasurement => write!(f, "measurement contains no samples"),
            Finding::LegacyLayout => write!(
                f,
                "legacy 4-row sweep layout; frequencies are reconstructed from offset + frequency rows"
            ),
            Finding::ClippedEnd { requested, used } => write!(
                f,
                "end index {} lies past the measurement and was clipped to {}",
                requested, used
            ),
            Finding::Overwrite(paths) => {
                write!(f, "will be overwritten:")?;
                for path in paths {
                    write!(f, " {}", path.display())?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of a check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    /// Passed
    Passed,
    /// Passed with a finding worth reporting
    Warned(Finding),
    /// Failed with the error message
    Failed(String),
    /// Not run because an earlier stage failed
    Skipped(String),
}

impl CheckStatus {
    fn tag(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "ok",
            CheckStatus::Warned(_) => "warn",
            CheckStatus::Failed(_) => "FAIL",
            CheckStatus::Skipped(_) => "skip",
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            CheckStatus::Passed => None,
            CheckStatus::Warned(finding) => Some(finding.to_string()),
            CheckStatus::Failed(msg) | CheckStatus::Skipped(msg) => Some(msg.clone()),
        }
    }
}

/// One check within a stage
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationCheck {
    /// Stage the check belongs to
    pub stage: Stage,
    /// What was checked, with any summary values
    pub subject: String,
    /// Outcome
    pub status: CheckStatus,
}

/// Check counts by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Passed checks
    pub passed: usize,
    /// Checks with a finding
    pub warned: usize,
    /// Failed checks
    pub failed: usize,
    /// Checks not run
    pub skipped: usize,
}

/// Overall result of a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every check passed
    Passed,
    /// Nothing failed but at least one check has a finding
    PassedWithWarnings,
    /// At least one check failed
    Failed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Passed => "PASSED",
            Verdict::PassedWithWarnings => "PASSED with warnings",
            Verdict::Failed => "FAILED",
        })
    }
}

/// Checks of one project, grouped by [`Stage`]
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Project name
    pub project: String,
    checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    /// Empty report for a project
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            checks: Vec::new(),
        }
    }

    /// Record a check
    pub fn record(&mut self, stage: Stage, subject: impl Into<String>, status: CheckStatus) {
        self.checks.push(ValidationCheck {
            stage,
            subject: subject.into(),
            status,
        });
    }

    /// Mark every stage after `failed` that has no check yet as skipped.
    pub fn skip_after(&mut self, failed: Stage, reason: &str) {
        for stage in Stage::ALL.into_iter().filter(|s| *s > failed) {
            if self.stage(stage).next().is_none() {
                self.record(stage, stage.title(), CheckStatus::Skipped(reason.to_string()));
            }
        }
    }

    /// All checks in execution order
    pub fn checks(&self) -> &[ValidationCheck] {
        &self.checks
    }

    /// Checks of one stage
    pub fn stage(&self, stage: Stage) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(move |c| c.stage == stage)
    }

    /// Every finding reported by a warned check
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.checks.iter().filter_map(|c| match &c.status {
            CheckStatus::Warned(finding) => Some(finding),
            _ => None,
        })
    }

    /// Check counts by outcome
    pub fn tally(&self) -> Tally {
        self.checks.iter().fold(Tally::default(), |mut t, c| {
            match c.status {
                CheckStatus::Passed => t.passed += 1,
                CheckStatus::Warned(_) => t.warned += 1,
                CheckStatus::Failed(_) => t.failed += 1,
                CheckStatus::Skipped(_) => t.skipped += 1,
            }
            t
        })
    }

    /// Overall result
    pub fn verdict(&self) -> Verdict {
        let tally = self.tally();
        if tally.failed > 0 {
            Verdict::Failed
        } else if tally.warned > 0 {
            Verdict::PassedWithWarnings
        } else {
            Verdict::Passed
        }
    }

    /// True if any check failed
    pub fn has_failures(&self) -> bool {
        self.verdict() == Verdict::Failed
    }

    /// Render with terminal colors when `colorized_output` is enabled,
    /// otherwise identical to the `Display` output.
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::style;

            let mut out = String::new();
            self.render(&mut out, |tone, text| match tone {
                Tone::Heading => style(text).bold().cyan().to_string(),
                Tone::Good => style(text).green().to_string(),
                Tone::Warn => style(text).yellow().to_string(),
                Tone::Bad => style(text).red().bold().to_string(),
                Tone::Muted => style(text).dim().to_string(),
            })
            .map_or_else(|_| self.to_string(), |_| out)
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }

    fn render<W: fmt::Write>(&self, out: &mut W, paint: impl Fn(Tone, &str) -> String) -> fmt::Result {
        writeln!(out, "{}", paint(Tone::Heading, &format!("Validation of '{}'", self.project)))?;
        for stage in Stage::ALL {
            let mut checks = self.stage(stage).peekable();
            if checks.peek().is_none() {
                continue;
            }
            writeln!(out)?;
            writeln!(out, "{}", paint(Tone::Heading, stage.title()))?;
            for check in checks {
                let tone = Tone::of(&check.status);
                let tag = format!("{:>4}", check.status.tag());
                match check.status.detail() {
                    Some(detail) => writeln!(
                        out,
                        "  {} {}: {}",
                        paint(tone, &tag),
                        check.subject,
                        paint(tone, &detail)
                    )?,
                    None => writeln!(out, "  {} {}", paint(tone, &tag), check.subject)?,
                }
            }
        }

        let tally = self.tally();
        let verdict = self.verdict();
        let tone = match verdict {
            Verdict::Passed => Tone::Good,
            Verdict::PassedWithWarnings => Tone::Warn,
            Verdict::Failed => Tone::Bad,
        };
        writeln!(out)?;
        write!(
            out,
            "Validation {} ({} passed, {} warnings, {} failed, {} skipped)",
            paint(tone, &verdict.to_string()),
            tally.passed,
            tally.warned,
            tally.failed,
            tally.skipped
        )
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Heading,
    Good,
    Warn,
    Bad,
    Muted,
}

impl Tone {
    fn of(status: &CheckStatus) -> Self {
        match status {
            CheckStatus::Passed => Tone::Good,
            CheckStatus::Warned(_) => Tone::Warn,
            CheckStatus::Failed(_) => Tone::Bad,
            CheckStatus::Skipped(_) => Tone::Muted,
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, |_, text| text.to_string())
    }
}
