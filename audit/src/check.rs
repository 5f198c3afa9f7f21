use std::{fs, path::Path};

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::{error::AuditError, patterns::Pattern};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Pass(String),
    Fail(String),
    Warn(String),
}

impl Line {
    pub fn is_failure(&self) -> bool {
        matches!(self, Line::Fail(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Structure,
    ImageLogic,
    TestImage,
    Authentication,
    Dependencies,
    Environment,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Structure,
        Section::ImageLogic,
        Section::TestImage,
        Section::Authentication,
        Section::Dependencies,
        Section::Environment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Structure => "Test Structure",
            Section::ImageLogic => "Image Logic",
            Section::TestImage => "Test Image File",
            Section::Authentication => "Authentication",
            Section::Dependencies => "Dependencies",
            Section::Environment => "Environment",
        }
    }

    /// Banner printed before the section's lines.
    pub fn heading(self) -> &'static str {
        match self {
            Section::Structure => "🔍 Validating ImageAnalysisE2ETests.cs structure...",
            Section::ImageLogic => "🖼️ Validating image-specific test logic...",
            Section::TestImage => "📁 Validating test image file...",
            Section::Authentication => "🔐 Validating authentication pattern...",
            Section::Dependencies => "📦 Validating project dependencies...",
            Section::Environment => "🔧 Validating environment configuration...",
        }
    }
}

/// Outcome of one group of checks.
#[derive(Debug, Clone)]
pub struct SectionResult {
    pub section: Section,
    pub lines: Vec<Line>,
    pub passed: bool,
}

impl SectionResult {
    /// A section passes when none of its lines is a failure.
    pub fn from_lines(section: Section, lines: Vec<Line>) -> Self {
        let passed = !lines.iter().any(Line::is_failure);
        SectionResult {
            section,
            lines,
            passed,
        }
    }

    pub fn failed(section: Section, reason: String) -> Self {
        SectionResult {
            section,
            lines: vec![Line::Fail(reason)],
            passed: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.section.name()
    }

    pub fn heading(&self) -> &'static str {
        self.section.heading()
    }
}

pub fn compile(pattern: &'static str) -> Result<Regex, AuditError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| AuditError::Regex { pattern, source })
}

/// One line per pattern, each judged on its own.
pub fn match_patterns(
    content: &str,
    patterns: &[Pattern],
    describe_missing: impl Fn(&Pattern) -> String,
) -> Result<Vec<Line>, AuditError> {
    let mut lines = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let regex = compile(pattern.regex)?;
        if regex.is_match(content) {
            lines.push(Line::Pass(pattern.description.to_string()));
        } else {
            debug!("pattern not found: {}", pattern.regex);
            lines.push(Line::Fail(describe_missing(pattern)));
        }
    }
    Ok(lines)
}

pub fn match_substrings(
    content: &str,
    needles: &[&str],
    suffix_found: &str,
    suffix_missing: &str,
) -> Vec<Line> {
    needles
        .iter()
        .map(|needle| {
            if content.contains(needle) {
                Line::Pass(format!("{needle}{suffix_found}"))
            } else {
                Line::Fail(format!("{needle}{suffix_missing}"))
            }
        })
        .collect()
}

/// Reads a source file, turning every way it can be unusable (absent,
/// unreadable, empty) into the failure line to report.
pub fn read_source(path: &Path, label: &str) -> Result<String, String> {
    if !path.exists() {
        return Err(format!("{label} does not exist: {}", path.display()));
    }
    match fs::read_to_string(path) {
        Ok(content) if content.is_empty() => Err(format!("{label} is empty: {}", path.display())),
        Ok(content) => Ok(content),
        Err(err) => {
            warn!("could not read {}: {err}", path.display());
            Err(format!("Error reading {}: {err}", path.display()))
        }
    }
}
