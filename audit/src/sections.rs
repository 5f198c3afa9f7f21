use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    check::{match_patterns, match_substrings, read_source, Line, Section, SectionResult},
    error::AuditError,
    patterns::{
        AUTH_PATTERNS, IMAGE_PATTERNS, LARGE_IMAGE_BYTES, REQUIRED_ENV_VARS, REQUIRED_PACKAGES,
        SMALL_IMAGE_BYTES, STRUCTURE_PATTERNS,
    },
};

pub const INTEGRATION_TESTS_SUBDIR: &str = "tests/ClaudeBatchServer.IntegrationTests";

#[derive(Debug, Clone)]
pub struct AuditPaths {
    pub test_file: PathBuf,
    pub reference_file: PathBuf,
    pub test_image: PathBuf,
    pub csproj: PathBuf,
    pub env_file: PathBuf,
}

impl AuditPaths {
    /// Default layout of the batch server checkout rooted at `root`.
    pub fn from_root(root: &Path) -> Self {
        let tests_dir = root.join(INTEGRATION_TESTS_SUBDIR);
        AuditPaths {
            test_file: tests_dir.join("ImageAnalysisE2ETests.cs"),
            reference_file: tests_dir.join("ComplexE2ETests.cs"),
            test_image: tests_dir.join("test-image.png"),
            csproj: tests_dir.join("ClaudeBatchServer.IntegrationTests.csproj"),
            env_file: root.join(".env"),
        }
    }
}

pub fn validate_test_structure(paths: &AuditPaths) -> Result<SectionResult, AuditError> {
    const NAME: Section = Section::Structure;
    let test_content = match read_source(&paths.test_file, "Test file") {
        Ok(content) => content,
        Err(reason) => return Ok(SectionResult::failed(NAME, reason)),
    };
    if let Err(reason) = read_source(&paths.reference_file, "Reference test file") {
        return Ok(SectionResult::failed(NAME, reason));
    }

    let lines = match_patterns(&test_content, &STRUCTURE_PATTERNS, |p| {
        p.description.to_string()
    })?;
    Ok(SectionResult::from_lines(NAME, lines))
}

pub fn validate_image_logic(paths: &AuditPaths) -> Result<SectionResult, AuditError> {
    const NAME: Section = Section::ImageLogic;
    let test_content = match read_source(&paths.test_file, "Test file") {
        Ok(content) => content,
        Err(reason) => return Ok(SectionResult::failed(NAME, reason)),
    };

    let lines = match_patterns(&test_content, &IMAGE_PATTERNS, |p| p.description.to_string())?;
    Ok(SectionResult::from_lines(NAME, lines))
}

pub fn validate_test_image(paths: &AuditPaths) -> SectionResult {
    const NAME: Section = Section::TestImage;
    let image = &paths.test_image;
    let size = match fs::metadata(image) {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        _ => {
            return SectionResult::failed(
                NAME,
                format!("Test image does not exist: {}", image.display()),
            )
        }
    };

    let mut lines = vec![
        Line::Pass(format!("Test image exists: {}", image.display())),
        Line::Pass(format!("File size: {size} bytes")),
    ];
    if size < SMALL_IMAGE_BYTES {
        lines.push(Line::Warn(format!(
            "Warning: Image file seems small ({size} bytes)"
        )));
    }
    if size > LARGE_IMAGE_BYTES {
        lines.push(Line::Warn(format!(
            "Warning: Image file seems large ({size} bytes)"
        )));
    }
    SectionResult::from_lines(NAME, lines)
}

pub fn validate_authentication(paths: &AuditPaths) -> Result<SectionResult, AuditError> {
    const NAME: Section = Section::Authentication;
    let test_content = match read_source(&paths.test_file, "Test file") {
        Ok(content) => content,
        Err(reason) => return Ok(SectionResult::failed(NAME, reason)),
    };
    if let Err(reason) = read_source(&paths.reference_file, "Reference test file") {
        return Ok(SectionResult::failed(NAME, reason));
    }

    let lines = match_patterns(&test_content, &AUTH_PATTERNS, |p| {
        let prefix: String = p.regex.chars().take(50).collect();
        format!("Auth pattern missing: {prefix}...")
    })?;
    Ok(SectionResult::from_lines(NAME, lines))
}

pub fn validate_dependencies(paths: &AuditPaths) -> SectionResult {
    const NAME: Section = Section::Dependencies;
    match read_source(&paths.csproj, "Project file") {
        Ok(content) => {
            SectionResult::from_lines(NAME, match_substrings(&content, &REQUIRED_PACKAGES, "", ""))
        }
        Err(reason) => SectionResult::failed(NAME, reason),
    }
}

pub fn validate_env_file(paths: &AuditPaths) -> SectionResult {
    const NAME: Section = Section::Environment;
    match read_source(&paths.env_file, ".env file") {
        Ok(content) => SectionResult::from_lines(
            NAME,
            match_substrings(&content, &REQUIRED_ENV_VARS, " is configured", " is missing"),
        ),
        Err(reason) => SectionResult::failed(NAME, reason),
    }
}

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub sections: Vec<SectionResult>,
}

impl AuditReport {
    pub fn passed(&self) -> bool {
        self.sections.iter().all(|section| section.passed)
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    pub fn section(&self, section: Section) -> Option<&SectionResult> {
        self.sections.iter().find(|result| result.section == section)
    }
}

pub fn run_audit(paths: &AuditPaths) -> Result<AuditReport, AuditError> {
    info!("auditing {}", paths.test_file.display());
    let sections = vec![
        validate_test_structure(paths)?,
        validate_image_logic(paths)?,
        validate_test_image(paths),
        validate_authentication(paths)?,
        validate_dependencies(paths),
        validate_env_file(paths),
    ];
    Ok(AuditReport { sections })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_hangs_off_the_root() {
        let paths = AuditPaths::from_root(Path::new("/srv/batch"));
        assert_eq!(
            paths.test_file,
            PathBuf::from(
                "/srv/batch/tests/ClaudeBatchServer.IntegrationTests/ImageAnalysisE2ETests.cs"
            )
        );
        assert_eq!(paths.env_file, PathBuf::from("/srv/batch/.env"));
    }

    #[test]
    fn report_fails_if_any_section_fails() {
        let report = AuditReport {
            sections: vec![
                SectionResult::from_lines(Section::Dependencies, vec![Line::Pass("ok".into())]),
                SectionResult::failed(Section::Environment, "nope".into()),
            ],
        };
        assert!(!report.passed());
        assert_eq!(report.exit_code(), 1);
        assert!(report.section(Section::Dependencies).unwrap().passed);
    }
}
