use std::path::PathBuf;

use audit::{patterns::EXECUTION_SUMMARY, run_audit, AuditPaths, AuditReport, Line, SectionResult};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize, Debug)]
pub struct EnvVars {
    #[serde(alias = "BATCH_SERVER_ROOT")]
    #[serde(default = "batch_server_root_default")]
    pub batch_server_root: PathBuf,
    #[serde(alias = "AUDIT_TEST_FILE")]
    pub audit_test_file: Option<PathBuf>,
    #[serde(alias = "AUDIT_REFERENCE_FILE")]
    pub audit_reference_file: Option<PathBuf>,
    #[serde(alias = "AUDIT_TEST_IMAGE")]
    pub audit_test_image: Option<PathBuf>,
    #[serde(alias = "AUDIT_CSPROJ")]
    pub audit_csproj: Option<PathBuf>,
    #[serde(alias = "AUDIT_ENV_FILE")]
    pub audit_env_file: Option<PathBuf>,
}

fn batch_server_root_default() -> PathBuf {
    PathBuf::from(".")
}

impl EnvVars {
    fn into_paths(self) -> AuditPaths {
        let defaults = AuditPaths::from_root(&self.batch_server_root);
        AuditPaths {
            test_file: self.audit_test_file.unwrap_or(defaults.test_file),
            reference_file: self.audit_reference_file.unwrap_or(defaults.reference_file),
            test_image: self.audit_test_image.unwrap_or(defaults.test_image),
            csproj: self.audit_csproj.unwrap_or(defaults.csproj),
            env_file: self.audit_env_file.unwrap_or(defaults.env_file),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_section(section: &SectionResult) {
    println!("\n{}", section.heading());
    for line in &section.lines {
        match line {
            Line::Pass(text) => println!("   ✅ {text}"),
            Line::Fail(text) => println!("   ❌ {text}"),
            Line::Warn(text) => println!("   ⚠️ {text}"),
        }
    }
}

fn print_summary() {
    println!("\n📋 Test Execution Summary:");
    println!("   When this test runs, it should:");
    for (index, step) in EXECUTION_SUMMARY.iter().enumerate() {
        println!("   {}. ✅ {step}", index + 1);
    }
}

fn print_results(report: &AuditReport) {
    println!("\n📊 Validation Results:");
    println!("{}", "-".repeat(40));
    for section in &report.sections {
        let status = if section.passed { "✅ PASS" } else { "❌ FAIL" };
        println!("   {:<20} {status}", section.name());
    }
    println!("{}", "-".repeat(40));

    if report.passed() {
        println!("🎉 All validations passed!");
        println!("✅ ImageAnalysisE2ETests.cs is ready for execution");
        println!("✅ Test follows the same patterns as working E2E tests");
        println!("✅ Test should work when run with: dotnet test");
    } else {
        println!("❌ Some validations failed");
        println!("⚠️ Fix the issues above before running the test");
    }
    println!("\n🚀 To run the test: dotnet test --filter ImageAnalysisE2ETests");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();
    let paths = envy::from_env::<EnvVars>()?.into_paths();

    println!("🧪 ImageAnalysisE2ETests.cs - Validation Report");
    println!("{}", "=".repeat(60));

    let report = run_audit(&paths)?;
    for section in &report.sections {
        print_section(section);
    }
    print_summary();
    print_results(&report);

    std::process::exit(report.exit_code());
}
