use std::path::{Path, PathBuf};

use log::error;
use serde::Deserialize;
use testimage::{
    ensure_test_image,
    expectations::{EXPECTED_ANALYSIS, EXPECTED_KEYWORDS, E2E_CHECKLIST},
    inspect_image, test_image_path, validate_test_setup, ImageAnalysis,
};
use tracing_subscriber::EnvFilter;

#[derive(Deserialize, Debug)]
pub struct EnvVars {
    #[serde(alias = "INTEGRATION_TESTS_DIR")]
    #[serde(default = "integration_tests_dir_default")]
    pub integration_tests_dir: PathBuf,
    #[serde(alias = "TEST_IMAGE_PATH")]
    pub test_image_path: Option<PathBuf>,
}

fn integration_tests_dir_default() -> PathBuf {
    PathBuf::from("tests/ClaudeBatchServer.IntegrationTests")
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();
    let envs = envy::from_env::<EnvVars>()?;

    println!("🧪 Image Analysis E2E Test - Manual Validation");
    println!("{}", "=".repeat(60));

    println!("🔧 Validating test environment...");
    if let Err(err) = validate_test_setup(&envs.integration_tests_dir) {
        println!("❌ {err}");
        println!("❌ Test environment validation failed");
        std::process::exit(1);
    }
    println!(
        "✅ Test directory exists: {}",
        envs.integration_tests_dir.display()
    );

    let image_path = test_image_path(
        &envs.integration_tests_dir,
        envs.test_image_path.as_deref(),
    );
    let created = ensure_test_image(&image_path, |element| {
        println!("✅ Added {}", element.describe());
    })?;
    if created {
        println!("Created test image at: {}", image_path.display());
    } else {
        println!("📁 Test image already exists: {}", image_path.display());
    }

    if !analyze(&image_path) {
        println!("❌ Image analysis failed");
        std::process::exit(1);
    }

    print_expected_analysis();
    print_checklist();

    println!("\n🎯 Test Image Ready!");
    println!("   Path: {}", image_path.display());
    println!("   The E2E test should upload this image to the batch server");
    println!("   and verify the model correctly identifies the visual elements.");
    println!("\n✅ Manual validation complete - ready for E2E test execution!");
    Ok(())
}

fn print_analysis(analysis: &ImageAnalysis) {
    println!("✅ Image loaded successfully");
    println!("   Size: ({}, {})", analysis.width, analysis.height);
    println!("   Mode: {:?}", analysis.color_type);
    match analysis.format {
        Some(format) => println!("   Format: {format:?}"),
        None => println!("   Format: unknown"),
    }
    match analysis.unique_colors {
        Some(count) => println!("   Unique colors: {count}"),
        None => println!("   Unique colors: many"),
    }
    println!("   File size: {} bytes", analysis.file_size);
}

fn analyze(image_path: &Path) -> bool {
    println!("\n🔍 Analyzing test image: {}", image_path.display());

    let analysis = match inspect_image(image_path) {
        Ok(analysis) => analysis,
        Err(err) => {
            error!("could not inspect {}: {err}", image_path.display());
            println!("❌ Error analyzing image: {err}");
            return false;
        }
    };
    print_analysis(&analysis);

    if let Err(err) = analysis.verify() {
        println!("❌ {err}");
        return false;
    }
    println!("✅ Image analysis passed - ready for E2E testing");
    true
}

fn print_expected_analysis() {
    println!("\n🤖 Expected Analysis:");
    for line in EXPECTED_ANALYSIS {
        println!("   {line}");
    }
    println!("   Expected keywords: {}", EXPECTED_KEYWORDS.join(", "));
}

fn print_checklist() {
    println!("\n📋 E2E Test Validation Checklist:");
    for (index, item) in E2E_CHECKLIST.iter().enumerate() {
        println!("   {}. ✅ {item}", index + 1);
    }
}
