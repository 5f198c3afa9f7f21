use std::{path::PathBuf, time::Duration};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use client::{
    run_auth_probe, workspace, BatchClient, ClientError, Exchange, JobStatus, LoginRequest,
    PollSettings, ProbeOutcome, ProbeReport,
};
use log::error;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize, Debug)]
pub struct EnvVars {
    #[serde(alias = "BATCH_SERVER_URL")]
    #[serde(default = "batch_server_url_default")]
    pub batch_server_url: String,
    #[serde(alias = "TEST_USERNAME")]
    pub test_username: String,
    #[serde(alias = "TEST_PASSWORD")]
    pub test_password: String,
    #[serde(alias = "JOB_POLL_INTERVAL_MS")]
    #[serde(default = "job_poll_interval_ms_default")]
    pub job_poll_interval_ms: u64,
    #[serde(alias = "JOB_MAX_POLLS")]
    #[serde(default = "job_max_polls_default")]
    pub job_max_polls: u32,
    #[serde(alias = "JOB_WORKSPACE_ROOT")]
    #[serde(default = "job_workspace_root_default")]
    pub job_workspace_root: PathBuf,
}

fn batch_server_url_default() -> String {
    "http://localhost:5000".to_string()
}

fn job_poll_interval_ms_default() -> u64 {
    2000
}

fn job_max_polls_default() -> u32 {
    150
}

fn job_workspace_root_default() -> PathBuf {
    PathBuf::from(workspace::DEFAULT_WORKSPACE_ROOT)
}

fn cli() -> Command {
    let job_arg = Arg::new("job")
        .long("job")
        .required(true)
        .help("Job identifier on the batch server");

    Command::new("probe")
        .version("0.1.0")
        .about("Smoke checks against a running batch server")
        .subcommand(Command::new("auth").about("Log in and make one authenticated call (default)"))
        .subcommand(
            Command::new("upload")
                .about("Upload a PNG image to a job")
                .arg(job_arg.clone())
                .arg(
                    Arg::new("image")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path of the PNG to upload"),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Show a job's status")
                .arg(job_arg)
                .arg(
                    Arg::new("wait")
                        .long("wait")
                        .action(ArgAction::SetTrue)
                        .help("Poll until the job completes or fails"),
                ),
        )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();
    let matches = cli().get_matches();
    let envs = envy::from_env::<EnvVars>()?;

    let passed = match matches.subcommand() {
        Some(("upload", args)) => upload(&envs, args).await,
        Some(("status", args)) => status(&envs, args).await,
        _ => auth(&envs).await,
    };

    std::process::exit(if passed { 0 } else { 1 });
}

async fn auth(envs: &EnvVars) -> bool {
    let credentials = LoginRequest {
        username: envs.test_username.clone(),
        password: envs.test_password.clone(),
    };

    match run_auth_probe(&envs.batch_server_url, &credentials).await {
        Ok(report) => {
            print_report(&report);
            report.outcome.passed()
        }
        Err(err) => {
            println!("Error: {err}");
            false
        }
    }
}

fn print_exchange(label: &str, exchange: &Exchange) {
    println!("{label} Status: {}", exchange.status.as_u16());
    println!("{label} Response: {}", exchange.body);
}

fn print_report(report: &ProbeReport) {
    println!("1. Testing login...");
    print_exchange("Login", &report.login);

    match report.outcome {
        ProbeOutcome::LoginFailed => {
            println!("LOGIN FAILED!");
            return;
        }
        ProbeOutcome::NoToken => {
            println!("NO TOKEN RECEIVED!");
            return;
        }
        ProbeOutcome::Unreachable | ProbeOutcome::Rejected | ProbeOutcome::Authenticated => {}
    }

    if let Some(preview) = &report.token_preview {
        println!("Token received: {preview}...");
    }
    println!("2. Testing authenticated request...");
    if let Some(repositories) = &report.repositories {
        print_exchange("Repositories", repositories);
    }
    if let Some(err) = &report.repositories_error {
        println!("Error: {err}");
    }

    if report.outcome.passed() {
        println!("✅ Authentication working!");
    } else {
        println!("❌ Authentication failed!");
    }
}

async fn logged_in_client(envs: &EnvVars) -> Result<BatchClient, ClientError> {
    let mut client = BatchClient::new(&envs.batch_server_url)?;
    client.login(&envs.test_username, &envs.test_password).await?;
    Ok(client)
}

async fn upload(envs: &EnvVars, args: &ArgMatches) -> bool {
    let (Some(job_id), Some(image)) = (
        args.get_one::<String>("job"),
        args.get_one::<PathBuf>("image"),
    ) else {
        return false;
    };

    let result = async {
        let client = logged_in_client(envs).await?;
        client.upload_image(job_id, image).await
    }
    .await;

    match result {
        Ok(uploaded) => {
            println!("✅ Uploaded {} to job {job_id}", image.display());
            match uploaded.path {
                Some(path) => println!("   Stored at: {path}"),
                None => {
                    let file_name = uploaded.file_name.unwrap_or_else(|| {
                        image
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default()
                    });
                    match workspace::job_image_path(&envs.job_workspace_root, job_id, &file_name)
                    {
                        Ok(expected) => println!("   Expected at: {}", expected.display()),
                        Err(err) => error!("no workspace path for job {job_id}: {err}"),
                    }
                }
            }
            true
        }
        Err(err) => {
            error!("upload to job {job_id} failed: {err}");
            println!("❌ Upload failed: {err}");
            false
        }
    }
}

async fn status(envs: &EnvVars, args: &ArgMatches) -> bool {
    let Some(job_id) = args.get_one::<String>("job") else {
        return false;
    };
    let wait = args.get_flag("wait");
    let settings = PollSettings {
        interval: Duration::from_millis(envs.job_poll_interval_ms),
        max_polls: envs.job_max_polls,
    };

    let result = async {
        let client = logged_in_client(envs).await?;
        if wait {
            client.wait_for_job(job_id, settings).await
        } else {
            client.job_status(job_id).await
        }
    }
    .await;

    match result {
        Ok(job) => {
            println!("Job {job_id}: {}", job.status);
            if let Some(output) = job.output {
                println!("Output: {output}");
            }
            job_succeeded(&job.status)
        }
        Err(ClientError::JobFailed { output, .. }) => {
            println!("❌ Job {job_id} failed");
            if let Some(output) = output {
                println!("Output: {output}");
            }
            false
        }
        Err(err) => {
            println!("❌ {err}");
            false
        }
    }
}

/// Only a failed job fails the command; a job still in progress is fine
/// when not waiting.
fn job_succeeded(status: &JobStatus) -> bool {
    !matches!(status, JobStatus::Failed)
}
