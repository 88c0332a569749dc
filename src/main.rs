use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use geriscreen_lib::api::{start_summary_server, ApiContext};
use geriscreen_lib::config::AssessmentConfig;
use geriscreen_lib::intelligence::{ClinicalReference, QuestionBank};
use geriscreen_lib::interview::{ConsoleVoice, InterviewOutcome, Interviewer};
use geriscreen_lib::models::ResponseRecord;
use geriscreen_lib::pipeline::summary::{OpenAiSummaryClient, SummaryGenerator};
use geriscreen_lib::session::SessionHandle;

#[derive(Parser)]
#[command(name = "geriscreen", about = "Falls and cognitive history interview")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the summary proxy server
    Serve(ServeArgs),
    /// Interview a caregiver on the console
    Interview(InterviewArgs),
    /// Summarise `question<TAB>answer` lines from stdin
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Listen port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args)]
struct InterviewArgs {
    /// Name used when introducing the interview
    #[arg(long, default_value = "the patient")]
    patient: String,

    /// Symptom catalog JSON replacing the built-in one
    #[arg(long)]
    reference: Option<PathBuf>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Also try the remote summary tier
    #[arg(long)]
    remote: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Symptom catalog JSON replacing the built-in one
    #[arg(long)]
    reference: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    geriscreen_lib::init_tracing();

    let config = AssessmentConfig::from_env().context("invalid configuration")?;

    match cli.command {
        Commands::Serve(args) => serve(config, args).await,
        Commands::Interview(args) => interview(config, args).await,
        Commands::Analyze(args) => analyze(config, args).await,
    }
}

fn load_reference(path: Option<&PathBuf>) -> Result<Arc<ClinicalReference>> {
    let reference = match path {
        Some(path) => ClinicalReference::load(path)?,
        None => ClinicalReference::standard(),
    };
    Ok(Arc::new(reference))
}

async fn serve(config: AssessmentConfig, args: ServeArgs) -> Result<()> {
    let mut addr = config.listen_addr();
    if let Some(port) = args.port {
        addr.set_port(port);
    }

    let client = OpenAiSummaryClient::new(
        &config.openai_url,
        config.openai_api_key.clone(),
        config.summary_timeout.as_secs().max(1),
    )?;
    let mut server = start_summary_server(ApiContext::new(client), addr).await?;
    println!("Summary server listening on {}", server.info.server_addr);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    server.shutdown();
    server.stopped().await;
    Ok(())
}

async fn interview(config: AssessmentConfig, args: InterviewArgs) -> Result<()> {
    let questions = match &config.questions_file {
        Some(path) => QuestionBank::from_json_file(path)?,
        None => QuestionBank::standard(),
    };
    let reference = load_reference(args.reference.as_ref())?;
    let generator = SummaryGenerator::from_config(&config, reference)?;
    let session = SessionHandle::new(Arc::new(questions), Arc::new(generator));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let interviewer = Interviewer::new(Arc::new(ConsoleVoice::new()), session);
    match interviewer.run(&args.patient, cancel).await? {
        InterviewOutcome::Completed(summary) => {
            println!("\n{}", summary.body);
        }
        InterviewOutcome::Cancelled => {
            println!("\nInterview cancelled.");
        }
    }
    Ok(())
}

async fn analyze(config: AssessmentConfig, args: AnalyzeArgs) -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read stdin")?;
    let responses = parse_transcript(&input);

    let reference = load_reference(args.reference.as_ref())?;
    let generator = SummaryGenerator::from_config(&config, reference)?;
    let summary = if args.remote {
        generator.generate(&responses).await
    } else {
        generator.fallback(&responses)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.body);
    }
    Ok(())
}

/// One answer per line, `question<TAB>answer`. Lines without a tab are
/// answers to an unnamed question.
fn parse_transcript(input: &str) -> ResponseRecord {
    let mut record = ResponseRecord::new();
    for (n, line) in input.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        match line.split_once('\t') {
            Some((question, answer)) => record.insert(question.trim(), answer.trim()),
            None => record.insert(&format!("Question {}", n + 1), line.trim()),
        };
    }
    record
}
