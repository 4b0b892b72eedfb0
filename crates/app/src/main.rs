//! Terminal host for a timed exam.
//!
//! Reads an exam catalog (a JSON array of exams), runs one attempt on a real
//! countdown, and prints the scored report as JSON when the attempt ends.

mod input;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use exam_core::format_countdown;
use exam_core::model::{
    AnswerPolicy, Exam, ExamDraft, ExamId, SessionSettings, SessionStatus, SubmitTrigger,
};
use services::{
    Clock, ExamSession, InMemoryExamSource, RunnerConfig, SessionCommand, SessionError,
    SessionHandle, spawn_session,
};

use input::{HELP, Input, parse_line};
use render::{Report, question_view};

/// Seconds left at which the host prints a one-off warning.
const LAST_MINUTE: u32 = 60;

#[derive(Parser)]
#[command(name = "exam", version, about = "Take a timed multiple-choice exam")]
struct Cli {
    /// Path to the exam catalog JSON
    #[arg(long, env = "EXAM_CATALOG")]
    catalog: PathBuf,

    /// Exam to take
    #[arg(long, env = "EXAM_ID")]
    exam_id: Option<ExamId>,

    /// List the catalog and exit
    #[arg(long)]
    list: bool,

    /// Store option choices without checking them against the question
    #[arg(long)]
    accept_any_option: bool,

    /// Milliseconds per countdown second
    #[arg(long, default_value_t = 1000, hide = true)]
    tick_millis: u64,
}

fn load_catalog(path: &Path) -> anyhow::Result<InMemoryExamSource> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let drafts: Vec<ExamDraft> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(InMemoryExamSource::from_drafts(drafts)?)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let source = load_catalog(&cli.catalog)?;

    if cli.list {
        for (id, title) in source.list()? {
            println!("{id}\t{title}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(exam_id) = cli.exam_id else {
        bail!("no exam selected: pass --exam-id or set EXAM_ID (see --list)");
    };

    let policy = if cli.accept_any_option {
        AnswerPolicy::AcceptUnvalidated
    } else {
        AnswerPolicy::Validate
    };
    let config = RunnerConfig::new(Duration::from_millis(cli.tick_millis), 32)?;

    let session = ExamSession::open(
        &source,
        exam_id,
        SessionSettings::new(policy),
        Clock::system(),
    )
    .await;
    let exam = match (session.status(), session.exam()) {
        (SessionStatus::InProgress, Some(exam)) => exam.clone(),
        _ => {
            eprintln!("exam unavailable");
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "{}: {} questions, {} to finish. Type `help` for commands.",
        exam.title(),
        exam.question_count(),
        format_countdown(exam.duration_seconds()),
    );

    let (handle, join) = spawn_session(session, &config);
    print!("{}", question_view(&exam, &handle.snapshot()));

    let lines = spawn_stdin_reader();
    let reader_task = tokio::spawn(read_commands(lines, handle.clone(), exam.clone()));
    let display_task = tokio::spawn(display(handle.clone(), exam.clone()));
    drop(handle);

    let session = join.await.context("session task failed")?;
    reader_task.abort();
    display_task.abort();

    if session.submitted_by() == Some(SubmitTrigger::Expired) {
        println!("Time is up, your answers were submitted.");
    }

    let report = Report {
        exam_id: exam.id(),
        title: exam.title(),
        submitted_by: session.submitted_by(),
        result: session.result().copied(),
        questions: session.question_outcomes().unwrap_or_default(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}

/// Blocking stdin reads run on their own thread; the runtime never waits on them.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!(error = %err, "stdin read failed");
                    break;
                }
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Turns input lines into session commands until the session or stdin ends.
async fn read_commands(mut lines: mpsc::Receiver<String>, handle: SessionHandle, exam: Exam) {
    while let Some(line) = lines.recv().await {
        let command = match parse_line(&line) {
            Err(err) => {
                println!("{err}");
                continue;
            }
            Ok(Input::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Input::Show) => {
                print!("{}", question_view(&exam, &handle.snapshot()));
                continue;
            }
            Ok(Input::Choose(option_index)) => SessionCommand::SelectCurrent { option_index },
            Ok(Input::GoTo(index)) => SessionCommand::GoTo(index),
            Ok(Input::Next) => SessionCommand::Next,
            Ok(Input::Previous) => SessionCommand::Previous,
            Ok(Input::Submit) => SessionCommand::Submit,
        };

        if let Err(SessionError::Finished) = handle.send(command).await {
            break;
        }
    }
}

/// Redraws the question when the candidate moves or answers, and warns once
/// when the last minute starts.
async fn display(handle: SessionHandle, exam: Exam) {
    let mut updates = handle.subscribe();
    let mut shown = {
        let s = updates.borrow_and_update();
        (s.current_index, s.answers.clone())
    };
    let mut warned = updates.borrow().remaining_seconds <= LAST_MINUTE;

    while updates.changed().await.is_ok() {
        let session = updates.borrow_and_update().clone();
        if session.status.is_terminal() {
            break;
        }
        if !warned && session.remaining_seconds <= LAST_MINUTE {
            warned = true;
            println!("One minute left.");
        }
        let view = (session.current_index, session.answers.clone());
        if view != shown {
            shown = view;
            print!("{}", question_view(&exam, &session));
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}
