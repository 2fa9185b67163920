//! `formcraft`: build a form in the terminal, preview it and fill it in.
//!
//! Logs go to `--log-file` (filtered by `RUST_LOG`) because the terminal belongs to
//! the UI. On exit the last accepted submission is printed as JSON.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use formcraft::{
    CompletionBasis, EditorOptions, FormDefinition, FormEditor, FormRecord, Session,
    TypeChangePolicy, UuidSource,
};
use formcraft_ratatui::TuiApp;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Completion {
    /// Only required questions count
    Required,
    /// Every question counts
    All,
}

impl From<Completion> for CompletionBasis {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Required => Self::Required,
            Completion::All => Self::All,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "formcraft", version, about = "Build, preview and fill in forms in the terminal")]
struct Cli {
    /// Title of a new form
    #[arg(long)]
    title: Option<String>,

    /// Description of a new form
    #[arg(long)]
    description: Option<String>,

    /// Which questions the completion gauge counts
    #[arg(long, value_enum, default_value = "required")]
    completion: Completion,

    /// Keep a question's id when its type changes
    #[arg(long)]
    keep_ids_on_type_change: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Start from a saved form record
    #[arg(long, value_name = "FORM.json")]
    load: Option<PathBuf>,

    /// Print the final form record as JSON on exit
    #[arg(long)]
    print_record: bool,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_form(path: &Path) -> anyhow::Result<FormDefinition> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let record = FormRecord::from_json(&json)
        .with_context(|| format!("{} is not a form record", path.display()))?;
    FormDefinition::try_from(record)
        .with_context(|| format!("{} contains an invalid form", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut editor = match &cli.load {
        Some(path) => FormEditor::from_definition(load_form(path)?, Box::new(UuidSource)),
        None => FormEditor::new(),
    };
    if let Some(title) = cli.title {
        editor.set_title(title);
    }
    if let Some(description) = cli.description {
        editor.set_description(description);
    }

    let type_change = if cli.keep_ids_on_type_change {
        TypeChangePolicy::PreserveId
    } else {
        TypeChangePolicy::RegenerateId
    };
    let options = EditorOptions::new()
        .with_completion(cli.completion.into())
        .with_type_change_policy(type_change);
    let mut session = Session::new(editor, options);

    TuiApp::new()
        .with_completion(cli.completion.into())
        .run(&mut session)
        .context("terminal UI failed")?;

    if let Some(submission) = session.last_submission() {
        println!("{}", submission.to_json()?);
    }
    if cli.print_record {
        let record = session.into_editor().to_record();
        println!("{}", record.to_json_pretty()?);
    }
    Ok(())
}
