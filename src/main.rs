use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payreq_forms::application::desk::RequestDesk;
use payreq_forms::application::engine::FormEngine;
use payreq_forms::domain::catalog::TemplateCatalog;
use payreq_forms::domain::legacy;
use payreq_forms::domain::ports::SubmissionStoreBox;
use payreq_forms::domain::value::FormData;
use payreq_forms::error::FormError;
use payreq_forms::infrastructure::in_memory::InMemorySubmissionStore;
#[cfg(feature = "storage-rocksdb")]
use payreq_forms::infrastructure::rocksdb::RocksDBStore;
use payreq_forms::infrastructure::template_files::{builtin_catalog, load_dir};
use payreq_forms::interfaces::csv::edit_reader::EditReader;
use payreq_forms::interfaces::csv::error_writer::ErrorWriter;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of JSON templates to use instead of the built-in ones
    #[arg(long, env = "PAYREQ_TEMPLATES_DIR", global = true)]
    templates_dir: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYREQ_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available request templates
    Templates,
    /// Report authoring problems in the templates
    Lint,
    /// Replay a CSV of field edits and report validation errors
    Check {
        /// Template id
        template: String,
        /// CSV file with `field,value` rows
        edits: PathBuf,
        /// Stored JSON payload to start from
        #[arg(long)]
        initial: Option<PathBuf>,
        /// Print the full form snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a CSV of field edits and store the request
    Submit {
        /// Template id
        template: String,
        /// CSV file with `field,value` rows
        edits: PathBuf,
        /// Id to store the request under
        #[arg(long)]
        id: u32,
    },
    /// Reopen a stored request and print its form state
    Show {
        #[arg(long)]
        id: u32,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.templates_dir {
        Some(dir) => load_dir(dir),
        None => builtin_catalog(),
    }
    .into_diagnostic()?;

    match cli.command {
        Commands::Templates => {
            for template in catalog.iter() {
                println!(
                    "{}\t{}\t{}\t{} fields",
                    template.id,
                    template.version,
                    template.name,
                    template.fields().count()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lint => Ok(lint(&catalog)),
        Commands::Check {
            template,
            edits,
            initial,
            json,
        } => {
            let desk = RequestDesk::new(catalog, Box::new(InMemorySubmissionStore::new()));
            let mut engine = match initial {
                Some(path) => open_with_payload(desk.catalog(), &template, &path)?,
                None => desk.open(&template).into_diagnostic()?,
            };
            replay(&mut engine, &edits)?;

            let valid = engine.validate_all();
            if json {
                serde_json::to_writer_pretty(io::stdout().lock(), &engine.snapshot())
                    .into_diagnostic()?;
                println!();
            } else {
                ErrorWriter::new(io::stdout().lock())
                    .write_errors(engine.errors())
                    .into_diagnostic()?;
            }
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Submit {
            template,
            edits,
            id,
        } => {
            let desk = RequestDesk::new(catalog, open_store(cli.db_path)?);
            let mut engine = desk.open(&template).into_diagnostic()?;
            replay(&mut engine, &edits)?;

            match desk.submit(id, &mut engine).await {
                Ok(submission) => {
                    serde_json::to_writer_pretty(io::stdout().lock(), &submission)
                        .into_diagnostic()?;
                    println!();
                    Ok(ExitCode::SUCCESS)
                }
                Err(FormError::Invalid(errors)) => {
                    ErrorWriter::new(io::stdout().lock())
                        .write_errors(&errors)
                        .into_diagnostic()?;
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e).into_diagnostic(),
            }
        }
        Commands::Show { id } => {
            let desk = RequestDesk::new(catalog, open_store(cli.db_path)?);
            let engine = desk.open_existing(id).await.into_diagnostic()?;
            let template_id = engine.template().map(|template| template.id.as_str());
            let view = serde_json::json!({
                "template": template_id,
                "form": engine.snapshot(),
            });
            serde_json::to_writer_pretty(io::stdout().lock(), &view).into_diagnostic()?;
            println!();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_store(db_path: Option<PathBuf>) -> Result<SubmissionStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemorySubmissionStore::new()))
        }
        None => Ok(Box::new(InMemorySubmissionStore::new())),
    }
}

fn open_with_payload(catalog: &TemplateCatalog, template_id: &str, path: &Path) -> Result<FormEngine> {
    let template = catalog
        .get(template_id)
        .ok_or_else(|| FormError::UnknownTemplate(template_id.to_string()))
        .into_diagnostic()?;
    let file = File::open(path).into_diagnostic()?;
    let mut data: FormData = serde_json::from_reader(file).into_diagnostic()?;
    legacy::normalize(&template, &mut data);

    let mut engine = FormEngine::new();
    engine.select_template(Some(template), Some(data));
    Ok(engine)
}

fn replay(engine: &mut FormEngine, edits: &Path) -> Result<()> {
    let file = File::open(edits).into_diagnostic()?;
    for edit in EditReader::new(file).edits() {
        match edit {
            Ok(edit) => {
                if !engine.update_field_raw(&edit.field, &edit.value) {
                    warn!(field = %edit.field, "edit ignored");
                }
            }
            Err(e) => {
                eprintln!("Error reading edit: {}", e);
            }
        }
    }
    Ok(())
}

fn lint(catalog: &TemplateCatalog) -> ExitCode {
    let mut clean = true;
    for template in catalog.iter() {
        for issue in template.lint() {
            clean = false;
            println!("{}: {}", template.id, issue);
        }
    }
    if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
