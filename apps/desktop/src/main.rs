use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    load_settings, render_plain, ClientSettings, HttpGenerationClient, ResultPresenter,
    Settlement, SubmissionController,
};
use shared::domain::FormField;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ragmail", about = "Generate professor outreach emails")]
struct Args {
    /// Settings file (defaults to ./ragmail.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Generation service origin, e.g. http://localhost:8000.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit professor details and print the generated email.
    Generate(GenerateArgs),
    /// Check whether the generation service is ready.
    Health,
    /// List the reference projects the service can pick from.
    Projects,
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    #[arg(long)]
    professor_name: Option<String>,
    #[arg(long)]
    university_name: Option<String>,
    #[arg(long)]
    research_domain: Option<String>,
    #[arg(long)]
    paper_title: Option<String>,
    #[arg(long)]
    paper_summary: Option<String>,
    /// Skip project matching and use this project.
    #[arg(long)]
    force_project: Option<String>,
    /// Save the email as email_<project>_<date>.txt.
    #[arg(long)]
    save: bool,
    /// Directory for --save (overrides export_dir from settings).
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print the raw service response as JSON instead of the preview.
    #[arg(long)]
    json: bool,
}

impl GenerateArgs {
    fn fields(&self) -> [(FormField, Option<&String>); 6] {
        [
            (FormField::ProfessorName, self.professor_name.as_ref()),
            (FormField::UniversityName, self.university_name.as_ref()),
            (FormField::ResearchDomain, self.research_domain.as_ref()),
            (FormField::PaperTitle, self.paper_title.as_ref()),
            (FormField::PaperSummary, self.paper_summary.as_ref()),
            (FormField::ForceProject, self.force_project.as_ref()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref(), args.base_url.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = HttpGenerationClient::new(settings.base_url()?);
    match args.command {
        Command::Generate(generate) => run_generate(client, &settings, generate).await,
        Command::Health => run_health(&client).await,
        Command::Projects => run_projects(&client).await,
    }
}

async fn run_generate(
    client: HttpGenerationClient,
    settings: &ClientSettings,
    args: GenerateArgs,
) -> Result<()> {
    let mut controller = SubmissionController::new(Arc::new(client));
    for (field, value) in args.fields() {
        if let Some(value) = value {
            controller.update_field(field, value.as_str());
        }
    }

    let settlement = controller.submit()?.await;
    let state = controller.snapshot();
    let presenter = ResultPresenter::new();

    match settlement {
        Settlement::Succeeded => {}
        Settlement::Failed(message) => bail!(message),
        Settlement::Superseded => bail!("generation request was superseded"),
    }

    if args.json {
        if let Some(result) = state.result.as_deref() {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    } else {
        print!("{}", render_plain(presenter.view(&state)));
    }

    if args.save {
        let dir = args
            .output_dir
            .or_else(|| settings.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        if let Some(export) = presenter.download_now(&state) {
            let path = export
                .save_in(&dir)
                .context("failed to save generated email")?;
            eprintln!("Saved {}", path.display());
        }
    }
    Ok(())
}

async fn run_health(client: &HttpGenerationClient) -> Result<()> {
    let health = client
        .health()
        .await
        .with_context(|| format!("health check against {} failed", client.base_url()))?;
    println!("status: {}", health.status);
    println!("email_generator_ready: {}", health.email_generator_ready);
    println!("vector_db_loaded: {}", health.vector_db_loaded);
    if !health.is_ready() {
        bail!("generation service is not ready");
    }
    Ok(())
}

async fn run_projects(client: &HttpGenerationClient) -> Result<()> {
    let catalog = client
        .list_projects()
        .await
        .with_context(|| format!("listing projects from {} failed", client.base_url()))?;
    for project in &catalog.projects {
        if project.domain.is_empty() {
            println!("{}\t{}", project.id, project.title);
        } else {
            println!("{}\t{} ({})", project.id, project.title, project.domain);
        }
    }
    Ok(())
}
