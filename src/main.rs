use std::path::PathBuf;

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use oam_tag::boundary::BoundaryWarning;
use oam_tag::cli::{build_summary, Bump, Workspace};
use oam_tag::config;
use oam_tag::deriver::VersionDeriver;
use oam_tag::git::Git2Repository;
use oam_tag::ui;

#[derive(Parser)]
#[command(
    name = "oam-tag",
    version,
    about = "Derive image versions and tags from git and patch the OAM manifest"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Project root (defaults to the enclosing git working tree)"
    )]
    project_root: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the semantic version (<major>.<minor>.<sha>)
    Version {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        service: String,
    },

    /// Print the comma-separated container tags for a service
    Tags {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        service: String,
        /// Registry prefix, e.g. docker.io/acme
        registry: Option<String>,
    },

    /// Point the service's image in the OAM manifest at the current commit
    UpdateOam {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        service: String,
        /// Registry prefix, e.g. docker.io/acme
        registry: Option<String>,
        #[arg(long, help = "Preview the changes without writing the manifest")]
        dry_run: bool,
    },

    /// Print a Markdown build summary
    Summary {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        service: String,
    },

    /// Bump the major base version; minor restarts at 0
    IncrementMajor,

    /// Bump the minor base version
    IncrementMinor,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::InvalidSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                // Unrecognized commands print usage and succeed
                if let Err(err) = Cli::command().print_help() {
                    ui::display_error(&format!("Failed to print usage: {}", err));
                    std::process::exit(1);
                }
                println!();
                return;
            }
            _ => e.exit(),
        },
    };

    if let Err(e) = run(cli) {
        ui::display_error(&format!("{}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let start = cli.project_root.clone().unwrap_or_else(|| cwd.clone());

    let repo = Git2Repository::discover(&start);
    let root = cli
        .project_root
        .clone()
        .or_else(|| repo.workdir())
        .unwrap_or(cwd);

    let config = config::load_config(cli.config.as_deref(), &root)?;
    let workspace = Workspace::new(root, config);

    match cli.command {
        Command::Version { .. } => {
            let deriver = derive(&workspace, &repo)?;
            println!("{}", deriver.semantic_version());
        }
        Command::Tags { service, registry } => {
            let deriver = derive(&workspace, &repo)?;
            let registry = workspace.registry(registry.as_deref());
            println!("{}", deriver.container_tags(registry, &service).join(","));
        }
        Command::Summary { service } => {
            let deriver = derive(&workspace, &repo)?;
            let summary = build_summary(
                &deriver,
                &service,
                workspace.registry(None),
                chrono::Utc::now(),
            );
            print!("{}", ui::render_summary(&summary));
        }
        Command::UpdateOam {
            service,
            registry,
            dry_run,
        } => {
            let deriver = derive(&workspace, &repo)?;
            update_oam(&workspace, &deriver, &service, registry.as_deref(), dry_run)?;
        }
        Command::IncrementMajor => increment(&workspace, Bump::Major)?,
        Command::IncrementMinor => increment(&workspace, Bump::Minor)?,
    }

    Ok(())
}

fn derive(workspace: &Workspace, repo: &Git2Repository) -> Result<VersionDeriver> {
    let derivation = workspace.derive(repo)?;
    display_warnings(&derivation.warnings);
    Ok(derivation.deriver)
}

fn update_oam(
    workspace: &Workspace,
    deriver: &VersionDeriver,
    service: &str,
    registry: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    ui::display_status(&format!("Updating OAM manifest for service: {}", service));
    ui::display_status(&format!(
        "Manifest: {}",
        workspace.manifest_path().display()
    ));

    let outcome = workspace.update_oam(deriver, service, registry, dry_run)?;
    ui::display_status(&format!("New image: {}", outcome.image));
    ui::display_status(&format!("Version: {}", deriver.semantic_version()));
    display_warnings(&outcome.warnings);
    ui::display_patch_changes(&outcome.report);

    if dry_run {
        ui::display_success("Dry run: manifest left unchanged");
    } else if outcome.report.written {
        ui::display_success(&format!("Updated {}", outcome.report.path.display()));
    } else {
        ui::display_success("Manifest already up to date");
    }

    Ok(())
}

fn increment(workspace: &Workspace, bump: Bump) -> Result<()> {
    let (old, new) = workspace.increment(bump)?;
    println!("Base version bumped: {} -> {}", old, new);
    Ok(())
}

fn display_warnings(warnings: &[BoundaryWarning]) {
    for warning in warnings {
        ui::display_boundary_warning(warning);
    }
}
