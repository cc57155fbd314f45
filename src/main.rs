use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use studio::config::{Defaults, StudioPaths};
use studio::models::{InitOptions, ProjectOptions, Service};
use studio::orchestrator::SystemRunner;
use studio::prompt::TerminalPrompter;
use studio::services::{HubRepository, HubSync, JsonRegistry, LocalHub};
use studio::{Result, StudioContext, StudioError};

#[derive(Parser)]
#[command(name = "studio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scaffold and manage local analysis environments", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initializes an analysis folder for a project
    Init(InitArgs),

    /// Lists all registered projects created with studio init
    #[command(visible_aliases = ["ls", "l", "ll"])]
    List,

    /// Starts services for a specified project
    #[command(visible_alias = "up")]
    Start {
        /// Services to start (default: all)
        services: Vec<String>,

        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Stops services for a specified project
    #[command(visible_alias = "down")]
    Stop {
        /// Services to stop (default: all)
        services: Vec<String>,

        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Updates the docker images of a project
    #[command(visible_alias = "pull")]
    Update {
        #[command(flatten)]
        project: ProjectArgs,

        /// Also check the latest version of all tools
        #[arg(short, long)]
        latest: bool,
    },

    /// Shows the defaults in effect
    Config {
        /// Write the bundled defaults to ~/.dxw/studio/defaults.yml
        #[arg(long)]
        init: bool,

        /// Overwrite an existing defaults file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct InitArgs {
    /// The name of the project and the name of the folder that will be generated
    project_id: String,

    /// The folder where to create the ${projectID} folder
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Put the compose file at the project root instead of studio/
    #[arg(long)]
    flat: bool,

    /// Overwrite an existing project folder
    #[arg(short, long)]
    force: bool,

    /// Skip the hub sync and image version lookups
    #[arg(long)]
    offline: bool,

    /// The chronos docker tag
    #[arg(long)]
    chronos_tag: Option<String>,

    /// The chronos port
    #[arg(long)]
    chronos_port: Option<u16>,

    /// The chronos1 docker tag
    #[arg(long)]
    chronos1_tag: Option<String>,

    /// The chronos1 port
    #[arg(long)]
    chronos1_port: Option<u16>,

    /// The illustry docker tag
    #[arg(long)]
    illustry_tag: Option<String>,

    /// The illustry port
    #[arg(long)]
    illustry_port: Option<u16>,

    /// The docker registry where the chronos images exist
    #[arg(long, env = "CHRONOS_DOCKER_REGISTRY")]
    chronos_docker_registry: Option<String>,

    /// The docker network on which the containers should exist
    #[arg(long)]
    network: Option<String>,
}

impl From<InitArgs> for InitOptions {
    fn from(args: InitArgs) -> Self {
        let mut options = InitOptions::new(args.dir);
        options.flat = args.flat;
        options.force = args.force;
        options.offline = args.offline;
        options.chronos_docker_registry = args.chronos_docker_registry;
        options.network = args.network;

        for (service, tag, port) in [
            (Service::Chronos, args.chronos_tag, args.chronos_port),
            (Service::Chronos1, args.chronos1_tag, args.chronos1_port),
            (Service::Illustry, args.illustry_tag, args.illustry_port),
        ] {
            let entry = options.service_mut(service);
            entry.tag = tag;
            entry.port = port;
        }
        options
    }
}

#[derive(Args)]
struct ProjectArgs {
    /// The project folder or the name of a registered project
    #[arg(short, long, default_value = ".")]
    project: String,

    /// The docker-compose file to use
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl From<ProjectArgs> for ProjectOptions {
    fn from(args: ProjectArgs) -> Self {
        ProjectOptions {
            project: args.project,
            file: args.file,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        if let Some(hint) = e.downcast_ref::<StudioError>().and_then(StudioError::hint) {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        generate(shell, &mut Cli::command(), "studio", &mut io::stdout());
        return Ok(());
    }

    let paths = StudioPaths::from_home()?;
    let defaults = Defaults::load(&paths)?;
    let registry = JsonRegistry::new(paths.projects_file());
    let prompter = TerminalPrompter;
    let runner = SystemRunner;
    let hub: Box<dyn HubSync> = match defaults.hub_repository() {
        Some(url) => Box::new(HubRepository::new(url, defaults.hub_branch(), paths.hub_dir())),
        None => Box::new(LocalHub(paths.hub_dir())),
    };
    let ctx = StudioContext::new(paths, defaults, &registry, &prompter, &runner, hub.as_ref());

    match cli.command {
        Commands::Init(args) => {
            let project_id = args.project_id.clone();
            studio::cli::init::run(&ctx, &project_id, args.into())?;
        }

        Commands::List => {
            studio::cli::list::run(&ctx)?;
        }

        Commands::Start { services, project } => {
            studio::cli::start_stop::start(&ctx, &services, &project.into())?;
        }

        Commands::Stop { services, project } => {
            studio::cli::start_stop::stop(&ctx, &services, &project.into())?;
        }

        Commands::Update { project, latest } => {
            studio::cli::update::run(&ctx, &project.into(), latest)?;
        }

        Commands::Config { init, force } => {
            studio::cli::config::run(&ctx, init, force)?;
        }

        Commands::Completions { .. } => unreachable!("handled before context creation"),
    }

    Ok(())
}
