use clap::Parser;
use miette::Result;
use shoal::cli::{Cli, Commands, Project};
use shoal::output::Printer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let printer = Printer::new();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init(args) => shoal::cli::init::run(args, &printer)?,
        Commands::New(args) => shoal::cli::new::run(args, &Project::load(config)?, &printer)?,
        Commands::Validate(args) => {
            shoal::cli::validate::run(args, &Project::load(config)?, &printer)?
        }
        Commands::Info(args) => shoal::cli::info::run(args, &printer)?,
        Commands::Rebuild(args) => {
            shoal::cli::rebuild::run(args, &Project::load(config)?, &printer)?
        }
        Commands::Completions(args) => shoal::cli::completions::run(args)?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the `-v` count.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
