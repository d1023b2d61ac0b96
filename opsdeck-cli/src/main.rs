use clap::{Parser, Subcommand};
use opsdeck_http::{HttpRuntimeConfig, HttpRuntimeConfigBuilder};
use opsdeck_observability::{LogFormat, init_tracing};
use std::net::SocketAddr;
use std::process::ExitCode;

mod app;
mod commands;
mod error;

use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "opsdeck", version)]
#[command(about = "opsdeck - service operations, test plans and communication traces")]
struct Cli {
    /// Log output format (json, pretty). Overrides OPSDECK_LOG_FORMAT.
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve actions, resources and traces over HTTP
    Serve {
        /// Listen address. Overrides OPSDECK_BIND_ADDR.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// List or run test plans
    Plans {
        #[command(subcommand)]
        plans_command: PlanCommands,
    },
    /// Invoke an action against freshly seeded state
    Invoke {
        /// Action name, e.g. ops.service.restart
        action: String,
        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
    /// Read a resource by URI, e.g. ops/service/web
    Read {
        uri: String,
        /// Print the full resource content as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PlanCommands {
    /// Show the available plans
    List,
    /// Run a plan and print its result
    Run {
        /// Plan name
        name: String,
        /// Target URL. Overrides TESTPLAN_TARGET_URL.
        #[arg(long)]
        target: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<HttpRuntimeConfig, CliError> {
    let mut builder = HttpRuntimeConfigBuilder::from_env()?;
    if let Some(format) = cli.log_format {
        builder = builder.log_format(format);
    }
    let mut config = builder.build()?;
    // One-shot commands only log what went wrong.
    if !matches!(cli.command, Commands::Serve { .. }) {
        config.observability.default_filter = "warn".to_string();
    }
    Ok(config)
}

async fn run(command: Commands, config: HttpRuntimeConfig) -> Result<bool, CliError> {
    match command {
        Commands::Serve { bind } => commands::serve(config, bind).await,
        Commands::Plans { plans_command } => commands::plans(plans_command).await,
        Commands::Invoke { action, args } => commands::invoke(&config, action, args).await,
        Commands::Read { uri, json } => commands::read(&config, &uri, json),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_tracing(&config.observability) {
        eprintln!("⚠️  Logging unavailable: {}", e);
    }

    match run(cli.command, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
