use clap::{Parser, Subcommand};
use cloudwatch_s3_export::cli::BoxError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cloudwatch-s3-export")]
#[command(about = "Export yesterday's CloudWatch Logs to S3", long_about = None)]
struct Cli {
    /// Config file; falls back to EXPORT_CONFIG_PATH, then to built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve scheduled invocations as an AWS Lambda function
    Lambda,
    /// Run a single export sweep and print the report
    Sweep,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // CloudWatch renders ANSI escapes literally
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudwatch_s3_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Lambda) | None => {
            // Default behavior is to run as the Lambda handler
            cloudwatch_s3_export::cli::run::run_lambda(cli.config).await?;
        }
        Some(Commands::Sweep) => {
            cloudwatch_s3_export::cli::run::run_once(cli.config).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { stdout, output } => {
                cloudwatch_s3_export::cli::config::init(stdout, output)?;
            }
            ConfigAction::Validate => {
                let path = cloudwatch_s3_export::config::resolve_config_path(cli.config.as_deref());
                cloudwatch_s3_export::cli::config::validate(path)?;
            }
        },
    }

    Ok(())
}
