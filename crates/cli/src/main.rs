use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "terrascope",
    version,
    about = "A language server for Terragrunt configurations",
    long_about = "Terrascope serves hover, go-to-definition and completion for Terragrunt \
                  HCL files (terragrunt.hcl, terragrunt.stack.hcl and values files) over \
                  the Language Server Protocol on stdio."
)]
struct Cli {
    /// Directory for log files. Defaults to ~/.terrascope/logs.
    #[arg(long, env = "TERRASCOPE_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Also log to stderr (stdout belongs to the protocol).
    #[arg(long)]
    stderr: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = terrascope_core::logging::init_logging("lsp", cli.log_dir, cli.stderr);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting terrascope");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(terrascope_lsp::run_server());

    tracing::info!("terrascope stopped");
    Ok(())
}
