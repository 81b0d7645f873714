use anyhow::Context;
use clap::{Parser, Subcommand};
use common::{MetadataCatalog, PackageOptions, ToolHome};
use forge::{HostInfo, MsBuild};
use oracle::{CompileSession, SymbolTable};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vault::SdkToolchain;

#[derive(Parser)]
#[command(name = "winpack")]
#[command(about = "Package native Windows applications", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision signing credentials and identity, then build with MSBuild.
    Package(PackageArgs),
    /// Validate a recorded symbol table against a metabase.
    CheckSymbols {
        /// Metabase JSON (`{"classes": {...}}`).
        #[arg(long)]
        metabase: PathBuf,
        /// Symbol table JSON (`{"<symbol>": {"type": "method", ...}}`).
        symbols: PathBuf,
        /// Report every violation instead of stopping at the first.
        #[arg(long)]
        all: bool,
    },
}

#[derive(clap::Args)]
struct PackageArgs {
    /// Application name.
    #[arg(long)]
    name: String,
    /// Output directory.
    #[arg(long)]
    dest: PathBuf,
    /// Application source directory.
    #[arg(long, default_value = ".")]
    src: PathBuf,
    /// Target SDK version.
    #[arg(long)]
    sdk: String,
    /// Existing signing credential; a test certificate is used otherwise.
    #[arg(long)]
    pfx: Option<PathBuf>,
    /// Package identity name.
    #[arg(long = "identity-name")]
    identity_name: Option<String>,
    #[arg(long)]
    certname: Option<String>,
    #[arg(long)]
    publisher: Option<String>,
    #[arg(long, default_value = common::options::DEFAULT_PLATFORM)]
    platform: String,
    /// Per-tool timeout in seconds.
    #[arg(long = "tool-timeout", env = "WINPACK_TOOL_TIMEOUT")]
    tool_timeout: Option<u64>,
}

impl PackageArgs {
    fn into_options(self) -> PackageOptions {
        let mut options = PackageOptions::new(self.name, absolute(&self.dest), self.sdk);
        options.src = absolute(&self.src);
        options.pfx = self.pfx.as_deref().map(absolute);
        options.identity_name = self.identity_name;
        options.certname = self.certname;
        options.publisher = self.publisher;
        options.platform = self.platform;
        options.tool_timeout_secs = self.tool_timeout;
        options
    }
}

fn absolute(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: .env: {}", e);
        }
    }

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = match cli.command {
        Commands::Package(args) => cmd_package(args.into_options()).await,
        Commands::CheckSymbols {
            metabase,
            symbols,
            all,
        } => cmd_check_symbols(&metabase, &symbols, all),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// package
// ---------------------------------------------------------------------------

async fn cmd_package(options: PackageOptions) -> anyhow::Result<()> {
    let home = ToolHome::resolve().context("unable to determine a home directory; set WINPACK_HOME")?;
    let host = HostInfo::detect().await;
    let signer = SdkToolchain::new(options.tool_timeout());
    let builder = MsBuild::new(options.tool_timeout());

    let report = forge::package(&host, &options, &home, &signer, &builder)
        .await
        .with_context(|| format!("packaging {} failed", options.name))?;

    info!("Application GUID: {}", report.identity.guid);
    info!("Built {}", report.solution.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// check-symbols
// ---------------------------------------------------------------------------

fn cmd_check_symbols(metabase: &Path, symbols_path: &Path, all: bool) -> anyhow::Result<()> {
    let catalog = MetadataCatalog::load(metabase)
        .with_context(|| format!("loading metabase {}", metabase.display()))?;
    let text = std::fs::read_to_string(symbols_path)
        .with_context(|| format!("reading {}", symbols_path.display()))?;
    let symbols: SymbolTable = serde_json::from_str(&text)
        .with_context(|| format!("parsing symbol table {}", symbols_path.display()))?;

    let mut session = CompileSession::new(Arc::new(catalog));
    session.begin_file(symbols_path.display().to_string());
    for (key, descriptor) in symbols {
        session.record_as(key, descriptor);
    }

    if all {
        let violations = oracle::collect_violations(session.catalog(), session.symbols());
        for v in &violations {
            warn!("{}", v);
        }
        anyhow::ensure!(
            violations.is_empty(),
            "{} symbol violation(s)",
            violations.len()
        );
    } else {
        session.finish_file()?;
    }

    println!("{} symbol(s) OK", session.symbols().len());
    Ok(())
}
