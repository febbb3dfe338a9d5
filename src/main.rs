use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sessionscan::config::{validate_config, Config, ConfigLoader};
use sessionscan::core::{Address, AnalysisError, ProcessId};
use sessionscan::memory::{AddressSpace, Amd64AddressSpace, SnapshotImage};
use sessionscan::modules::{KernelModuleSource, ModuleCatalog};
use sessionscan::process::{FilteredSource, KernelProcessSource, ProcessFilter};
use sessionscan::profile::Profile;
use sessionscan::report::{render, ReportBuilder};
use sessionscan::session::{ProfileSessionFactory, SessionSpaceLocator};

/// List details on user logon sessions captured in a memory snapshot
#[derive(Parser, Debug)]
#[command(name = "sessionscan", version, about)]
struct Cli {
    /// Path to the raw memory snapshot
    image: PathBuf,

    /// Directory table base of the kernel (hex accepted)
    #[arg(long, value_parser = parse_address)]
    kernel_dtb: Address,

    /// Virtual address of the active-process list head
    #[arg(long, value_parser = parse_address)]
    process_list_head: Address,

    /// Virtual address of the loaded-module list head; images stay
    /// unresolved without it
    #[arg(long, value_parser = parse_address)]
    module_list_head: Option<Address>,

    /// Select processes by identifier (repeatable)
    #[arg(long = "pid")]
    pids: Vec<ProcessId>,

    /// Select processes by object offset (repeatable, hex accepted)
    #[arg(long = "offset", value_parser = parse_address)]
    offsets: Vec<Address>,

    /// Structure profile for the snapshot's Windows build
    #[arg(long)]
    profile: Option<String>,

    /// Configuration file (defaults to sessionscan.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long)]
    output: Option<String>,
}

fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|err| err.to_string())
}

fn load_configuration(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(path)
            .load()
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ConfigLoader::new("sessionscan.toml").load_or_default(),
    };

    // CLI flags override file values
    if let Some(profile) = &cli.profile {
        config.analysis.profile = profile.clone();
    }
    if let Some(output) = &cli.output {
        config.report.format = output.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_configuration(&cli)?;

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(false)
        .init();

    info!("sessionscan v{}", env!("CARGO_PKG_VERSION"));

    let profile = Profile::by_name(&config.analysis.profile)
        .ok_or_else(|| AnalysisError::UnknownProfile(config.analysis.profile.clone()))?;
    let max_entries = config.analysis.max_list_entries;

    let image = Arc::new(SnapshotImage::open(&cli.image)?);
    let kernel_space: Arc<dyn AddressSpace> =
        Arc::new(Amd64AddressSpace::new(image.clone(), cli.kernel_dtb)?);

    let catalog = match cli.module_list_head {
        Some(head) => {
            KernelModuleSource::new(kernel_space.clone(), profile, head, max_entries).collect()
        }
        None => {
            info!("no module list head supplied, image names will stay unresolved");
            ModuleCatalog::default()
        }
    };

    let source = KernelProcessSource::new(
        image,
        kernel_space,
        profile,
        cli.process_list_head,
        max_entries,
    );
    let filter = ProcessFilter::new(cli.pids.clone(), cli.offsets.clone());
    let filtered = FilteredSource::new(&source, filter);

    let locator =
        SessionSpaceLocator::new(&filtered, ProfileSessionFactory::new(profile, max_entries));
    let reports = ReportBuilder::new(&catalog).build(locator.enumerate());
    info!(sessions = reports.len(), "discovery complete");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.report.format.as_str() {
        "text" => render::render_text(&reports, &mut out)?,
        "json" => render::render_json(&reports, &mut out)?,
        other => bail!("unknown report format: {other}"),
    }

    Ok(())
}
