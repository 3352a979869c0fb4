use anyhow::{Context, Result};
use clap::Parser;
use memsplice_core::{
    Patcher, ScanmemScanner, SpliceConfig, W4Png2Src, WriteResult, find_pid_by_name,
    find_w4_in_path,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memsplice")]
#[command(about = "Splice data into a running process between a start and end sentinel")]
struct Args {
    /// Asset to hot-swap in memory (must have a section in the config)
    asset: PathBuf,

    /// Path to the WASM-4 binary `w4` (default: searched in PATH)
    #[arg(long)]
    w4: Option<PathBuf>,

    /// Sentinel configuration file
    #[arg(short, long, default_value = "build/png2src-generated/png2mem.toml")]
    config: PathBuf,

    /// Target process name
    #[arg(short, long, default_value = "wasm4-linux")]
    process: String,

    /// Path to the scanmem binary
    #[arg(long, default_value = "scanmem")]
    scanmem: PathBuf,

    /// png2src output template
    #[arg(long, default_value = "src/png2src-template.txt.mustache")]
    template: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("memsplice=info".parse()?)
                .add_directive("memsplice_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if std::env::var("USER").ok().as_deref() != Some("root") {
        warn!("not running as root; scanning another process's memory usually requires it");
        warn!("try: sudo env \"PATH=$PATH\" memsplice <asset>");
    }

    let w4 = match args.w4 {
        Some(path) => path,
        None => find_w4_in_path().context(
            "w4 not found in PATH (under sudo, preserve it with `sudo env \"PATH=$PATH\" ...`)",
        )?,
    };

    let config = SpliceConfig::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    // Resolve the asset before anything touches the target; a missing section
    // is fatal before the first scan.
    let asset_key = args.asset.to_string_lossy();
    let spec = config.spec(&asset_key)?;

    let pid = find_pid_by_name(&args.process)?;
    info!(pid, process = %args.process, "found target process");

    let mut scanner = ScanmemScanner::new(&args.scanmem, pid);
    let provider = W4Png2Src::new(w4, args.template);
    let outcomes = Patcher::new(&mut scanner, spec).splice(&provider, &args.asset)?;

    if outcomes.is_empty() {
        println!("{}", "No valid regions found; nothing written.".yellow());
        return Ok(());
    }

    for outcome in &outcomes {
        let range = format!(
            "{:#x}..{:#x} ({} bytes)",
            outcome.region.start, outcome.region.end, outcome.region.length
        );
        match &outcome.result {
            WriteResult::Written => println!("  {} {range}", "written".green()),
            WriteResult::Failed(message) => {
                println!("  {} {range}: {message}", "failed".red())
            }
        }
    }

    let written = outcomes.iter().filter(|o| o.is_written()).count();
    println!(
        "Done. Hot-swapped {} ({written}/{} regions)",
        args.asset.display(),
        outcomes.len()
    );
    Ok(())
}
