use clap::Parser;
use corvus_client::{DEFAULT_PACKAGE_ID, DEFAULT_PAGE_URL, PackageClient};
use corvus_extract::{ExtractMode, extract_package};
use corvus_ledger::build::assemble;
use std::path::PathBuf;

mod persist;

#[derive(Parser)]
#[command(name = "corvus")]
#[command(about = "Download and extract the latest client package and build its asset manifest")]
struct Cli {
    /// Unpack inner archives straight from memory instead of spooling
    /// each one to a temporary file first.
    #[arg(long)]
    direct: bool,

    /// Skip download and extraction; rebuild the manifest from an
    /// already-unpacked asset tree.
    #[arg(long)]
    build_only: bool,

    /// Server identifier recorded in the manifest; also names the asset
    /// tree directory and the snapshot file.
    #[arg(long, default_value = "EN")]
    server: String,

    /// Store page to scrape for the package descriptor.
    #[arg(long, env = "CORVUS_STORE_URL", default_value = DEFAULT_PAGE_URL)]
    store_url: String,

    /// Store package id, used for download fallback and artifact naming.
    #[arg(long, default_value = DEFAULT_PACKAGE_ID)]
    package_id: String,

    /// Working directory holding downloads, the asset tree and manifests.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let client = PackageClient::new(cli.store_url.clone(), cli.package_id.clone());
    let package = client.fetch_descriptor().await?;
    println!("Latest package: {}", package.version);

    let tree = cli.root.join(&cli.server);
    if !cli.build_only {
        let artifact = client.download(&package, &cli.root).await?;
        let mode = if cli.direct {
            ExtractMode::InMemory
        } else {
            ExtractMode::Streamed
        };
        extract_package(&artifact, &tree, mode)?;
    }

    let build = assemble(&tree, &cli.server, &package.version)?;
    persist::save(&build, &cli.root)?;

    println!(
        "✅ Built manifest for {} {} with {} files.",
        build.server,
        build.version,
        build.filemap.len()
    );
    Ok(())
}
