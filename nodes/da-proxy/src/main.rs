use clap::Parser;
use color_eyre::eyre::Result;
use da_proxy::{Config, DaProxy, LogArgs, ProxyArgs};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path for a yaml-encoded proxy config file
    config: std::path::PathBuf,
    /// Overrides log config.
    #[clap(flatten)]
    log_args: LogArgs,
    /// Overrides store and server config.
    #[clap(flatten)]
    proxy_args: ProxyArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let Args {
        config,
        log_args,
        proxy_args,
    } = Args::parse();
    let config = serde_yaml::from_reader::<_, Config>(std::fs::File::open(config)?)?
        .update_from_args(log_args, proxy_args)?;

    let _tracing = da_proxy_tracing::init(config.tracing.clone())?;

    let proxy = DaProxy::start(config).await?;
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    proxy.stop().await
}
