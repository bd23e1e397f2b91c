use std::path::PathBuf;

use clap::Parser;
use fzdeploy::{
    Deployer, PortResolver, SessionConfig,
    constants::{DEFAULT_SRC_FILE, DEST_PATH},
    error::DeployResult,
};
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Deploy a script to a Flipper Zero over USB serial",
    long_about = None,
    after_help = "Exit codes: 0 success, 1 no Flipper found, 2 usage error, 3 deploy failed"
)]
pub(crate) struct DeployOptions {
    /// Serial port, auto-detected when omitted
    port: Option<String>,

    /// Script to deploy
    #[clap(long, default_value = DEFAULT_SRC_FILE)]
    src: PathBuf,

    /// Run the script after writing it
    #[clap(long, default_value_t = false)]
    run: bool,

    /// Destination path on the Flipper
    #[clap(long, default_value = DEST_PATH)]
    dest: String,

    /// List candidate serial ports and exit
    #[clap(long, default_value_t = false)]
    list: bool,

    /// Log every byte sent and received
    #[clap(short, long, default_value_t = false)]
    pub verbose: bool,
}

pub(crate) fn handle_deploy(opts: DeployOptions, resolver: &PortResolver) -> DeployResult<()> {
    if opts.list {
        for port in resolver.candidates()? {
            println!("{}", port);
        }
        return Ok(());
    }

    let port = resolver.resolve(opts.port.as_deref())?;
    let config = SessionConfig::default().with_destination(opts.dest);

    let mut deployer = Deployer::new(port).with_config(config);
    deployer.run_after_write(opts.run);
    deployer.progress_bar(true);

    info!(
        "Deploying {} to {} via {}",
        opts.src.display(),
        deployer.config().destination,
        deployer.port()
    );
    let report = deployer.deploy_file(&opts.src)?;

    println!("Deployed {} -> {}", opts.src.display(), report.destination);
    println!("Response: {}", report.write_response);
    if let Some(run_response) = report.run_response {
        println!("Run response: {}", run_response);
    }

    Ok(())
}
