use clap::Parser;
use cpma::{
    cli::{self, Cli, Settings},
    fetch::{self, FileFetcher, HostFileFetcher},
    legacy::{self, MasterConfig},
    logging, manifest,
    transform::{self, Transformer},
    writer,
};
use snafu::{ResultExt, Snafu};
use tracing::{info, warn};

const APP_NAME: &str = "cpma";
const LOG_ENV: &str = "CPMA_LOG";

const OCP4_INSTALL_MESSAGE: &str = "\
To install OCP4 run the installer as follow in order to add CRDs:
'./openshift-install --dir $INSTALL_DIR create install-config'
'./openshift-install --dir $INSTALL_DIR create manifests'
# Copy generated CRD manifest files to '$INSTALL_DIR/openshift/'
# Edit them if needed, then run installation:
'./openshift-install --dir $INSTALL_DIR create cluster'";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to resolve settings"))]
    ResolveSettings { source: cli::Error },

    #[snafu(display("failed to initialize logging"))]
    InitializeLogging { source: logging::Error },

    #[snafu(display("failed to fetch master configuration {path:?}"))]
    FetchMasterConfig { source: fetch::Error, path: String },

    #[snafu(display("failed to decode master configuration {path:?}"))]
    DecodeMasterConfig { source: legacy::Error, path: String },

    #[snafu(display("failed to transform the OAuth configuration"))]
    Transform { source: transform::Error },

    #[snafu(display("failed to generate manifests"))]
    GenerateManifests { source: manifest::Error },

    #[snafu(display("failed to write manifests"))]
    WriteManifests { source: writer::Error },
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let home_dir = std::env::var_os("HOME").map(std::path::PathBuf::from);
    let settings = Settings::resolve(&cli, home_dir.as_deref()).context(ResolveSettingsSnafu)?;

    logging::initialize_logging(LOG_ENV, APP_NAME, settings.debug)
        .context(InitializeLoggingSnafu)?;

    let fetcher = HostFileFetcher::new(&settings.hostname, &settings.output_dir);
    let path = &settings.master_config_file;
    info!(hostname = fetcher.hostname(), path, "loading master configuration");
    let content = fetcher
        .fetch(path)
        .context(FetchMasterConfigSnafu { path })?;
    let master_config =
        MasterConfig::from_yaml(&content).context(DecodeMasterConfigSnafu { path })?;

    let oauth_config = master_config.oauth_config.unwrap_or_default();
    let output = Transformer::new(&fetcher)
        .transform(&oauth_config)
        .context(TransformSnafu)?;
    for diagnostic in &output.diagnostics {
        warn!(
            provider_name = diagnostic.provider_name.as_str(),
            kind = diagnostic.kind.as_str(),
            "{diagnostic}"
        );
    }

    let manifests = output.manifests().context(GenerateManifestsSnafu)?;
    writer::write_manifests(&settings.output_dir, &manifests).context(WriteManifestsSnafu)?;

    println!("{OCP4_INSTALL_MESSAGE}");
    Ok(())
}
