//! Fetch a network from NDEx, collapse its duplicate edges and upload the result
//! as a new network.

use clap::{ArgAction, Parser};
use collapse::{collapse_network, CollapseError, CollapseSummary};
use ndex_client::{server_base_url, ClientError, NdexClient, NetworkStore};
use ndexcollapse_core::config::{ConfigError, NdexCredentials, CONFIG_FILE, DEFAULT_PROFILE};
use ndexcollapse_core::error::{CollapseToolError, ErrorCode};
use ndexcollapse_core::model::AttributeValue;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Network attribute pointing at the network a collapsed copy was made from.
pub const PROVENANCE_ATTRIBUTE: &str = "prov:wasDerivedFrom";
pub const FAILURE_EXIT_CODE: u8 = 2;

const LONG_ABOUT: &str = concat!(
    "Collapses parallel and reversed duplicate edges of an NDEx network into one edge ",
    "per (source, interaction, target) and uploads the result as a new network.\n\n",
    "Credentials are read from an INI file (default ~/.ndexutils.conf):\n\n",
    "    [<profile>]\n",
    "    user = <NDEx username>\n",
    "    password = <NDEx password>\n",
    "    server = <NDEx server, e.g. public.ndexbio.org>\n",
);

#[derive(Debug, Clone, Parser)]
#[command(
    name = "ndexcollapsenetwork",
    version,
    about = "Collapse duplicate edges of an NDEx network",
    long_about = LONG_ABOUT
)]
pub struct CliArgs {
    /// UUID of network to be collapsed
    #[arg(long)]
    pub uuid: String,

    /// Profile (section) of the configuration file holding NDEx credentials
    #[arg(long, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Configuration file to load (default ~/.ndexutils.conf)
    #[arg(long, value_name = "PATH")]
    pub conf: Option<PathBuf>,

    /// File of tracing filter directives; overrides -v
    #[arg(long, value_name = "PATH")]
    pub logconf: Option<PathBuf>,

    /// Increase logging to stderr: -v error, -vv warn, -vvv info, -vvvv debug, -vvvvv trace
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Collapse(#[from] CollapseError),
}

impl CollapseToolError for RunError {
    fn error_code(&self) -> ErrorCode {
        match self {
            RunError::Config(err) => err.error_code(),
            RunError::Client(err) => err.error_code(),
            RunError::Collapse(err) => err.error_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub summary: CollapseSummary,
    pub derived_from: String,
    pub uploaded_url: String,
}

/// Web page URL of a network on `server`.
pub fn parent_network_url(server: &str, network_id: &str) -> String {
    format!("{}/#/network/{}", server_base_url(server), network_id)
}

/// Fetch, collapse, stamp provenance and upload. Nothing is uploaded if any step
/// before the upload fails.
pub async fn collapse_and_upload(
    store: &dyn NetworkStore,
    server: &str,
    network_id: &str,
) -> Result<RunReport, RunError> {
    let mut network = store.fetch(network_id).await?;
    let summary = collapse_network(&mut network)?;

    let derived_from = parent_network_url(server, network_id);
    network.set_network_attribute(
        PROVENANCE_ATTRIBUTE,
        AttributeValue::scalar(derived_from.as_str()),
        None,
    );

    let uploaded_url = store.upload(&network).await?;
    info!(%uploaded_url, %derived_from, "uploaded collapsed network");

    Ok(RunReport {
        summary,
        derived_from,
        uploaded_url,
    })
}

pub async fn run(args: &CliArgs) -> Result<RunReport, RunError> {
    let credentials = NdexCredentials::load(args.conf.as_deref(), &args.profile)?;
    let client = NdexClient::new(&credentials)?;
    collapse_and_upload(&client, &credentials.server, &args.uuid).await
}

/// One-line description of where credentials are expected, for error output.
pub fn config_hint(args: &CliArgs) -> String {
    match &args.conf {
        Some(path) => format!("profile [{}] in {}", args.profile, path.display()),
        None => format!("profile [{}] in ~/{}", args.profile, CONFIG_FILE),
    }
}
