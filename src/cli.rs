use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use crate::catalog::ValuesArgs;
use crate::chart::ChartArgs;
use crate::config::ClientConfig;
use crate::constants::{DEFAULT_API_BASE, REQUEST_TIMEOUT_SECS};
use crate::label::LabelArgs;
use crate::labels::{LabelFormatter, LabelMap};
use crate::logging;
use crate::query::QueryArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Pivot table toolkit for health statistics")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Base URL of the pivot API
    #[arg(long, global = true, env = "TABLERO_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// JSON file of extra `CODE: Label` pairs layered over the builtin labels
    #[arg(long, global = true, env = "TABLERO_LABELS")]
    pub labels: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl GlobalArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }

    pub fn formatter(&self) -> Result<LabelFormatter> {
        let mut labels = LabelMap::builtin();
        if let Some(path) = &self.labels {
            let overrides = LabelMap::from_path(path)?;
            logging::info(
                "labels_loaded",
                "label overrides applied",
                logging::metadata_from_pairs(&[
                    ("path", json!(path.display().to_string())),
                    ("entries", json!(overrides.len())),
                ]),
            );
            labels = labels.with_overrides(overrides);
        }
        Ok(LabelFormatter::new(Arc::new(labels)))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Format raw column identifiers into display labels
    Label(LabelArgs),
    /// List the dimensions and measures offered by the API
    Catalog,
    /// List the values of one dimension
    Values(ValuesArgs),
    /// Run a pivot query and print or export the table
    Query(QueryArgs),
    /// Run a pivot query and render one measure as an ASCII chart
    Chart(ChartArgs),
}
