use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Where series and the mapping table are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    S3,
    Fs,
}

#[derive(Parser, Debug)]
#[command(
    name = "chartfeed",
    version,
    about = "Historical + live chart series for NSE instruments"
)]
pub struct Cli {
    /// Object store backend.
    #[arg(long, env = "CHARTFEED_STORE", value_enum, default_value_t = StoreKind::S3)]
    pub store: StoreKind,

    /// Root directory for the `fs` backend (`{root}/{bucket}/{key}`).
    #[arg(long, env = "CHARTFEED_FS_ROOT", default_value = "data")]
    pub fs_root: PathBuf,

    /// AWS region for the `s3` backend.
    #[arg(long, env = "AWS_REGION", default_value = "ap-south-1")]
    pub region: String,

    /// Custom S3-compatible endpoint.
    #[arg(long, env = "CHARTFEED_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Dhan client id. Live quotes are disabled without it.
    #[arg(long, env = "DHAN_CLIENT_ID", hide_env_values = true)]
    pub dhan_client_id: Option<String>,

    /// Dhan access token. Live quotes are disabled without it.
    #[arg(long, env = "DHAN_ACCESS_TOKEN", hide_env_values = true)]
    pub dhan_access_token: Option<String>,

    /// Override the Dhan API root.
    #[arg(long, env = "DHAN_BASE_URL")]
    pub dhan_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the stock list from the mapping table.
    Mapping {
        /// Reload the table from storage first.
        #[arg(long, default_value_t = false)]
        reload: bool,
    },
    /// Resolve a ticker symbol to its instrument record.
    Lookup { symbol: String },
    /// Print the chart series for an instrument id or symbol.
    Series {
        /// Numeric instrument id, or a ticker symbol.
        target: String,
    },
    /// Refresh live quotes.
    Refresh {
        /// Refetch even if the cache is fresh.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print live cache status.
    Status,
    /// Upload a local file to the configured bucket.
    Upload {
        /// Local file to upload.
        file: PathBuf,
        /// Destination key, e.g. `eod_data/1333.csv`.
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::try_parse_from(["chartfeed", "--store", "fs", "refresh", "--force"]).unwrap();
        assert_eq!(cli.store, StoreKind::Fs);
        assert!(matches!(cli.command, Command::Refresh { force: true }));

        let cli = Cli::try_parse_from(["chartfeed", "series", "RELIANCE"]).unwrap();
        assert!(matches!(cli.command, Command::Series { ref target } if target == "RELIANCE"));
    }
}
