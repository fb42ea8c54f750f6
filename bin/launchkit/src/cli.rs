use clap::Parser;
use tracing::level_filters::LevelFilter;

/// The default target network.
const DEFAULT_PROVIDER: RpcProvider = RpcProvider::Local;

/// Named RPC endpoints, or a custom URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum RpcProvider {
    Local,
    Sepolia,
    Mainnet,
    #[strum(default)]
    Custom(String),
}

impl RpcProvider {
    pub fn to_rpc_url(&self) -> anyhow::Result<url::Url> {
        let raw = match self {
            RpcProvider::Local => "http://localhost:8545",
            RpcProvider::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com",
            RpcProvider::Mainnet => "https://ethereum-rpc.publicnode.com",
            RpcProvider::Custom(url) => url.as_str(),
        };
        raw.parse()
            .map_err(|err| anyhow::anyhow!("Invalid RPC URL '{}': {}", raw, err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum OutData {
    TempDir,
    #[strum(default)]
    Path(String),
}

#[derive(Parser)]
#[command(name = "launchkit")]
#[command(
    author,
    version,
    about = "Deploy a token launch (token, vesting, crowdsale, staking) in one run"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "LAUNCH_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The target network, by name (local, sepolia, mainnet) or custom RPC URL.
    #[arg(short, long, alias = "rpc", env = "LAUNCH_NETWORK", default_value_t = DEFAULT_PROVIDER)]
    pub network: RpcProvider,

    /// The directory holding the compiled contract artifacts and the launch
    /// documents (distributions, whitelist, staking).
    #[arg(long, env = "LAUNCH_CONFIGS", default_value = "configs")]
    pub configs: String,

    /// The path to the output data directory.
    ///
    /// If not provided, the data will be stored at: ./launch-data
    #[arg(long, alias = "outdata", env = "LAUNCH_OUTDATA")]
    pub outdata: Option<OutData>,

    /// Include the staking contract in the launch.
    #[arg(long, env = "LAUNCH_STAKING", default_value_t = false)]
    pub staking: bool,

    /// Unix timestamp at which the crowdsale opens.
    ///
    /// Defaults to one day from now.
    #[arg(long, env = "LAUNCH_SALE_START")]
    pub sale_start: Option<u64>,

    /// Unix timestamp at which the crowdsale closes.
    ///
    /// Defaults to two weeks after the sale start.
    #[arg(long, env = "LAUNCH_SALE_END")]
    pub sale_end: Option<u64>,

    /// Unix timestamp at which the token becomes publicly transferable.
    ///
    /// Defaults to one day after the sale end.
    #[arg(long, env = "LAUNCH_PUBLISH_DATE")]
    pub publish_date: Option<u64>,

    /// Path to an existing Launchkit.toml configuration file to load.
    ///
    /// When provided, the run will use the configuration from this file
    /// instead of generating a new one from CLI arguments.
    #[arg(long, alias = "conf", env = "LAUNCH_CONFIG")]
    pub config: Option<String>,
}
