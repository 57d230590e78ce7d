use {
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    clap::{Parser, Subcommand, ValueEnum},
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    url::Url,
};

#[derive(Parser)]
#[clap(version, about = "Compile, deploy and check smart contracts on a local node")]
pub struct Arguments {
    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Timeout of a single JSON-RPC request.
    #[clap(long, env, default_value = "10s", value_parser = humantime::parse_duration)]
    pub http_timeout: Duration,

    /// Node managed account that sends transactions. Defaults to the first
    /// account the node manages.
    #[clap(long, env, conflicts_with = "private_key")]
    pub sender: Option<Address>,

    /// Sign transactions locally with this key instead of letting the node
    /// sign them.
    #[clap(long, env)]
    pub private_key: Option<PrivateKeySigner>,

    /// Gas limit of every submitted transaction.
    #[clap(long, env, default_value = "4700000")]
    pub gas_limit: u64,

    /// How long to wait for a submitted transaction to be mined.
    #[clap(long, env, default_value = "2m", value_parser = humantime::parse_duration)]
    pub confirmation_timeout: Duration,

    /// How often to poll for the receipt of a submitted transaction.
    #[clap(long, env, default_value = "500ms", value_parser = humantime::parse_duration)]
    pub poll_interval: Duration,

    /// Directory of the deployment records.
    #[clap(long, env, default_value = "build/deployments")]
    pub artifacts_dir: PathBuf,

    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Write the RPC metrics in the Prometheus text format to this file on
    /// exit.
    #[clap(long, env)]
    pub metrics_output: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Args)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,deployer=info,ethrpc=info")]
    pub log_filter: String,

    /// Events at or above this level go to stderr, everything else to
    /// stdout. Everything goes to stderr if unset, leaving stdout to the
    /// command's output.
    #[clap(long, env)]
    pub log_stderr_threshold: Option<tracing::Level>,

    /// Log JSON lines instead of human readable text.
    #[clap(long, env)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile a source file and print its contracts as JSON.
    Compile(CompilerArguments),
    /// Compile and deploy a contract, then optionally check a getter.
    Deploy(DeployArguments),
    /// Call a read-only method of a deployed contract and print the result.
    Call(CallArguments),
    /// Check that a getter of a deployed contract returns the expected value.
    Verify(VerifyArguments),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CompilerKind {
    /// The node's `eth_compileSolidity` endpoint.
    Node,
    /// A local `solc` binary.
    Solc,
}

#[derive(clap::Args)]
pub struct CompilerArguments {
    /// Solidity source file.
    #[clap(long)]
    pub source: PathBuf,

    #[clap(long, value_enum, default_value = "solc")]
    pub compiler: CompilerKind,

    #[clap(long, default_value = "solc")]
    pub solc_path: PathBuf,
}

#[derive(clap::Args)]
pub struct DeployArguments {
    #[clap(flatten)]
    pub compiler: CompilerArguments,

    /// Contract to deploy if the source defines several.
    #[clap(long)]
    pub contract: Option<String>,

    /// Constructor argument, repeated once per parameter in order.
    #[clap(long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Getter to call on the deployed contract.
    #[clap(long, requires = "expect")]
    pub expect_method: Option<String>,

    /// Value the getter must return.
    #[clap(long, requires = "expect_method")]
    pub expect: Option<String>,
}

#[derive(clap::Args)]
pub struct InstanceArguments {
    /// Name of the deployed contract.
    #[clap(long)]
    pub contract: String,

    /// Address of the instance, instead of the recorded one.
    #[clap(long, requires = "abi")]
    pub address: Option<Address>,

    /// ABI JSON file of the instance at `--address`.
    #[clap(long, requires = "address")]
    pub abi: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CallArguments {
    #[clap(flatten)]
    pub instance: InstanceArguments,

    pub method: String,

    #[clap(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(clap::Args)]
pub struct VerifyArguments {
    #[clap(flatten)]
    pub instance: InstanceArguments,

    pub method: String,

    #[clap(long)]
    pub expected: String,

    #[clap(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            node_url,
            http_timeout,
            sender,
            private_key,
            gas_limit,
            confirmation_timeout,
            poll_interval,
            artifacts_dir,
            logging,
            metrics_output,
            command: _,
        } = self;

        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "http_timeout: {http_timeout:?}")?;
        display_option(f, "sender", sender)?;
        display_option(
            f,
            "private_key",
            &private_key.as_ref().map(|signer| format!("SECRET ({})", signer.address())),
        )?;
        writeln!(f, "gas_limit: {gas_limit}")?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        writeln!(f, "poll_interval: {poll_interval:?}")?;
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "log_filter: {}", logging.log_filter)?;
        display_option(f, "log_stderr_threshold", &logging.log_stderr_threshold)?;
        writeln!(f, "log_json: {}", logging.log_json)?;
        display_option(
            f,
            "metrics_output",
            &metrics_output.as_ref().map(|path| path.display()),
        )?;
        Ok(())
    }
}

fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}
