//! Compiles solidity contracts, deploys them to a node over JSON-RPC and
//! checks the deployed instances.
//!
//! The pipeline is `compile -> deploy -> bind -> call/verify`:
//! [`compile::Compiler`] produces [`compile::CompiledArtifact`]s,
//! [`deploy::Deployer`] submits one and waits for it to be mined,
//! [`contract::bind`] turns the resulting address into a
//! [`contract::ContractHandle`] and [`verify::verify`] checks a getter.

pub mod abi;
pub mod arguments;
pub mod artifacts;
pub mod compile;
pub mod config;
pub mod confirmation;
pub mod contract;
pub mod deploy;
mod error;
pub mod node;
pub mod source;
#[cfg(test)]
mod testing;
pub mod verify;

pub use error::{ArgumentError, Error};
use {
    alloy::{json_abi::JsonAbi, primitives::Address},
    anyhow::Context,
    arguments::{
        Arguments,
        CallArguments,
        Command,
        CompilerArguments,
        CompilerKind,
        DeployArguments,
        InstanceArguments,
        VerifyArguments,
    },
    artifacts::{ArtifactStore, NetworkDeployment},
    compile::{Compiler, NodeCompiler, SolcCompiler},
    config::{Config, Sender},
    contract::ContractHandle,
    deploy::{DeployOptions, Deployer},
    node::{AlloyNode, Node},
    source::ContractSource,
    std::{path::Path, sync::Arc},
    tokio_util::sync::CancellationToken,
    verify::Expectation,
};

/// Exit code of the process for a failed run.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>().map(Error::exit_code).unwrap_or(1)
}

/// Runs the command given on the command line and returns what it prints.
/// Waiting for transactions stops once `cancel` fires.
pub async fn run(args: Arguments, cancel: CancellationToken) -> anyhow::Result<String> {
    let config = Config::new(&args);
    let result = execute(&config, &args.command, &cancel).await;
    if let Some(path) = &args.metrics_output {
        if let Err(err) = observe::metrics::write_to_file(path).await {
            tracing::warn!(?err, ?path, "failed to write metrics");
        }
    }
    result
}

async fn execute(
    config: &Config,
    command: &Command,
    cancel: &CancellationToken,
) -> anyhow::Result<String> {
    match command {
        Command::Compile(command) => {
            let connection = match command.compiler {
                CompilerKind::Node => Some(connect(config).await?),
                CompilerKind::Solc => None,
            };
            run_compile(command, connection.as_ref()).await
        }
        Command::Deploy(command) => {
            run_deploy(config, command, connect(config).await?, cancel).await
        }
        Command::Call(command) => run_call(config, command, connect(config).await?).await,
        Command::Verify(command) => run_verify(config, command, connect(config).await?).await,
    }
}

/// A node that answered `eth_chainId`.
pub struct Connection {
    pub node: Arc<dyn Node>,
    pub chain_id: u64,
}

pub async fn connect(config: &Config) -> anyhow::Result<Connection> {
    let provider = match &config.sender {
        Sender::Local(signer) => {
            ethrpc::alloy::provider_with_signer(&config.node_url, &config.ethrpc, signer.clone())?
        }
        Sender::Node(_) => ethrpc::alloy::provider(&config.node_url, &config.ethrpc)?,
    };
    let node = Arc::new(AlloyNode(provider));
    let chain_id = node.chain_id().await.map_err(Error::from)?;
    tracing::info!(url = %config.node_url, chain_id, "connected to node");
    Ok(Connection { node, chain_id })
}

/// Account that signs the submitted transactions.
pub async fn sender_address(config: &Config, node: &dyn Node) -> anyhow::Result<Address> {
    match &config.sender {
        Sender::Local(signer) => Ok(signer.address()),
        Sender::Node(Some(address)) => Ok(*address),
        Sender::Node(None) => node
            .accounts()
            .await
            .map_err(Error::from)?
            .first()
            .copied()
            .context("node manages no accounts, pass --sender or --private-key"),
    }
}

async fn compile_source(
    args: &CompilerArguments,
    node: Option<&Arc<dyn Node>>,
) -> anyhow::Result<(ContractSource, Vec<compile::CompiledArtifact>)> {
    let source = ContractSource::load(&args.source).await?;
    let compiler: Box<dyn Compiler> = match (args.compiler, node) {
        (CompilerKind::Solc, _) => Box::new(SolcCompiler::new(&args.solc_path)),
        (CompilerKind::Node, Some(node)) => Box::new(NodeCompiler::new(node.clone())),
        (CompilerKind::Node, None) => anyhow::bail!("compiling on the node needs a connection"),
    };
    let artifacts = compiler.compile(&source).await?;
    tracing::info!(
        path = ?source.path,
        contracts = ?artifacts.iter().map(|artifact| &artifact.name).collect::<Vec<_>>(),
        "compiled"
    );
    Ok((source, artifacts))
}

async fn run_compile(
    args: &CompilerArguments,
    connection: Option<&Connection>,
) -> anyhow::Result<String> {
    let (_, artifacts) =
        compile_source(args, connection.map(|connection| &connection.node)).await?;
    Ok(serde_json::to_string_pretty(&artifacts)?)
}

/// Returns the address of the deployed contract. Failures after the contract
/// was mined name its address since it is on chain regardless.
async fn run_deploy(
    config: &Config,
    args: &DeployArguments,
    connection: Connection,
    cancel: &CancellationToken,
) -> anyhow::Result<String> {
    let Connection { node, chain_id } = connection;
    let (source, artifacts) = compile_source(&args.compiler, Some(&node)).await?;
    let artifact = compile::select(artifacts, args.contract.as_deref(), &source)?;
    let options = DeployOptions {
        from: sender_address(config, node.as_ref()).await?,
        gas: config.gas_limit,
    };

    let receipt = Deployer::new(node.clone(), config.confirmation)
        .deploy(&artifact, &args.args, &options, cancel)
        .await?;
    let address = receipt.contract_address;
    let deployed_at = || format!("{} is deployed at {address}", artifact.name);

    let path = ArtifactStore::new(&config.artifacts_dir)
        .save(
            &artifact.name,
            &artifact.abi,
            chain_id,
            NetworkDeployment::from(&receipt),
        )
        .await
        .with_context(|| format!("{} but its deployment was not recorded", deployed_at()))?;
    tracing::info!(?path, "recorded deployment");

    if let (Some(method), Some(expected)) = (&args.expect_method, &args.expect) {
        let handle = contract::bind(address, artifact.abi.clone(), node);
        verify::verify(&handle, &Expectation::new(method, expected))
            .await
            .with_context(deployed_at)?;
    }
    Ok(address.to_string())
}

async fn instance(
    config: &Config,
    args: &InstanceArguments,
    connection: Connection,
) -> anyhow::Result<ContractHandle> {
    let (address, abi) = match (args.address, &args.abi) {
        (Some(address), Some(path)) => (address, load_abi(path).await?),
        _ => {
            ArtifactStore::new(&config.artifacts_dir)
                .deployed(&args.contract, connection.chain_id)
                .await?
        }
    };
    tracing::debug!(contract = %args.contract, %address, "bound instance");
    Ok(contract::bind(address, abi, connection.node))
}

async fn load_abi(path: &Path) -> Result<JsonAbi, Error> {
    let json = tokio::fs::read(path).await.map_err(|source| Error::Source {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&json)
        .map_err(|err| Error::Artifact(format!("{path:?} is not a contract ABI: {err}")))
}

async fn run_call(
    config: &Config,
    args: &CallArguments,
    connection: Connection,
) -> anyhow::Result<String> {
    let handle = instance(config, &args.instance, connection).await?;
    let values = handle.call_with_strings(&args.method, &args.args).await?;
    Ok(abi::render(&values))
}

async fn run_verify(
    config: &Config,
    args: &VerifyArguments,
    connection: Connection,
) -> anyhow::Result<String> {
    let handle = instance(config, &args.instance, connection).await?;
    let expectation = Expectation {
        method: args.method.clone(),
        args: args.args.clone(),
        expected: args.expected.clone(),
    };
    let actual = verify::verify(&handle, &expectation).await?;
    Ok(format!("{}() == {actual:?}", args.method))
}
