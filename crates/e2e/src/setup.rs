use {
    crate::local_node::{NODE_HOST, Resetter},
    alloy::primitives::Address,
    deployer::{
        Error,
        compile::{self, CompiledArtifact, Compiler, SolcCompiler},
        confirmation::Confirmation,
        deploy::{DeployOptions, Deployer, DeploymentReceipt},
        node::{AlloyNode, Node},
        source::ContractSource,
    },
    ethrpc::AlloyProvider,
    futures::FutureExt,
    std::{
        future::Future,
        panic::{self, AssertUnwindSafe},
        sync::{Arc, Mutex},
        time::Duration,
    },
    tokio_util::sync::CancellationToken,
};

pub const HOTEL_SOURCE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/contracts/Hotel.sol");

/// Gas limit of the deployments made by the tests.
pub const GAS_LIMIT: u64 = 4_700_000;

/// Reasonable default timeout for waiting on transactions. Local nodes mine
/// instantly but CI machines can be slow.
pub const TIMEOUT: Duration = Duration::from_secs(30);

pub fn hotel_args() -> Vec<String> {
    [
        "Ethereum Hotel",
        "Book rooms with ease",
        "12.9716",
        "77.5946",
        "19800",
    ]
    .map(String::from)
    .to_vec()
}

/// Connection to the test node plus the accounts it manages.
pub struct Onchain {
    pub provider: AlloyProvider,
    pub node: Arc<dyn Node>,
    pub chain_id: u64,
    pub accounts: Vec<Address>,
}

impl Onchain {
    /// The account deploying contracts, and hence owning them.
    pub fn owner(&self) -> Address {
        self.accounts[0]
    }

    pub fn options(&self, gas: u64) -> DeployOptions {
        DeployOptions {
            from: self.owner(),
            gas,
        }
    }

    pub fn confirmation(&self) -> Confirmation {
        Confirmation {
            timeout: TIMEOUT,
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn deployer(&self) -> Deployer {
        Deployer::new(self.node.clone(), self.confirmation())
    }

    pub async fn compile(&self, source: &ContractSource) -> Result<CompiledArtifact, Error> {
        let artifacts = SolcCompiler::default().compile(source).await?;
        compile::select(artifacts, None, source)
    }

    pub async fn compile_hotel(&self) -> CompiledArtifact {
        let source = ContractSource::load(HOTEL_SOURCE).await.unwrap();
        self.compile(&source).await.unwrap()
    }

    pub async fn deploy(
        &self,
        artifact: &CompiledArtifact,
        args: &[String],
        gas: u64,
    ) -> Result<DeploymentReceipt, Error> {
        self.deployer()
            .deploy(artifact, args, &self.options(gas), &CancellationToken::new())
            .await
    }
}

static NODE_MUTEX: Mutex<()> = Mutex::new(());

/// *Testing* function that takes a closure and runs it on a local testing
/// node. Before each test, it creates a snapshot of the current state of the
/// chain. The saved state is restored at the end of the test.
///
/// This function also initializes tracing.
///
/// Note that tests calling with this function will not be run simultaneously.
pub async fn run_test<F, Fut>(f: F)
where
    F: FnOnce(Onchain) -> Fut,
    Fut: Future<Output = ()>,
{
    observe::tracing::initialize_reentrant("warn,deployer=debug,ethrpc=debug,e2e=debug");

    // One test at a time on the node. A panicking test poisons the mutex,
    // which is fine since only the lock itself matters.
    let _lock = NODE_MUTEX.lock();

    let provider =
        ethrpc::alloy::provider(&NODE_HOST.parse::<url::Url>().unwrap(), &ethrpc::Config::default())
            .unwrap();
    let node = Arc::new(AlloyNode(provider.clone()));
    let chain_id = node.chain_id().await.expect("test node is not running");
    let accounts = node.accounts().await.unwrap();
    assert!(!accounts.is_empty(), "test node manages no accounts");
    let resetter = Resetter::new(&provider).await;

    let onchain = Onchain {
        provider,
        node,
        chain_id,
        accounts,
    };

    // Not every panic unwinds through here, in which case the chain keeps the
    // test's state until the node restarts.
    let result = AssertUnwindSafe(f(onchain)).catch_unwind().await;

    resetter.reset().await;

    if let Err(err) = result {
        panic::resume_unwind(err);
    }
}
