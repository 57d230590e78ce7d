use {
    crate::{arguments::Arguments, confirmation::Confirmation},
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    std::path::PathBuf,
    url::Url,
};

/// Who signs submitted transactions.
#[derive(Debug, Clone)]
pub enum Sender {
    /// The node signs with one of its accounts, the first one if `None`.
    Node(Option<Address>),
    /// Transactions are signed locally and submitted raw.
    Local(PrivateKeySigner),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node_url: Url,
    pub ethrpc: ethrpc::Config,
    pub sender: Sender,
    pub gas_limit: u64,
    pub confirmation: Confirmation,
    pub artifacts_dir: PathBuf,
}

impl Config {
    pub fn new(args: &Arguments) -> Self {
        let sender = match &args.private_key {
            Some(signer) => Sender::Local(signer.clone()),
            None => Sender::Node(args.sender),
        };
        Self {
            node_url: args.node_url.clone(),
            ethrpc: ethrpc::Config {
                http_timeout: args.http_timeout,
                label: "deployer".to_string(),
            },
            sender,
            gas_limit: args.gas_limit,
            confirmation: Confirmation {
                timeout: args.confirmation_timeout,
                poll_interval: args.poll_interval,
            },
            artifacts_dir: args.artifacts_dir.clone(),
        }
    }
}

pub fn observe(args: &Arguments) -> observe::Config {
    observe::Config::new(
        &args.logging.log_filter,
        args.logging.log_stderr_threshold,
        args.logging.log_json,
    )
}
