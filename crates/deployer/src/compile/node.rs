use {
    super::{CompiledArtifact, Compiler},
    crate::{
        Error,
        node::{Node, NodeError},
        source::ContractSource,
    },
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Deserialize,
    std::{collections::BTreeMap, sync::Arc},
};

/// Compiles through the node's `eth_compileSolidity` endpoint. Only legacy
/// nodes (e.g. old geth releases and testrpc) offer it.
pub struct NodeCompiler {
    node: Arc<dyn Node>,
}

impl NodeCompiler {
    pub fn new(node: Arc<dyn Node>) -> Self {
        Self { node }
    }
}

#[async_trait::async_trait]
impl Compiler for NodeCompiler {
    async fn compile(&self, source: &ContractSource) -> Result<Vec<CompiledArtifact>, Error> {
        let output = self
            .node
            .compile_solidity(&source.text)
            .await
            .map_err(|err| match err {
                NodeError::Rejected { message, .. } => Error::Compilation(message),
                err => err.into(),
            })?;
        parse_output(output, source.stem().unwrap_or("Contract"))
    }
}

/// Nodes return either a single contract or a map keyed by contract name.
#[derive(Deserialize)]
#[serde(untagged)]
enum Output {
    Single(Contract),
    Named(BTreeMap<String, Contract>),
}

#[derive(Deserialize)]
struct Contract {
    code: Bytes,
    info: Info,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Info {
    abi_definition: JsonAbi,
}

fn parse_output(
    output: serde_json::Value,
    default_name: &str,
) -> Result<Vec<CompiledArtifact>, Error> {
    let output: Output = serde_json::from_value(output)
        .map_err(|err| NodeError::Malformed(format!("eth_compileSolidity: {err}")))?;
    let artifact = |name: String, contract: Contract| CompiledArtifact {
        name,
        bytecode: contract.code,
        abi: contract.info.abi_definition,
    };
    Ok(match output {
        Output::Single(contract) => vec![artifact(default_name.to_string(), contract)],
        Output::Named(contracts) => contracts
            .into_iter()
            .map(|(name, contract)| artifact(name, contract))
            .collect(),
    })
}
