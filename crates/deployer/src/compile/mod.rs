//! Turns contract source code into deployable bytecode and its ABI.

mod node;
mod solc;

pub use {node::NodeCompiler, solc::SolcCompiler};
use {
    crate::{Error, source::ContractSource},
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Serialize,
};

/// Output of compiling a single contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledArtifact {
    pub name: String,
    pub bytecode: Bytes,
    pub abi: JsonAbi,
}

#[async_trait::async_trait]
pub trait Compiler: Send + Sync {
    /// Compiles every contract defined in `source`. Invalid source results in
    /// [`Error::Compilation`] carrying the compiler's diagnostics.
    async fn compile(&self, source: &ContractSource) -> Result<Vec<CompiledArtifact>, Error>;
}

/// Picks the contract to deploy out of everything a source file defines:
/// the one called `name` if given, otherwise the only contract, otherwise the
/// one named like the source file.
pub fn select(
    mut artifacts: Vec<CompiledArtifact>,
    name: Option<&str>,
    source: &ContractSource,
) -> Result<CompiledArtifact, Error> {
    let found = artifacts
        .iter()
        .map(|artifact| artifact.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let wanted = match (name, artifacts.len()) {
        (Some(name), _) => name,
        (None, 0) => {
            return Err(Error::Compilation(format!(
                "{:?} does not define any contract",
                source.path
            )));
        }
        (None, 1) => return Ok(artifacts.swap_remove(0)),
        (None, _) => source.stem().ok_or_else(|| {
            Error::Compilation(format!(
                "source defines multiple contracts ({found}), select one by name"
            ))
        })?,
    };
    artifacts
        .into_iter()
        .find(|artifact| artifact.name == wanted)
        .ok_or_else(|| {
            Error::Compilation(format!(
                "{:?} does not define contract {wanted} (found: {found})",
                source.path
            ))
        })
}
