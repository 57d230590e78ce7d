use {
    super::{CompiledArtifact, Compiler},
    crate::{Error, source::ContractSource},
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Deserialize,
    std::{collections::BTreeMap, path::PathBuf, process::Stdio},
    tokio::{io::AsyncWriteExt, process::Command},
};

/// Compiles by running a local `solc` binary. The source is piped through
/// stdin so imports relative to the source file are not resolved.
pub struct SolcCompiler {
    program: PathBuf,
}

impl SolcCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SolcCompiler {
    fn default() -> Self {
        Self::new("solc")
    }
}

#[async_trait::async_trait]
impl Compiler for SolcCompiler {
    async fn compile(&self, source: &ContractSource) -> Result<Vec<CompiledArtifact>, Error> {
        let failed_to_run = |err: std::io::Error| {
            Error::Compilation(format!("failed to run {:?}: {err}", self.program))
        };

        let mut child = Command::new(&self.program)
            .args(["--combined-json", "abi,bin", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(failed_to_run)?;

        // solc reads all of stdin before writing anything, so this can't
        // deadlock on a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Compilation("solc stdin is not captured".to_string()))?;
        stdin
            .write_all(source.text.as_bytes())
            .await
            .map_err(failed_to_run)?;
        drop(stdin);

        let output = child.wait_with_output().await.map_err(failed_to_run)?;
        let diagnostics = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::Compilation(diagnostics.trim().to_string()));
        }
        if !diagnostics.trim().is_empty() {
            tracing::warn!(path = ?source.path, "solc: {}", diagnostics.trim());
        }
        parse_output(&output.stdout)
    }
}

#[derive(Deserialize)]
struct CombinedJson {
    contracts: BTreeMap<String, Contract>,
}

#[derive(Deserialize)]
struct Contract {
    abi: Abi,
    bin: String,
}

/// solc >= 0.8 emits the ABI as JSON, older releases as a JSON encoded
/// string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Abi {
    Json(JsonAbi),
    Encoded(String),
}

fn parse_output(stdout: &[u8]) -> Result<Vec<CompiledArtifact>, Error> {
    let malformed = |err: String| Error::Compilation(format!("unexpected solc output: {err}"));
    let output: CombinedJson =
        serde_json::from_slice(stdout).map_err(|err| malformed(err.to_string()))?;

    output
        .contracts
        .into_iter()
        .map(|(key, contract)| -> Result<_, Error> {
            // Keys look like `<stdin>:Hotel`.
            let name = key.rsplit(':').next().unwrap_or(&key).to_string();
            let abi = match contract.abi {
                Abi::Json(abi) => abi,
                Abi::Encoded(encoded) => {
                    serde_json::from_str(&encoded).map_err(|err| malformed(err.to_string()))?
                }
            };
            let bytecode = const_hex::decode(contract.bin.trim())
                .map_err(|err| malformed(format!("bytecode of {name}: {err}")))?;
            Ok(CompiledArtifact {
                name,
                bytecode: Bytes::from(bytecode),
                abi,
            })
        })
        .collect()
}
