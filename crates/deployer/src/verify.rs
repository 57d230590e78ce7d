use {
    crate::{Error, abi, contract::ContractHandle},
    tracing::instrument,
};

/// A getter call together with the value it must return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub method: String,
    pub args: Vec<String>,
    /// Compared against the rendered output, see [`abi::render`].
    pub expected: String,
}

impl Expectation {
    pub fn new(method: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
            expected: expected.into(),
        }
    }
}

/// Calls the getter and checks its result. Returns the rendered value on
/// success.
#[instrument(skip_all, fields(method = %expectation.method, address = %handle.address()))]
pub async fn verify(handle: &ContractHandle, expectation: &Expectation) -> Result<String, Error> {
    let values = handle
        .call_with_strings(&expectation.method, &expectation.args)
        .await?;
    let actual = abi::render(&values);
    if actual != expectation.expected {
        return Err(Error::Assertion {
            method: expectation.method.clone(),
            expected: expectation.expected.clone(),
            actual,
        });
    }
    tracing::info!(value = %actual, "verified");
    Ok(actual)
}
