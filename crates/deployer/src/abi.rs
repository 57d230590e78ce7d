//! Conversions between user supplied values and the contract's ABI.

use {
    crate::ArgumentError,
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
        json_abi::{Function, JsonAbi, Param},
    },
};

/// Coerces raw string values positionally to the types of `params`, e.g.
/// `"19800"` to a `uint256`.
pub fn coerce_arguments(
    target: &str,
    params: &[Param],
    raw: &[String],
) -> Result<Vec<DynSolValue>, ArgumentError> {
    if params.len() != raw.len() {
        return Err(ArgumentError::Count {
            target: target.to_string(),
            expected: params.len(),
            actual: raw.len(),
        });
    }
    params
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(index, (param, value))| {
            let type_error = |reason: String| ArgumentError::Type {
                target: target.to_string(),
                index,
                name: param.name.clone(),
                ty: param.selector_type().into_owned(),
                value: value.clone(),
                reason,
            };
            let ty = param.resolve().map_err(|err| type_error(err.to_string()))?;
            ty.coerce_str(value).map_err(|err| type_error(err.to_string()))
        })
        .collect()
}

/// Coerces raw values to the parameters of the contract's constructor. A
/// contract without explicit constructor takes no arguments.
pub fn constructor_arguments(
    abi: &JsonAbi,
    raw: &[String],
) -> Result<Vec<DynSolValue>, ArgumentError> {
    let params = abi
        .constructor
        .as_ref()
        .map(|constructor| constructor.inputs.as_slice())
        .unwrap_or_default();
    coerce_arguments("constructor", params, raw)
}

/// ABI-encodes the constructor arguments that get appended to the creation
/// bytecode.
pub fn encode_constructor(abi: &JsonAbi, args: &[DynSolValue]) -> Result<Vec<u8>, ArgumentError> {
    match &abi.constructor {
        Some(constructor) => {
            if constructor.inputs.len() != args.len() {
                return Err(ArgumentError::Count {
                    target: "constructor".to_string(),
                    expected: constructor.inputs.len(),
                    actual: args.len(),
                });
            }
            constructor
                .abi_encode_input(args)
                .map_err(|err| ArgumentError::Encoding {
                    target: "constructor".to_string(),
                    reason: err.to_string(),
                })
        }
        None if args.is_empty() => Ok(Vec::new()),
        None => Err(ArgumentError::Count {
            target: "constructor".to_string(),
            expected: 0,
            actual: args.len(),
        }),
    }
}

/// Finds the overload of `method` that takes `arg_count` arguments.
pub fn resolve_function<'a>(
    abi: &'a JsonAbi,
    method: &str,
    arg_count: usize,
) -> Result<&'a Function, ArgumentError> {
    let overloads = abi
        .function(method)
        .filter(|overloads| !overloads.is_empty())
        .ok_or_else(|| ArgumentError::UnknownMethod(method.to_string()))?;
    overloads
        .iter()
        .find(|function| function.inputs.len() == arg_count)
        .ok_or_else(|| ArgumentError::Count {
            target: method.to_string(),
            expected: overloads[0].inputs.len(),
            actual: arg_count,
        })
}

/// Renders decoded return values the way a user would type them: strings
/// verbatim, numbers in decimal, addresses checksummed.
pub fn render(values: &[DynSolValue]) -> String {
    match values {
        [single] => render_value(single),
        values => format!("({})", render_list(values)),
    }
}

fn render_list(values: &[DynSolValue]) -> String {
    values
        .iter()
        .map(render_value)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Address(address) => address.to_checksum(None),
        DynSolValue::Bytes(bytes) => const_hex::encode_prefixed(bytes),
        DynSolValue::FixedBytes(word, size) => const_hex::encode_prefixed(&word[..*size]),
        DynSolValue::Function(function) => const_hex::encode_prefixed(function.as_slice()),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) => {
            format!("[{}]", render_list(values))
        }
        DynSolValue::Tuple(values) => format!("({})", render_list(values)),
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}
