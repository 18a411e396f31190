//! Utilities for the deploy scripts.

use alloy::{
    dyn_abi::DynSolValue,
    hex,
    json_abi::{Function, StateMutability},
};
use itertools::Itertools;

/// Render an ABI value the way deployment records store constructor arguments
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Bytes(bytes) => hex::encode_prefixed(bytes),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Function(function) => hex::encode_prefixed(function.as_slice()),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) => {
            format!("[{}]", values.iter().map(format_value).join(", "))
        }
        DynSolValue::Tuple(values) => {
            format!("({})", values.iter().map(format_value).join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}

/// Whether the function can be queried without arguments and without a transaction
pub fn is_introspective(function: &Function) -> bool {
    function.inputs.is_empty()
        && matches!(
            function.state_mutability,
            StateMutability::View | StateMutability::Pure
        )
}
