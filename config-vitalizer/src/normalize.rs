//! Coercions that absorb representational looseness in input trees.
//!
//! Every function here is total and idempotent: a node that cannot be
//! coerced comes back unchanged, and a coerced node is already in the target
//! shape, so coercing it again is a no-op.

use config_node::{ConfigNode, Scalar};

/// Render any scalar as a string scalar.
pub fn to_string_scalar(node: ConfigNode) -> ConfigNode {
    match node {
        ConfigNode::Scalar(Scalar::String(_)) => node,
        ConfigNode::Scalar(scalar) => ConfigNode::string(scalar.to_string()),
        other => other,
    }
}

/// Parse numeric strings and integral floats as integers.
pub fn to_integer(node: ConfigNode) -> ConfigNode {
    match node {
        ConfigNode::Scalar(Scalar::String(ref raw)) => match raw.trim().parse::<i64>() {
            Ok(value) => ConfigNode::integer(value),
            Err(_) => node,
        },
        ConfigNode::Scalar(Scalar::Float(value))
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            ConfigNode::integer(value as i64)
        }
        other => other,
    }
}

/// Parse numeric strings and widen integers to floats.
pub fn to_float(node: ConfigNode) -> ConfigNode {
    match node {
        ConfigNode::Scalar(Scalar::String(ref raw)) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => ConfigNode::float(value),
            _ => node,
        },
        ConfigNode::Scalar(Scalar::Integer(value)) => ConfigNode::float(value as f64),
        other => other,
    }
}

/// Accept `true`/`false` in any case and `1`/`0` as booleans.
pub fn to_bool(node: ConfigNode) -> ConfigNode {
    let parsed = match &node {
        ConfigNode::Scalar(Scalar::String(raw)) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        ConfigNode::Scalar(Scalar::Integer(1)) => Some(true),
        ConfigNode::Scalar(Scalar::Integer(0)) => Some(false),
        _ => None,
    };
    parsed.map_or(node, ConfigNode::boolean)
}

/// Replace `Null` with `empty`.
pub fn null_to(node: ConfigNode, empty: ConfigNode) -> ConfigNode {
    if node.is_null() {
        empty
    } else {
        node
    }
}

/// `Null` becomes an empty sequence and a lone item a one-element sequence.
pub fn to_sequence(node: ConfigNode) -> ConfigNode {
    match node {
        ConfigNode::Null => ConfigNode::empty_sequence(),
        ConfigNode::Sequence(_) => node,
        single => ConfigNode::Sequence(vec![single]),
    }
}
