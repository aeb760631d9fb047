use config_node::ConfigNode;
use config_vitalizer::{ConfigError, ConfigValue, ErrorKind, PropertyDescriptor, Registry};
use pretty_assertions::assert_eq;

fn string_to_integer() -> PropertyDescriptor {
    PropertyDescriptor::map(PropertyDescriptor::string(), PropertyDescriptor::integer())
}

#[test]
fn encode_orders_keys_canonically() {
    let registry = Registry::with_defaults();
    let prop = string_to_integer();

    let inserted_b_first = ConfigValue::map_of([
        (ConfigValue::string("b"), ConfigValue::Integer(2)),
        (ConfigValue::string("a"), ConfigValue::Integer(1)),
    ]);
    let inserted_a_first = ConfigValue::map_of([
        (ConfigValue::string("a"), ConfigValue::Integer(1)),
        (ConfigValue::string("b"), ConfigValue::Integer(2)),
    ]);

    let node = registry.encode(&inserted_b_first, &prop).expect("encode");
    let keys: Vec<&String> = node.as_mapping().expect("mapping").keys().collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(node.to_string(), r#"{"a":1,"b":2}"#);
    assert_eq!(
        registry.encode(&inserted_a_first, &prop).expect("encode"),
        node
    );
}

#[test]
fn null_normalizes_to_empty_mapping_and_decodes_to_empty_map() {
    let registry = Registry::with_defaults();
    let prop = string_to_integer();

    let normalized = registry.normalize(ConfigNode::Null, &prop).expect("normalize");
    assert_eq!(normalized, ConfigNode::empty_mapping());

    let value = registry.decode(&normalized, &prop).expect("decode");
    assert_eq!(value, ConfigValue::map_of([]));

    assert_eq!(
        registry.decode(&ConfigNode::Null, &prop).expect("decode null"),
        ConfigValue::map_of([])
    );
}

#[test]
fn sequence_node_is_a_type_mismatch() {
    let registry = Registry::with_defaults();
    let node = ConfigNode::Sequence(vec![ConfigNode::integer(1), ConfigNode::integer(2)]);

    let err = registry
        .decode(&node, &string_to_integer())
        .expect_err("sequence is not a mapping");
    assert_eq!(
        err,
        ConfigError::TypeMismatch {
            expected: "mapping".to_string(),
            found: "sequence".to_string(),
        }
    );
}

#[test]
fn failing_entry_is_reported_by_key() {
    let registry = Registry::with_defaults();
    let node = ConfigNode::from_entries([
        ("a", ConfigNode::integer(1)),
        ("b", ConfigNode::string("not a number")),
        ("c", ConfigNode::integer(3)),
    ]);

    let err = registry
        .decode(&node, &string_to_integer())
        .expect_err("b does not decode");
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(err.path().to_string(), "/b");
    assert_eq!(
        err.root_cause(),
        &ConfigError::TypeMismatch {
            expected: "integer".to_string(),
            found: "string".to_string(),
        }
    );
}

#[test]
fn nested_failures_carry_the_full_path() {
    let registry = Registry::with_defaults();
    let prop = PropertyDescriptor::map(
        PropertyDescriptor::string(),
        PropertyDescriptor::list(PropertyDescriptor::boolean()),
    );
    let node = ConfigNode::from_entries([(
        "flags",
        ConfigNode::Sequence(vec![ConfigNode::boolean(true), ConfigNode::string("maybe")]),
    )]);

    let err = registry.decode(&node, &prop).expect_err("maybe is not a bool");
    assert_eq!(err.path().to_string(), "/flags/1");
    assert_eq!(err.root_cause().kind(), ErrorKind::TypeMismatch);
}

#[test]
fn decode_then_encode_round_trips() {
    let registry = Registry::with_defaults();
    let prop = string_to_integer();
    let node = ConfigNode::from_entries([
        ("dicom", ConfigNode::integer(104)),
        ("dicom-tls", ConfigNode::integer(2762)),
    ]);

    let value = registry.decode(&node, &prop).expect("decode");
    let encoded = registry.encode(&value, &prop).expect("encode");
    assert_eq!(encoded, node);
    assert_eq!(
        registry
            .encode(&registry.decode(&encoded, &prop).expect("decode again"), &prop)
            .expect("encode again"),
        encoded
    );
}

#[test]
fn keys_and_values_are_coerced_before_decoding() {
    let registry = Registry::with_defaults();
    let prop = PropertyDescriptor::map(PropertyDescriptor::integer(), PropertyDescriptor::boolean());
    let node = ConfigNode::from_entries([
        ("1", ConfigNode::string("true")),
        ("2", ConfigNode::integer(0)),
    ]);

    let value = registry.decode(&node, &prop).expect("decode");
    assert_eq!(
        value,
        ConfigValue::map_of([
            (ConfigValue::Integer(1), ConfigValue::Bool(true)),
            (ConfigValue::Integer(2), ConfigValue::Bool(false)),
        ])
    );
}

#[test]
fn schema_describes_key_and_value_types() {
    let registry = Registry::with_defaults();
    let schema = registry.schema(&string_to_integer()).expect("schema");

    let expected = ConfigNode::from_entries([
        ("type", ConfigNode::string("object")),
        ("class", ConfigNode::string("Map")),
        (
            "mapkey",
            ConfigNode::from_entries([
                ("type", ConfigNode::string("string")),
                ("class", ConfigNode::string("String")),
            ]),
        ),
        (
            "properties",
            ConfigNode::from_entries([(
                "*",
                ConfigNode::from_entries([
                    ("type", ConfigNode::string("integer")),
                    ("class", ConfigNode::string("Integer")),
                ]),
            )]),
        ),
    ]);
    assert_eq!(schema, expected);
}

#[test]
fn map_without_parameters_is_malformed() {
    let registry = Registry::with_defaults();
    let prop = PropertyDescriptor::new(config_vitalizer::PropertyKind::Map, Vec::new());

    let err = registry
        .decode(&ConfigNode::empty_mapping(), &prop)
        .expect_err("no key parameter");
    assert_eq!(err.kind(), ErrorKind::MalformedDescriptor);
}

#[test]
fn keys_colliding_after_encoding_are_rejected() {
    let registry = Registry::with_defaults();
    let prop = PropertyDescriptor::map(PropertyDescriptor::enumeration(["A"]), PropertyDescriptor::integer());
    // An enum adapter accepts both String and Enum values and renders them the same way.
    let value = ConfigValue::map_of([
        (ConfigValue::string("A"), ConfigValue::Integer(1)),
        (ConfigValue::Enum("A".to_string()), ConfigValue::Integer(2)),
    ]);

    let err = registry.encode(&value, &prop).expect_err("duplicate key");
    assert_eq!(err.path().to_string(), "/A");
    assert_eq!(err.root_cause().kind(), ErrorKind::InvalidValue);
}

#[test]
fn raw_keys_colliding_after_decoding_are_rejected() {
    let registry = Registry::with_defaults();
    let prop = PropertyDescriptor::map(PropertyDescriptor::integer(), PropertyDescriptor::string());
    let node = ConfigNode::from_entries([
        ("01", ConfigNode::string("first")),
        ("1", ConfigNode::string("second")),
    ]);

    let err = registry.decode(&node, &prop).expect_err("01 and 1 are the same key");
    assert_eq!(err.path().to_string(), "/1");
    assert_eq!(
        err.root_cause(),
        &ConfigError::invalid("distinct keys decode to the same key")
    );
}

#[test]
fn boolean_keys_spelled_two_ways_are_rejected() {
    let registry = Registry::with_defaults();
    let prop = PropertyDescriptor::map(PropertyDescriptor::boolean(), PropertyDescriptor::integer());
    let node = ConfigNode::from_entries([
        ("1", ConfigNode::integer(1)),
        ("true", ConfigNode::integer(2)),
    ]);

    let err = registry.decode(&node, &prop).expect_err("1 and true collide");
    assert_eq!(err.root_cause().kind(), ErrorKind::InvalidValue);
}

#[test]
fn non_finite_float_keys_cannot_be_encoded() {
    let registry = Registry::with_defaults();
    let prop = PropertyDescriptor::map(PropertyDescriptor::float(), PropertyDescriptor::integer());

    for key in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let value = ConfigValue::map_of([(ConfigValue::Float(key), ConfigValue::Integer(1))]);
        let err = registry.encode(&value, &prop).expect_err("non-finite key");
        assert_eq!(
            err.root_cause(),
            &ConfigError::invalid("map keys must be finite numbers")
        );
    }

    let finite = ConfigValue::map_of([(ConfigValue::Float(1.5), ConfigValue::Integer(1))]);
    let node = registry.encode(&finite, &prop).expect("finite key");
    assert_eq!(registry.decode(&node, &prop).expect("decode"), finite);
}
