use config_node::{from_json_str, ConfigNode};
use config_vitalizer::adapters::reference_node;
use config_vitalizer::{
    ConfigError, ConfigValue, ErrorKind, ObjectType, PropertyDescriptor, Registry,
};
use pretty_assertions::assert_eq;

fn device_registry() -> Registry {
    let mut registry = Registry::with_defaults();
    registry.register_object(
        ObjectType::new("Connection")
            .field("cn", PropertyDescriptor::string().required())
            .field("hostname", PropertyDescriptor::string().required())
            .field(
                "port",
                PropertyDescriptor::integer()
                    .with_default(ConfigNode::integer(104))
                    .with_description("TCP port the connection listens on"),
            )
            .field("installed", PropertyDescriptor::boolean()),
    );
    registry.register_object(
        ObjectType::new("TransferCapability")
            .field("sopClass", PropertyDescriptor::string().required())
            .field(
                "role",
                PropertyDescriptor::enumeration(["SCU", "SCP"]).required(),
            )
            .field(
                "transferSyntaxes",
                PropertyDescriptor::set(PropertyDescriptor::string()),
            ),
    );
    registry.register_object(
        ObjectType::new("ApplicationEntity")
            .field("aeTitle", PropertyDescriptor::string().required())
            .field(
                "connections",
                PropertyDescriptor::list(PropertyDescriptor::object("Connection"))
                    .referencing_values(),
            )
            .field(
                "transferCapabilities",
                PropertyDescriptor::map(
                    PropertyDescriptor::string(),
                    PropertyDescriptor::object("TransferCapability"),
                ),
            ),
    );
    registry.register_object(
        ObjectType::new("Device")
            .field("deviceName", PropertyDescriptor::string().required())
            .field(
                "connections",
                PropertyDescriptor::list(PropertyDescriptor::object("Connection")),
            )
            .field(
                "applicationEntities",
                PropertyDescriptor::map(
                    PropertyDescriptor::string(),
                    PropertyDescriptor::object("ApplicationEntity"),
                ),
            ),
    );
    registry
}

fn device() -> PropertyDescriptor {
    PropertyDescriptor::object("Device")
}

fn device_tree() -> ConfigNode {
    from_json_str(
        r##"{
            "deviceName": "archive",
            "vendor": "ignored",
            "connections": [
                {"cn": "dicom", "hostname": "archive.local", "port": "11112"},
                {"cn": "dicom-default", "hostname": "archive.local"}
            ],
            "applicationEntities": {
                "ARCHIVE": {
                    "aeTitle": "ARCHIVE",
                    "connections": ["/devices/archive/connections/0"],
                    "transferCapabilities": {
                        "ct": {
                            "sopClass": "1.2.840.10008.5.1.4.1.1.2",
                            "role": "SCP",
                            "transferSyntaxes": ["1.2.840.10008.1.2.1", "1.2.840.10008.1.2"]
                        }
                    }
                }
            }
        }"##,
    )
    .expect("valid json")
}

#[test]
fn decodes_nested_objects_with_defaults_and_references() {
    let registry = device_registry();
    let value = registry.decode(&device_tree(), &device()).expect("decode");

    assert_eq!(value.field("deviceName"), Some(&ConfigValue::string("archive")));
    assert_eq!(value.field("vendor"), None);

    let connections = ConfigValue::List(vec![
        ConfigValue::object_of([
            ("cn", ConfigValue::string("dicom")),
            ("hostname", ConfigValue::string("archive.local")),
            ("port", ConfigValue::Integer(11112)),
        ]),
        ConfigValue::object_of([
            ("cn", ConfigValue::string("dicom-default")),
            ("hostname", ConfigValue::string("archive.local")),
            ("port", ConfigValue::Integer(104)),
        ]),
    ]);
    assert_eq!(value.field("connections"), Some(&connections));

    let ae = value
        .field("applicationEntities")
        .and_then(ConfigValue::as_map)
        .and_then(|aes| aes.get(&ConfigValue::string("ARCHIVE")))
        .expect("ARCHIVE ae");
    assert_eq!(
        ae.field("connections"),
        Some(&ConfigValue::List(vec![ConfigValue::reference(
            "/devices/archive/connections/0"
        )]))
    );

    let ct = ae
        .field("transferCapabilities")
        .and_then(ConfigValue::as_map)
        .and_then(|tcs| tcs.get(&ConfigValue::string("ct")))
        .expect("ct capability");
    assert_eq!(ct.field("role"), Some(&ConfigValue::Enum("SCP".to_string())));
    assert_eq!(
        ct.field("transferSyntaxes"),
        Some(&ConfigValue::Set(
            [
                ConfigValue::string("1.2.840.10008.1.2"),
                ConfigValue::string("1.2.840.10008.1.2.1"),
            ]
            .into_iter()
            .collect()
        ))
    );
}

#[test]
fn encodes_canonical_tree() {
    let registry = device_registry();
    let value = registry.decode(&device_tree(), &device()).expect("decode");
    let node = registry.encode(&value, &device()).expect("encode");

    let expected = from_json_str(
        r##"{
            "applicationEntities": {
                "ARCHIVE": {
                    "aeTitle": "ARCHIVE",
                    "connections": [{"#ref": "/devices/archive/connections/0"}],
                    "transferCapabilities": {
                        "ct": {
                            "role": "SCP",
                            "sopClass": "1.2.840.10008.5.1.4.1.1.2",
                            "transferSyntaxes": ["1.2.840.10008.1.2", "1.2.840.10008.1.2.1"]
                        }
                    }
                }
            },
            "connections": [
                {"cn": "dicom", "hostname": "archive.local", "port": 11112},
                {"cn": "dicom-default", "hostname": "archive.local", "port": 104}
            ],
            "deviceName": "archive"
        }"##,
    )
    .expect("valid json");
    assert_eq!(node, expected);

    let again = registry
        .encode(&registry.decode(&node, &device()).expect("decode"), &device())
        .expect("encode");
    assert_eq!(again, node);
}

#[test]
fn missing_required_field_is_reported_at_the_field() {
    let registry = device_registry();
    let mut tree = device_tree();
    let removed = tree
        .get_mut("connections")
        .and_then(ConfigNode::as_sequence_mut)
        .and_then(|items| items.get_mut(1))
        .and_then(ConfigNode::as_mapping_mut)
        .and_then(|conn| conn.remove("hostname"));
    assert!(removed.is_some());

    let err = registry.decode(&tree, &device()).expect_err("hostname missing");
    assert_eq!(err.path().to_string(), "/connections/1/hostname");
    assert_eq!(err.root_cause().kind(), ErrorKind::InvalidValue);
}

#[test]
fn null_required_field_counts_as_missing() {
    let registry = device_registry();
    let connection = PropertyDescriptor::object("Connection");
    let node = ConfigNode::from_entries([
        ("cn", ConfigNode::string("dicom")),
        ("hostname", ConfigNode::Null),
    ]);

    let err = registry.decode(&node, &connection).expect_err("hostname is null");
    assert_eq!(err.path().to_string(), "/hostname");
    assert_eq!(
        err.root_cause(),
        &ConfigError::invalid("required field is missing")
    );
}

#[test]
fn null_field_with_default_decodes_the_default() {
    let registry = device_registry();
    let node = ConfigNode::from_entries([
        ("cn", ConfigNode::string("dicom")),
        ("hostname", ConfigNode::string("localhost")),
        ("port", ConfigNode::Null),
    ]);

    let value = registry
        .decode(&node, &PropertyDescriptor::object("Connection"))
        .expect("decode");
    assert_eq!(value.field("port"), Some(&ConfigValue::Integer(104)));
}

#[test]
fn null_optional_field_is_dropped_and_round_trips() {
    let registry = device_registry();
    let connection = PropertyDescriptor::object("Connection");
    let node = ConfigNode::from_entries([
        ("cn", ConfigNode::string("dicom")),
        ("hostname", ConfigNode::string("localhost")),
        ("installed", ConfigNode::Null),
    ]);

    let value = registry.decode(&node, &connection).expect("decode");
    assert_eq!(value.field("installed"), None);

    let encoded = registry.encode(&value, &connection).expect("encode");
    assert_eq!(registry.decode(&encoded, &connection).expect("decode again"), value);
}

#[test]
fn enum_outside_the_allowed_values_is_invalid() {
    let registry = device_registry();
    let mut tree = device_tree();
    if let Some(role) = tree.get_mut("applicationEntities").and_then(|aes| {
        aes.get_mut("ARCHIVE")?
            .get_mut("transferCapabilities")?
            .get_mut("ct")?
            .get_mut("role")
    }) {
        *role = ConfigNode::string("BOTH");
    }

    let err = registry.decode(&tree, &device()).expect_err("BOTH is not a role");
    assert_eq!(
        err.path().to_string(),
        "/applicationEntities/ARCHIVE/transferCapabilities/ct/role"
    );
    assert_eq!(
        err.root_cause(),
        &ConfigError::invalid("'BOTH' is not one of [SCU, SCP]")
    );
}

#[test]
fn encode_rejects_fields_the_type_does_not_declare() {
    let registry = device_registry();
    let value = ConfigValue::object_of([
        ("deviceName", ConfigValue::string("archive")),
        ("vendor", ConfigValue::string("acme")),
    ]);

    let err = registry.encode(&value, &device()).expect_err("unknown field");
    assert_eq!(err.path().to_string(), "/vendor");
    assert_eq!(err.root_cause().kind(), ErrorKind::InvalidValue);
}

#[test]
fn encode_skips_absent_optional_fields() {
    let registry = device_registry();
    let value = ConfigValue::object_of([
        ("cn", ConfigValue::string("dicom")),
        ("hostname", ConfigValue::string("localhost")),
        ("installed", ConfigValue::Null),
    ]);

    let node = registry
        .encode(&value, &PropertyDescriptor::object("Connection"))
        .expect("encode");
    assert_eq!(node.to_string(), r#"{"cn":"dicom","hostname":"localhost"}"#);
}

#[test]
fn schema_lists_fields_required_and_defaults() {
    let registry = device_registry();
    let schema = registry.schema(&device()).expect("schema");

    assert_eq!(schema.get("class").and_then(ConfigNode::as_str), Some("Device"));
    assert_eq!(
        schema.get("required"),
        Some(&ConfigNode::Sequence(vec![ConfigNode::string("deviceName")]))
    );
    assert_eq!(
        schema
            .get_path(&["properties", "connections", "items", "class"])
            .and_then(ConfigNode::as_str),
        Some("Connection")
    );
    assert_eq!(
        schema.get_path(&["properties", "connections", "items", "properties", "port", "default"]),
        Some(&ConfigNode::integer(104))
    );
    assert_eq!(
        schema
            .get_path(&[
                "properties",
                "applicationEntities",
                "properties",
                "*",
                "properties",
                "connections",
                "items"
            ])
            .and_then(|items| items.get("properties")),
        Some(&ConfigNode::from_entries([(
            "#ref",
            ConfigNode::from_entries([
                ("type", ConfigNode::string("string")),
                ("class", ConfigNode::string("String")),
            ]),
        )]))
    );
}

fn recursive_registry() -> Registry {
    let mut registry = Registry::with_defaults();
    registry.register_object(
        ObjectType::new("Group")
            .field("name", PropertyDescriptor::string())
            .field("parent", PropertyDescriptor::object("Group")),
    );
    registry.register_object(
        ObjectType::new("Tree").field(
            "children",
            PropertyDescriptor::map(PropertyDescriptor::string(), PropertyDescriptor::object("Tree")),
        ),
    );
    registry.register_object(
        ObjectType::new("Peer")
            .field("name", PropertyDescriptor::string())
            .field(
                "peers",
                PropertyDescriptor::list(PropertyDescriptor::object("Peer")).referencing_values(),
            ),
    );
    registry
}

#[test]
fn self_containing_types_are_cyclic_on_every_path() {
    let registry = recursive_registry();
    let group = PropertyDescriptor::object("Group");

    let err = registry.schema(&group).expect_err("cyclic schema");
    assert_eq!(
        err,
        ConfigError::CyclicType {
            chain: vec!["Group".to_string(), "Group".to_string()]
        }
    );

    let node = ConfigNode::from_entries([(
        "parent",
        ConfigNode::from_entries([("name", ConfigNode::string("root"))]),
    )]);
    assert_eq!(
        registry.decode(&node, &group).expect_err("cyclic decode").kind(),
        ErrorKind::CyclicType
    );

    let value = ConfigValue::object_of([(
        "parent",
        ConfigValue::object_of([("name", ConfigValue::string("root"))]),
    )]);
    assert_eq!(
        registry.encode(&value, &group).expect_err("cyclic encode").kind(),
        ErrorKind::CyclicType
    );
}

#[test]
fn cycles_through_container_values_are_detected() {
    let registry = recursive_registry();
    let err = registry
        .schema(&PropertyDescriptor::object("Tree"))
        .expect_err("cyclic schema");
    assert_eq!(err.kind(), ErrorKind::CyclicType);
}

#[test]
fn references_break_type_cycles() {
    let registry = recursive_registry();
    let peer = PropertyDescriptor::object("Peer");

    let schema = registry.schema(&peer).expect("schema");
    assert_eq!(
        schema
            .get_path(&["properties", "peers", "items", "class"])
            .and_then(ConfigNode::as_str),
        Some("Reference")
    );

    let node = ConfigNode::from_entries([
        ("name", ConfigNode::string("a")),
        ("peers", ConfigNode::Sequence(vec![reference_node("/peers/b")])),
    ]);
    let value = registry.decode(&node, &peer).expect("decode");
    assert_eq!(registry.encode(&value, &peer).expect("encode"), node);
}
