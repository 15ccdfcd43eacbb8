//! Canonical KDL serialization of descriptors.
//!
//! Output only holds literal values, so loading it back yields the same
//! descriptor regardless of the version provider in use.

use crate::variables::VariableContext;
use droidconf_core::{BuildTypeProfile, ProjectDescriptor, SigningConfig};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};

/// Render a descriptor as canonical KDL text.
pub fn serialize(descriptor: &ProjectDescriptor) -> String {
    let mut doc = KdlDocument::new();

    if !descriptor.plugins.is_empty() {
        let mut plugins = KdlNode::new("plugins");
        let children = plugins.ensure_children();
        for id in &descriptor.plugins {
            children.nodes_mut().push(string_node("id", id));
        }
        doc.nodes_mut().push(plugins);
    }

    doc.nodes_mut().push(android_node(descriptor));

    let mut flutter = KdlNode::new("flutter");
    flutter
        .ensure_children()
        .nodes_mut()
        .push(string_node("source", &descriptor.flutter.source));
    doc.nodes_mut().push(flutter);

    if !descriptor.dependencies.is_empty() {
        let mut dependencies = KdlNode::new("dependencies");
        let children = dependencies.ensure_children();
        for (scope, coordinates) in descriptor.dependencies.iter() {
            let mut node = KdlNode::new(scope);
            for coordinate in coordinates {
                node.push(KdlEntry::new(string_value(&coordinate.to_string())));
            }
            children.nodes_mut().push(node);
        }
        doc.nodes_mut().push(dependencies);
    }

    doc.autoformat();
    doc.to_string()
}

fn android_node(descriptor: &ProjectDescriptor) -> KdlNode {
    let mut android = KdlNode::new("android");
    let nodes = android.ensure_children().nodes_mut();

    nodes.push(string_node("namespace", &descriptor.namespace));
    nodes.push(integer_node("compile-sdk", descriptor.compile_sdk));
    if let Some(ndk) = &descriptor.ndk_version {
        nodes.push(string_node("ndk-version", ndk));
    }

    let config = &descriptor.default_config;
    nodes.push(block(
        "default-config",
        vec![
            string_node("application-id", &config.application_id),
            integer_node("min-sdk", config.min_sdk),
            integer_node("target-sdk", config.target_sdk),
            integer_node("version-code", config.version_code),
            string_node("version-name", &config.version_name),
        ],
    ));

    let options = &descriptor.compile_options;
    nodes.push(block(
        "compile-options",
        vec![
            string_node(
                "source-compatibility",
                &options.source_compatibility.to_string(),
            ),
            string_node(
                "target-compatibility",
                &options.target_compatibility.to_string(),
            ),
            bool_node("core-library-desugaring", options.core_library_desugaring),
        ],
    ));

    nodes.push(block(
        "kotlin-options",
        vec![string_node(
            "jvm-target",
            &descriptor.kotlin_options.jvm_target.to_string(),
        )],
    ));

    if !descriptor.signing_configs.is_empty() {
        nodes.push(block(
            "signing-configs",
            descriptor
                .signing_configs
                .values()
                .map(signing_config_node)
                .collect(),
        ));
    }

    nodes.push(block(
        "build-types",
        descriptor
            .build_types
            .values()
            .map(build_type_node)
            .collect(),
    ));

    android
}

fn signing_config_node(config: &SigningConfig) -> KdlNode {
    let fields = [
        ("store-file", &config.store_file),
        ("store-password", &config.store_password),
        ("key-alias", &config.key_alias),
        ("key-password", &config.key_password),
    ];

    let mut node = KdlNode::new(config.name.as_str());
    let children: Vec<KdlNode> = fields
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| string_node(name, v)))
        .collect();
    if !children.is_empty() {
        node.ensure_children().nodes_mut().extend(children);
    }
    node
}

fn build_type_node(profile: &BuildTypeProfile) -> KdlNode {
    block(
        profile.name.as_str(),
        vec![
            string_node("signing-config", &profile.signing_config),
            bool_node("minify", profile.minify_enabled),
            bool_node("shrink-resources", profile.shrink_resources),
        ],
    )
}

// Node construction helpers

fn block(name: &str, children: Vec<KdlNode>) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.ensure_children().nodes_mut().extend(children);
    node
}

fn string_value(value: &str) -> KdlValue {
    KdlValue::String(VariableContext::escape(value))
}

fn string_node(name: &str, value: &str) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(string_value(value)));
    node
}

fn integer_node(name: &str, value: u32) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::Integer(i128::from(value))));
    node
}

fn bool_node(name: &str, value: bool) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::Bool(value)));
    node
}
