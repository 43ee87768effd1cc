//! Project Document Tests
//!
//! Tests for:
//! - Loading documents from strings, readers and files
//! - Lenient decoding (absent and null sections)
//! - Normalization of legacy shapes

use std::io::Cursor;

use serde_json::json;

use project_importer::project::{EFFECT_LAYER_LEGACY_FIELDS, ProjectDocument, normalize};

fn rich_document() -> ProjectDocument {
    serde_json::from_value(json!({
        "nodes": [{ "name": "Sun", "id": "sun", "type": "Light", "serializationObject": { "tags": 1 } }],
        "shadowGenerators": [null, { "lightId": "sun" }, null],
        "effectLayers": [
            { "name": "GlowLayer", "serializationObject": { "renderingGroupId": 3, "intensity": 0.5 } }
        ],
        "postProcesses": [{ "name": "DefaultRenderingPipeline", "attach": false, "serializationObject": {} }],
        "globalConfiguration": { "fogMode": 2 },
        "customMetadatas": { "title": {} }
    }))
    .expect("valid document")
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn empty_object_is_an_empty_document() -> anyhow::Result<()> {
    let doc = ProjectDocument::from_json_str("{}")?;
    assert_eq!(doc, ProjectDocument::default());
    assert_eq!(doc.descriptor_count(), 0);
    Ok(())
}

#[test]
fn null_sections_decode_as_empty() -> anyhow::Result<()> {
    let doc = ProjectDocument::from_json_str(r#"{ "nodes": null, "materials": null, "actions": null }"#)?;
    assert!(doc.nodes.is_empty());
    assert!(doc.materials.is_empty());
    assert!(doc.actions.is_none());
    Ok(())
}

#[test]
fn reader_and_string_agree() -> anyhow::Result<()> {
    let text = r#"{ "nodes": [{ "name": "Box", "type": "Mesh" }], "sounds": [{ "serializationObject": { "name": "a.mp3" } }] }"#;
    let from_str = ProjectDocument::from_json_str(text)?;
    let from_reader = ProjectDocument::from_reader(Cursor::new(text))?;

    assert_eq!(from_str, from_reader);
    assert_eq!(from_reader.descriptor_count(), 2);
    assert_eq!(from_reader.nodes[0].node_type.as_deref(), Some("Mesh"));
    Ok(())
}

#[test]
fn load_from_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("project-importer-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, r#"{ "textures": [{ "newInstance": true, "serializedValues": { "name": "a.png" } }] }"#)?;

    let doc = ProjectDocument::from_path(&path);
    std::fs::remove_file(&path)?;

    let doc = doc?;
    assert_eq!(doc.textures.len(), 1);
    assert!(doc.textures[0].new_instance);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let result = ProjectDocument::from_path("/definitely/not/here/project.json");
    assert!(matches!(result, Err(project_importer::ImportError::IoError(_))));
}

#[test]
fn malformed_json_is_a_json_error() {
    let result = ProjectDocument::from_json_str(r#"{ "nodes": [ "#);
    assert!(matches!(result, Err(project_importer::ImportError::JsonError(_))));
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn normalize_drops_null_shadow_generators() {
    let doc = normalize(rich_document());
    assert_eq!(doc.shadow_generators, vec![json!({ "lightId": "sun" })]);
}

#[test]
fn normalize_strips_legacy_effect_layer_fields() {
    let doc = normalize(rich_document());
    let layer = &doc.effect_layers[0].serialization_object;

    for field in EFFECT_LAYER_LEGACY_FIELDS {
        assert!(layer.get(field).is_none(), "{field} should be stripped");
    }
    assert_eq!(layer["intensity"], json!(0.5));
}

#[test]
fn normalize_is_idempotent() {
    let once = normalize(rich_document());
    let twice = normalize(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn normalize_leaves_other_sections_alone() {
    let original = rich_document();
    let doc = normalize(original.clone());

    assert_eq!(doc.nodes, original.nodes);
    assert_eq!(doc.post_processes, original.post_processes);
    assert!(!doc.post_processes[0].attach);
    assert_eq!(doc.global_configuration, original.global_configuration);
    assert_eq!(doc.custom_metadatas, original.custom_metadatas);
}
