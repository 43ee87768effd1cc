//! Document normalization
//!
//! Runs before any reconciliation. Absent collections are already empty
//! after decoding; this pass canonicalizes the payloads themselves and strips
//! fields older editor versions wrote but the current format rejects.

use serde_json::Value;

use crate::project::document::ProjectDocument;

/// Deprecated keys removed from effect-layer payloads.
pub const EFFECT_LAYER_LEGACY_FIELDS: &[&str] = &["renderingGroupId"];

/// Removes `fields` from a JSON object; other values are left alone.
pub fn strip_fields(payload: &mut Value, fields: &[&str]) {
    if let Value::Object(map) = payload {
        for field in fields {
            map.remove(*field);
        }
    }
}

/// Null payloads become empty objects so every reconciler sees an object.
fn canonical(payload: &mut Value) {
    if payload.is_null() {
        *payload = Value::Object(serde_json::Map::new());
    }
}

fn canonical_opt(payload: &mut Option<Value>) {
    if payload.as_ref().is_some_and(Value::is_null) {
        *payload = None;
    }
}

/// Normalizes a document. Pure and idempotent.
#[must_use]
pub fn normalize(mut doc: ProjectDocument) -> ProjectDocument {
    for node in &mut doc.nodes {
        canonical_opt(&mut node.serialization_object);
        canonical_opt(&mut node.actions);
        for animation in &mut node.animations {
            canonical(&mut animation.serialization_object);
        }
    }
    for ps in &mut doc.particle_systems {
        canonical(&mut ps.serialization_object);
    }
    for material in &mut doc.materials {
        canonical(&mut material.serialized_values);
    }
    for texture in &mut doc.textures {
        canonical(&mut texture.serialized_values);
    }
    doc.shadow_generators.retain(|sg| !sg.is_null());
    for sound in &mut doc.sounds {
        canonical(&mut sound.serialization_object);
    }
    for target in &mut doc.render_targets {
        canonical(&mut target.serialization_object);
    }
    for layer in &mut doc.effect_layers {
        canonical(&mut layer.serialization_object);
        strip_fields(&mut layer.serialization_object, EFFECT_LAYER_LEGACY_FIELDS);
    }
    for flare in &mut doc.lens_flares {
        canonical(&mut flare.serialization_object);
    }
    for pipeline in &mut doc.post_processes {
        canonical(&mut pipeline.serialization_object);
    }
    canonical_opt(&mut doc.actions);
    doc
}
