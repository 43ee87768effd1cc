//! Scene components that are always created fresh.
//!
//! None of these have a modify path: every descriptor produces a new object
//! tagged as added. References that cannot be resolved (an unknown light, an
//! unknown emitter, an unknown pipeline class) skip the descriptor.

use serde_json::Value;

use crate::errors::Result;
use crate::import::ImportContext;
use crate::import::materials::parse_texture;
use crate::project::{EffectLayerDescriptor, PayloadDescriptor, PostProcessDescriptor, RenderTargetDescriptor};
use crate::provenance::Provenance;
use crate::scene::{
    ActionGraphPayload, ActionManager, EffectLayer, EffectLayerPayload, LensFlareSystem, LensFlareSystemPayload,
    MeshKey, PipelineKind, PostProcessPipeline, ReflectionProbe, ReflectionProbePayload, Scene, ShadowGenerator,
    ShadowGeneratorPayload, Sound, SoundPayload, TexturePayload,
};

fn mesh_lookup(scene: &Scene) -> impl Fn(&str) -> Option<MeshKey> + '_ {
    move |id: &str| scene.get_mesh_by_id(id)
}

fn payload_name(payload: &Value) -> &str {
    payload.get("name").and_then(Value::as_str).unwrap_or_default()
}

pub(crate) fn import_shadow_generators(ctx: &mut ImportContext<'_>, payloads: &[Value]) -> Result<()> {
    for value in payloads {
        let payload: ShadowGeneratorPayload = ctx.decode("shadow generator", light_id(value), value)?;

        let Some(light) = ctx.scene.get_light_by_id(&payload.light_id) else {
            log::warn!("Shadow generator references unknown light '{}', skipping", payload.light_id);
            continue;
        };
        let render_list = payload
            .render_list
            .iter()
            .filter_map(|id| ctx.scene.get_mesh_by_id(id))
            .collect();

        let key = ctx
            .scene
            .shadow_generators
            .insert(ShadowGenerator::parse(&payload, light, render_list));
        ctx.tag(key, Provenance::ADDED);
    }
    Ok(())
}

/// Shadow generators have no name; errors name them by their light.
fn light_id(value: &Value) -> &str {
    value.get("lightId").and_then(Value::as_str).unwrap_or_default()
}

pub(crate) fn import_sounds(ctx: &mut ImportContext<'_>, descriptors: &[PayloadDescriptor]) -> Result<()> {
    for descriptor in descriptors {
        let value = &descriptor.serialization_object;
        let payload: SoundPayload = ctx.decode("sound", payload_name(value), value)?;

        let url = ctx
            .settings
            .resolve_url(payload.url.as_deref().unwrap_or(&payload.name));
        let connected_mesh = payload
            .connected_mesh_id
            .as_deref()
            .and_then(|id| ctx.scene.get_mesh_by_id(id));

        let key = ctx.scene.sounds.insert(Sound::parse(&payload, url, connected_mesh));
        ctx.tag(key, Provenance::ADDED);
    }
    Ok(())
}

/// Replaces the scene-level action manager.
pub(crate) fn import_scene_actions(ctx: &mut ImportContext<'_>, actions: Option<&Value>) -> Result<()> {
    let Some(actions) = actions else {
        return Ok(());
    };
    let graph: ActionGraphPayload = ctx.decode("actions", "scene", actions)?;
    let key = ctx.scene.action_managers.insert(ActionManager::parse(&graph, None));
    ctx.tag(key, Provenance::ADDED);

    if let Some(previous) = ctx.scene.action_manager.replace(key) {
        ctx.scene.action_managers.remove(previous);
        ctx.scene.provenance.forget(previous);
    }
    Ok(())
}

pub(crate) fn import_effect_layers(ctx: &mut ImportContext<'_>, descriptors: &[EffectLayerDescriptor]) -> Result<()> {
    for descriptor in descriptors {
        let mut payload: EffectLayerPayload =
            ctx.decode("effect layer", &descriptor.name, &descriptor.serialization_object)?;
        if payload.custom_type.is_empty() {
            payload.custom_type = format!("BABYLON.{}", descriptor.name);
        }
        if payload.name.is_empty() {
            payload.name.clone_from(&descriptor.name);
        }

        let Some(layer) = EffectLayer::parse(&payload, mesh_lookup(ctx.scene)) else {
            log::warn!("Unknown effect layer type '{}', skipping", payload.custom_type);
            continue;
        };
        let key = ctx.scene.effect_layers.insert(layer);
        ctx.tag(key, Provenance::ADDED);
    }
    Ok(())
}

/// Probes become reflection probes; everything else is a custom render
/// target texture.
pub(crate) fn import_render_targets(ctx: &mut ImportContext<'_>, descriptors: &[RenderTargetDescriptor]) -> Result<()> {
    for descriptor in descriptors {
        let value = &descriptor.serialization_object;
        let name = payload_name(value);

        if descriptor.is_probe {
            let payload: ReflectionProbePayload = ctx.decode("reflection probe", name, value)?;
            let probe = ReflectionProbe::parse(&payload, mesh_lookup(ctx.scene));
            let key = ctx.scene.reflection_probes.insert(probe);
            ctx.tag(key, Provenance::ADDED);
        } else {
            let mut payload: TexturePayload = ctx.decode("render target", name, value)?;
            payload.is_render_target = true;
            let texture = parse_texture(ctx, &payload);
            let key = ctx.scene.textures.insert(texture);
            ctx.scene.custom_render_targets.push(key);
            ctx.tag(key, Provenance::ADDED);
        }
    }
    Ok(())
}

pub(crate) fn import_lens_flares(ctx: &mut ImportContext<'_>, descriptors: &[PayloadDescriptor]) -> Result<()> {
    for descriptor in descriptors {
        let value = &descriptor.serialization_object;
        let payload: LensFlareSystemPayload = ctx.decode("lens flare system", payload_name(value), value)?;

        let Some(emitter) = ctx.scene.get_node_by_id(&payload.emitter_id) else {
            log::warn!(
                "Lens flare system '{}' references unknown emitter '{}', skipping",
                payload.name,
                payload.emitter_id
            );
            continue;
        };
        let system = LensFlareSystem::parse(&payload, emitter, |url| ctx.settings.resolve_url(url));
        let key = ctx.scene.lens_flare_systems.insert(system);
        ctx.tag(key, Provenance::ADDED);
    }
    Ok(())
}

/// Pipelines keep their parameters as opaque JSON for the renderer.
pub(crate) fn import_post_processes(ctx: &mut ImportContext<'_>, descriptors: &[PostProcessDescriptor]) {
    for descriptor in descriptors {
        let Some(kind) = PipelineKind::from_name(&descriptor.name) else {
            log::warn!("Unknown post-process pipeline '{}', skipping", descriptor.name);
            continue;
        };
        let cameras = if descriptor.attach {
            ctx.scene.cameras.keys().collect()
        } else {
            Vec::new()
        };
        let key = ctx.scene.post_processes.insert(PostProcessPipeline {
            name: descriptor.name.clone(),
            kind,
            cameras,
            settings: descriptor.serialization_object.clone(),
        });
        ctx.tag(key, Provenance::ADDED);
    }
}
