use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::errors::Result;
use crate::import::ImportContext;
use crate::project::ParticleSystemDescriptor;
use crate::provenance::Provenance;
use crate::scene::{Emitter, NodeHandle, ParticleSystem, ParticleSystemPayload, Texture, TextureKey, TextureSource};

/// Particle systems are always created; there is no modify path.
pub(crate) fn import_particle_systems(
    ctx: &mut ImportContext<'_>,
    descriptors: &[ParticleSystemDescriptor],
) -> Result<()> {
    for descriptor in descriptors {
        let payload: ParticleSystemPayload =
            ctx.decode("particle system", descriptor_name(descriptor), &descriptor.serialization_object)?;

        let emitter_node = payload.emitter_id.as_deref().and_then(|id| {
            if descriptor.has_emitter {
                ctx.scene.get_node_by_id(id)
            } else {
                ctx.scene.get_last_mesh_by_id(id).map(NodeHandle::Mesh)
            }
        });

        let mut system = ParticleSystem::parse(&payload, emitter_node);

        if !descriptor.has_emitter
            && let Some(position) = descriptor.emitter_position
        {
            match &mut system.emitter {
                Some(Emitter::Point(point)) => *point = position,
                Some(Emitter::Node(handle)) => {
                    if let Some(core) = ctx.scene.node_core_mut(*handle) {
                        core.transform.position = position;
                    }
                }
                None => {}
            }
        }

        system.particle_texture = particle_texture(ctx, &payload);

        let key = ctx.scene.particle_systems.insert(system);
        ctx.tag(key, Provenance::ADDED);
    }
    Ok(())
}

fn descriptor_name(descriptor: &ParticleSystemDescriptor) -> &str {
    descriptor
        .serialization_object
        .get("name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("particle system")
}

/// Creates the particle texture, from inline legacy data or from a url.
fn particle_texture(ctx: &mut ImportContext<'_>, payload: &ParticleSystemPayload) -> Option<TextureKey> {
    let texture = if let Some(data) = &payload.base64_texture {
        let raw_name = payload
            .base64_texture_name
            .as_deref()
            .or(payload.texture_name.as_deref())
            .unwrap_or_default();
        let name = raw_name
            .strip_prefix(ctx.settings.legacy_texture_prefix.as_str())
            .unwrap_or(raw_name);
        match decode_base64(data) {
            Ok(bytes) => Texture::from_bytes(name, bytes),
            Err(err) => {
                log::warn!("Skipping legacy particle texture '{name}': {err}");
                return None;
            }
        }
    } else {
        let name = payload.texture_name.as_deref()?;
        let mut texture = Texture::new(name);
        texture.source = Some(TextureSource::Url(ctx.settings.resolve_url(name)));
        texture
    };

    let key = ctx.scene.textures.insert(texture);
    ctx.tag(key, Provenance::ADDED);
    Some(key)
}

/// Decodes base64 data, with or without a data-URI header.
fn decode_base64(data: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let encoded = data.split_once("base64,").map_or(data, |(_, rest)| rest);
    STANDARD.decode(encoded.trim())
}
