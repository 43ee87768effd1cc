use crate::errors::Result;
use crate::import::ImportContext;
use crate::project::{MaterialDescriptor, TextureDescriptor};
use crate::provenance::Provenance;
use crate::scene::{Material, MaterialPayload, MeshKey, Texture, TexturePayload};

pub(crate) fn import_materials(ctx: &mut ImportContext<'_>, descriptors: &[MaterialDescriptor]) -> Result<()> {
    for descriptor in descriptors {
        let payload: MaterialPayload = ctx.decode(
            "material",
            payload_name(&descriptor.serialized_values),
            &descriptor.serialized_values,
        )?;

        let existing = payload.id.as_deref().and_then(|id| ctx.scene.get_material_by_id(id));
        let key = match existing.and_then(|key| ctx.scene.materials.get_mut(key).map(|m| (key, m))) {
            Some((key, material)) => {
                material.apply(&payload);
                ctx.tag(key, Provenance::MODIFIED);
                key
            }
            None => {
                let key = ctx.scene.materials.insert(Material::parse(&payload));
                ctx.tag(key, Provenance::ADDED);
                key
            }
        };

        for mesh_name in &descriptor.meshes_names {
            let Some(mesh) = ctx
                .scene
                .get_mesh_by_name(mesh_name)
                .and_then(|mesh_key| ctx.scene.meshes.get_mut(mesh_key))
            else {
                log::debug!("Mesh '{mesh_name}' not found, material not assigned");
                continue;
            };
            // Instances always render with their source's material.
            if mesh.is_instance() {
                continue;
            }
            mesh.material = Some(key);
        }
    }
    Ok(())
}

/// Textures reconcile by name. A `newInstance` descriptor additionally
/// creates a copy first, so one descriptor can both add and modify.
pub(crate) fn import_textures(ctx: &mut ImportContext<'_>, descriptors: &[TextureDescriptor]) -> Result<()> {
    for descriptor in descriptors {
        let name = payload_name(&descriptor.serialized_values);
        let payload: TexturePayload = ctx.decode("texture", name, &descriptor.serialized_values)?;

        if descriptor.new_instance {
            let texture = parse_texture(ctx, &payload);
            let key = ctx.scene.textures.insert(texture);
            ctx.tag(key, Provenance::ADDED);
        }

        let existing = ctx.scene.get_texture_by_name(name);
        match existing.and_then(|key| ctx.scene.textures.get_mut(key).map(|t| (key, t))) {
            Some((key, texture)) => {
                texture.apply(&payload);
                ctx.tag(key, Provenance::MODIFIED);
            }
            None => {
                let texture = parse_texture(ctx, &payload);
                let key = ctx.scene.textures.insert(texture);
                ctx.tag(key, Provenance::ADDED);
            }
        }
    }
    Ok(())
}

pub(crate) fn parse_texture(ctx: &ImportContext<'_>, payload: &TexturePayload) -> Texture {
    let render_list: Vec<MeshKey> = payload
        .render_list
        .iter()
        .filter_map(|id| ctx.scene.get_mesh_by_id(id))
        .collect();
    Texture::parse(payload, |url| ctx.settings.resolve_url(url), render_list)
}

fn payload_name(payload: &serde_json::Value) -> &str {
    payload.get("name").and_then(serde_json::Value::as_str).unwrap_or_default()
}
