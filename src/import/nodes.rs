//! Node reconciliation
//!
//! For every node descriptor, in document order: bind it to the scene root,
//! to a reconciled node, or to an existing node found by name; synthesize the
//! emitters of the particle systems pointing at it; then attach its
//! animations, actions and physics.

use serde_json::Value;

use crate::animation::Animation;
use crate::errors::{ImportError, Result};
use crate::import::ImportContext;
use crate::project::{NodeDescriptor, ParticleSystemDescriptor, ProjectDocument};
use crate::provenance::Provenance;
use crate::scene::mesh::InstancePayload;
use crate::scene::{
    ActionGraphPayload, ActionManager, Camera, CameraPayload, Geometry, Light, LightPayload, Mesh,
    MeshBundlePayload, MeshKey, MeshLinks, NodeFields, NodeHandle, PhysicsImpostor,
};

/// Kind of node a typed descriptor materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Light,
    Camera,
    Mesh,
}

impl NodeKind {
    /// Decodes a descriptor's type tag; anything else is fatal.
    pub fn decode(descriptor: &NodeDescriptor) -> Result<Self> {
        match descriptor.node_type.as_deref() {
            Some("Light") => Ok(Self::Light),
            Some("Camera") => Ok(Self::Camera),
            Some("Mesh") => Ok(Self::Mesh),
            other => Err(ImportError::UnrecognizedNodeType {
                name: descriptor.name.clone(),
                type_tag: other.unwrap_or_default().to_string(),
            }),
        }
    }
}

/// What a descriptor ended up referring to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    SceneRoot,
    Node(NodeHandle),
}

pub(crate) fn import_nodes(ctx: &mut ImportContext<'_>, doc: &ProjectDocument) -> Result<()> {
    for descriptor in &doc.nodes {
        let bound = bind(ctx, descriptor)?;
        synthesize_emitters(ctx, descriptor, &doc.particle_systems);

        let Some(bound) = bound else {
            log::debug!("Node '{}' not found in scene, skipping", descriptor.name);
            continue;
        };

        import_animations(ctx, descriptor, bound)?;

        if let Bound::Node(NodeHandle::Mesh(key)) = bound {
            import_actions(ctx, descriptor, key)?;
            import_physics(ctx, descriptor, key);
        }
    }
    Ok(())
}

fn bind(ctx: &mut ImportContext<'_>, descriptor: &NodeDescriptor) -> Result<Option<Bound>> {
    if descriptor.name == ctx.settings.root_node_name {
        return Ok(Some(Bound::SceneRoot));
    }

    let Some(payload) = &descriptor.serialization_object else {
        return Ok(ctx.scene.get_node_by_name(&descriptor.name).map(Bound::Node));
    };

    let handle = match NodeKind::decode(descriptor)? {
        NodeKind::Light => Some(reconcile_light(ctx, descriptor, payload)?),
        NodeKind::Camera => Some(reconcile_camera(ctx, descriptor, payload)?),
        NodeKind::Mesh => reconcile_meshes(ctx, descriptor, payload)?,
    };
    Ok(handle.map(Bound::Node))
}

/// Falls back to the descriptor id when the payload carries none.
fn fill_id(fields: &mut NodeFields, descriptor: &NodeDescriptor) {
    if fields.id.is_none() {
        fields.id.clone_from(&descriptor.id);
    }
}

fn reconcile_light(ctx: &mut ImportContext<'_>, descriptor: &NodeDescriptor, payload: &Value) -> Result<NodeHandle> {
    let mut payload: LightPayload = ctx.decode("light", &descriptor.name, payload)?;
    fill_id(&mut payload.node, descriptor);

    let existing = payload.node.id.as_deref().and_then(|id| ctx.scene.get_light_by_id(id));
    let key = match existing.and_then(|key| ctx.scene.lights.get_mut(key).map(|light| (key, light))) {
        Some((key, light)) => {
            payload.node.metadata = None;
            light.apply(&payload);
            ctx.tag(key, Provenance::MODIFIED);
            key
        }
        None => {
            let key = ctx.scene.add_light(Light::parse(&payload));
            ctx.tag(key, Provenance::ADDED);
            key
        }
    };

    let handle = NodeHandle::Light(key);
    ctx.pending.queue(handle, payload.node.parent_id.as_deref());
    Ok(handle)
}

fn reconcile_camera(ctx: &mut ImportContext<'_>, descriptor: &NodeDescriptor, payload: &Value) -> Result<NodeHandle> {
    let mut payload: CameraPayload = ctx.decode("camera", &descriptor.name, payload)?;
    fill_id(&mut payload.node, descriptor);

    let existing = payload.node.id.as_deref().and_then(|id| ctx.scene.get_camera_by_id(id));
    let key = match existing.and_then(|key| ctx.scene.cameras.get_mut(key).map(|camera| (key, camera))) {
        Some((key, camera)) => {
            payload.node.metadata = None;
            camera.apply(&payload);
            ctx.tag(key, Provenance::MODIFIED);
            key
        }
        None => {
            let key = ctx.scene.add_camera(Camera::parse(&payload));
            ctx.tag(key, Provenance::ADDED);
            key
        }
    };

    let handle = NodeHandle::Camera(key);
    ctx.pending.queue(handle, payload.node.parent_id.as_deref());
    Ok(handle)
}

/// Reconciles a mesh bundle. The last mesh of the bundle becomes the
/// descriptor's node.
fn reconcile_meshes(
    ctx: &mut ImportContext<'_>,
    descriptor: &NodeDescriptor,
    payload: &Value,
) -> Result<Option<NodeHandle>> {
    let bundle: MeshBundlePayload = ctx.decode("mesh", &descriptor.name, payload)?;

    if let Some(geometries) = &bundle.geometries {
        for vertex_data in &geometries.vertex_data {
            if ctx.scene.get_geometry_by_id(&vertex_data.id).is_some() {
                continue;
            }
            let key = ctx.scene.geometries.insert(Geometry::parse(vertex_data));
            ctx.tag(key, Provenance::ADDED);
        }
    }

    let single = bundle.meshes.len() == 1;
    let mut last = None;
    for mut mesh_payload in bundle.meshes {
        if single {
            fill_id(&mut mesh_payload.node, descriptor);
        }
        let links = MeshLinks {
            geometry: mesh_payload
                .geometry_id
                .as_deref()
                .and_then(|id| ctx.scene.get_geometry_by_id(id)),
            material: mesh_payload
                .material_id
                .as_deref()
                .and_then(|id| ctx.scene.get_material_by_id(id)),
        };

        let existing = mesh_payload.node.id.as_deref().and_then(|id| ctx.scene.get_mesh_by_id(id));
        let key = match existing.and_then(|key| ctx.scene.meshes.get_mut(key).map(|mesh| (key, mesh))) {
            Some((key, mesh)) => {
                mesh_payload.node.metadata = None;
                mesh.apply(&mesh_payload, links);
                ctx.tag(key, Provenance::MODIFIED);
                key
            }
            None => {
                let key = ctx.scene.add_mesh(Mesh::parse(&mesh_payload, links));
                ctx.tag(key, Provenance::ADDED);
                add_instances(ctx, key, &mesh_payload.instances);
                key
            }
        };

        ctx.pending
            .queue(NodeHandle::Mesh(key), mesh_payload.node.parent_id.as_deref());
        last = Some(NodeHandle::Mesh(key));
    }
    Ok(last)
}

fn add_instances(ctx: &mut ImportContext<'_>, source_key: MeshKey, instances: &[InstancePayload]) {
    for instance_payload in instances {
        let Some(source) = ctx.scene.meshes.get(source_key) else {
            return;
        };
        let instance = Mesh::parse_instance(source_key, source, instance_payload);
        let key = ctx.scene.add_mesh(instance);
        ctx.tag(key, Provenance::ADDED);
        ctx.pending
            .queue(NodeHandle::Mesh(key), instance_payload.node.parent_id.as_deref());
    }
}

/// Creates an empty placeholder mesh for every particle system that emits
/// from this descriptor's id without shipping its own emitter.
fn synthesize_emitters(ctx: &mut ImportContext<'_>, descriptor: &NodeDescriptor, systems: &[ParticleSystemDescriptor]) {
    let Some(id) = descriptor.id.as_deref().filter(|id| !id.is_empty()) else {
        return;
    };
    for _ in systems
        .iter()
        .filter(|ps| !ps.has_emitter && ps.emitter_id() == Some(id))
    {
        let key = ctx.scene.add_mesh(Mesh::new_empty(id, &descriptor.name));
        ctx.tag(key, Provenance::ADDED_PARTICLE_SYSTEM);
        log::debug!("Created emitter '{}' for particle system", descriptor.name);
    }
}

fn import_animations(ctx: &mut ImportContext<'_>, descriptor: &NodeDescriptor, bound: Bound) -> Result<()> {
    let owner = match bound {
        Bound::SceneRoot => None,
        Bound::Node(handle) => Some(handle),
    };
    for animation in &descriptor.animations {
        let animation = Animation::parse(&animation.serialization_object)
            .map_err(ImportError::payload("animation", &descriptor.name))?;
        let key = ctx.scene.add_animation(owner, animation);
        ctx.tag(key, Provenance::ADDED);
    }
    Ok(())
}

/// Replaces the mesh's action manager with the descriptor's graph.
fn import_actions(ctx: &mut ImportContext<'_>, descriptor: &NodeDescriptor, key: MeshKey) -> Result<()> {
    let Some(actions) = &descriptor.actions else {
        return Ok(());
    };
    let graph: ActionGraphPayload = ctx.decode("actions", &descriptor.name, actions)?;
    let manager = ctx
        .scene
        .action_managers
        .insert(ActionManager::parse(&graph, Some(NodeHandle::Mesh(key))));
    ctx.tag(manager, Provenance::ADDED);

    let previous = ctx
        .scene
        .meshes
        .get_mut(key)
        .and_then(|mesh| mesh.action_manager.replace(manager));
    if let Some(previous) = previous {
        ctx.scene.action_managers.remove(previous);
        ctx.scene.provenance.forget(previous);
    }
    Ok(())
}

fn import_physics(ctx: &mut ImportContext<'_>, descriptor: &NodeDescriptor, key: MeshKey) {
    let Some(physics) = &descriptor.physics else {
        return;
    };
    if !ctx.settings.enable_physics {
        log::debug!("Physics disabled, ignoring impostor of '{}'", descriptor.name);
        return;
    }
    if let Some(mesh) = ctx.scene.meshes.get_mut(key) {
        mesh.physics_impostor = Some(PhysicsImpostor::from(physics));
    }
}
