use std::sync::atomic::{AtomicU32, Ordering};

use glam::Affine3A;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::animation::Animation;
use crate::provenance::ProvenanceTable;
use crate::scene::actions::ActionManager;
use crate::scene::camera::Camera;
use crate::scene::effects::{EffectLayer, LensFlareSystem, PostProcessPipeline, ReflectionProbe};
use crate::scene::environment::Environment;
use crate::scene::geometry::Geometry;
use crate::scene::light::Light;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::node::NodeCore;
use crate::scene::particles::ParticleSystem;
use crate::scene::shadow::ShadowGenerator;
use crate::scene::sound::Sound;
use crate::scene::texture::Texture;
use crate::scene::{
    ActionManagerKey, AnimationKey, CameraKey, EffectLayerKey, GeometryKey, LensFlareKey, LightKey, MaterialKey,
    MeshKey, NodeHandle, ParticleSystemKey, PostProcessKey, ReflectionProbeKey, ShadowGeneratorKey, SoundKey,
    TextureKey,
};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// The live scene graph.
///
/// Scene is a pure data layer: every entity lives in a `SlotMap` pool and
/// refers to others by key. Lookups by id or name scan a pool in slot order,
/// which is insertion order as long as nothing is removed.
pub struct Scene {
    pub id: u32,
    pub name: String,

    // ==== Nodes ====
    pub lights: SlotMap<LightKey, Light>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub meshes: SlotMap<MeshKey, Mesh>,

    // ==== Resources ====
    pub geometries: SlotMap<GeometryKey, Geometry>,
    pub materials: SlotMap<MaterialKey, Material>,
    pub textures: SlotMap<TextureKey, Texture>,

    // ==== Scene components ====
    pub particle_systems: SlotMap<ParticleSystemKey, ParticleSystem>,
    pub sounds: SlotMap<SoundKey, Sound>,
    pub shadow_generators: SlotMap<ShadowGeneratorKey, ShadowGenerator>,
    pub effect_layers: SlotMap<EffectLayerKey, EffectLayer>,
    pub reflection_probes: SlotMap<ReflectionProbeKey, ReflectionProbe>,
    pub lens_flare_systems: SlotMap<LensFlareKey, LensFlareSystem>,
    pub post_processes: SlotMap<PostProcessKey, PostProcessPipeline>,
    pub animations: SlotMap<AnimationKey, Animation>,
    pub action_managers: SlotMap<ActionManagerKey, ActionManager>,

    /// Render-target textures rendered every frame, in addition to probes.
    pub custom_render_targets: Vec<TextureKey>,
    /// Animations owned by the scene root.
    pub root_animations: Vec<AnimationKey>,
    /// Scene-level interactivity.
    pub action_manager: Option<ActionManagerKey>,

    pub environment: Environment,

    /// Import provenance of every object touched by an import.
    pub provenance: ProvenanceTable,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            name: "Scene".to_string(),

            lights: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
            meshes: SlotMap::with_key(),

            geometries: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            textures: SlotMap::with_key(),

            particle_systems: SlotMap::with_key(),
            sounds: SlotMap::with_key(),
            shadow_generators: SlotMap::with_key(),
            effect_layers: SlotMap::with_key(),
            reflection_probes: SlotMap::with_key(),
            lens_flare_systems: SlotMap::with_key(),
            post_processes: SlotMap::with_key(),
            animations: SlotMap::with_key(),
            action_managers: SlotMap::with_key(),

            custom_render_targets: Vec::new(),
            root_animations: Vec::new(),
            action_manager: None,

            environment: Environment::new(),
            provenance: ProvenanceTable::default(),
        }
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        self.cameras.insert(camera)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Shared node data of any spatial node.
    #[must_use]
    pub fn node_core(&self, handle: NodeHandle) -> Option<&NodeCore> {
        match handle {
            NodeHandle::Light(key) => self.lights.get(key).map(|l| &l.core),
            NodeHandle::Camera(key) => self.cameras.get(key).map(|c| &c.core),
            NodeHandle::Mesh(key) => self.meshes.get(key).map(|m| &m.core),
        }
    }

    pub fn node_core_mut(&mut self, handle: NodeHandle) -> Option<&mut NodeCore> {
        match handle {
            NodeHandle::Light(key) => self.lights.get_mut(key).map(|l| &mut l.core),
            NodeHandle::Camera(key) => self.cameras.get_mut(key).map(|c| &mut c.core),
            NodeHandle::Mesh(key) => self.meshes.get_mut(key).map(|m| &mut m.core),
        }
    }

    /// Every spatial node: meshes, then lights, then cameras.
    pub fn nodes(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.meshes
            .keys()
            .map(NodeHandle::Mesh)
            .chain(self.lights.keys().map(NodeHandle::Light))
            .chain(self.cameras.keys().map(NodeHandle::Camera))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.meshes.len() + self.lights.len() + self.cameras.len()
    }

    // ========================================================================
    // Lookups (first match wins)
    // ========================================================================

    #[must_use]
    pub fn get_light_by_id(&self, id: &str) -> Option<LightKey> {
        self.lights.iter().find(|(_, l)| l.core.id == id).map(|(k, _)| k)
    }

    #[must_use]
    pub fn get_camera_by_id(&self, id: &str) -> Option<CameraKey> {
        self.cameras.iter().find(|(_, c)| c.core.id == id).map(|(k, _)| k)
    }

    #[must_use]
    pub fn get_mesh_by_id(&self, id: &str) -> Option<MeshKey> {
        self.meshes.iter().find(|(_, m)| m.core.id == id).map(|(k, _)| k)
    }

    /// Last mesh carrying `id`; emitter lookups prefer the newest placeholder.
    #[must_use]
    pub fn get_last_mesh_by_id(&self, id: &str) -> Option<MeshKey> {
        self.meshes
            .iter()
            .filter(|(_, m)| m.core.id == id)
            .last()
            .map(|(k, _)| k)
    }

    #[must_use]
    pub fn get_mesh_by_name(&self, name: &str) -> Option<MeshKey> {
        self.meshes.iter().find(|(_, m)| m.core.name == name).map(|(k, _)| k)
    }

    /// Searches meshes, then lights, then cameras.
    #[must_use]
    pub fn get_node_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.nodes()
            .find(|&handle| self.node_core(handle).is_some_and(|core| core.id == id))
    }

    /// Searches meshes, then lights, then cameras.
    #[must_use]
    pub fn get_node_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes()
            .find(|&handle| self.node_core(handle).is_some_and(|core| core.name == name))
    }

    #[must_use]
    pub fn get_geometry_by_id(&self, id: &str) -> Option<GeometryKey> {
        self.geometries.iter().find(|(_, g)| g.id == id).map(|(k, _)| k)
    }

    #[must_use]
    pub fn get_material_by_id(&self, id: &str) -> Option<MaterialKey> {
        self.materials.iter().find(|(_, m)| m.id == id).map(|(k, _)| k)
    }

    #[must_use]
    pub fn get_texture_by_name(&self, name: &str) -> Option<TextureKey> {
        self.textures.iter().find(|(_, t)| t.name == name).map(|(k, _)| k)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Makes `parent` the parent of `child`.
    ///
    /// Refuses self-attachment and links that would close a cycle.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> bool {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return false;
        }
        if self.node_core(parent).is_none() {
            log::error!("Parent node not found during attach!");
            return false;
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            log::warn!("Cannot attach node to one of its descendants");
            return false;
        }
        match self.node_core_mut(child) {
            Some(core) => {
                core.parent = Some(parent);
                true
            }
            None => false,
        }
    }

    /// Moves `child` back to the scene root.
    pub fn detach(&mut self, child: NodeHandle) {
        if let Some(core) = self.node_core_mut(child) {
            core.parent = None;
        }
    }

    #[must_use]
    pub fn children_of(&self, parent: NodeHandle) -> Vec<NodeHandle> {
        self.nodes()
            .filter(|&handle| self.node_core(handle).and_then(NodeCore::parent) == Some(parent))
            .collect()
    }

    /// Walks the parent chain upwards, stopping at the root or on a revisit.
    pub fn ancestors(&self, node: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        let mut visited = FxHashSet::default();
        visited.insert(node);
        let mut current = self.node_core(node).and_then(NodeCore::parent);
        std::iter::from_fn(move || {
            let handle = current?;
            if !visited.insert(handle) {
                return None;
            }
            current = self.node_core(handle).and_then(NodeCore::parent);
            Some(handle)
        })
    }

    /// World transform of a node, composed from its ancestors' local transforms.
    #[must_use]
    pub fn world_matrix(&self, node: NodeHandle) -> Affine3A {
        let local = self
            .node_core(node)
            .map_or(Affine3A::IDENTITY, |core| core.transform.local_matrix());
        self.ancestors(node).fold(local, |acc, ancestor| {
            self.node_core(ancestor)
                .map_or(acc, |core| core.transform.local_matrix() * acc)
        })
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Stores an animation and appends it to its owner's list (the scene
    /// root when `owner` is `None`).
    pub fn add_animation(&mut self, owner: Option<NodeHandle>, animation: Animation) -> AnimationKey {
        let key = self.animations.insert(animation);
        match owner.and_then(|handle| self.node_core_mut(handle)) {
            Some(core) => core.animations.push(key),
            None => self.root_animations.push(key),
        }
        key
    }
}
