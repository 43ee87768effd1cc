use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::Result;
use crate::scene::PhysicsDescriptor;

/// Decodes `null` the same way as a missing key.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_true() -> bool {
    true
}

/// A serialized editor project.
///
/// Every collection is optional on the wire: absent keys and `null` both
/// decode to an empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDocument {
    #[serde(deserialize_with = "nullable")]
    pub nodes: Vec<NodeDescriptor>,
    #[serde(deserialize_with = "nullable")]
    pub particle_systems: Vec<ParticleSystemDescriptor>,
    #[serde(deserialize_with = "nullable")]
    pub materials: Vec<MaterialDescriptor>,
    #[serde(deserialize_with = "nullable")]
    pub textures: Vec<TextureDescriptor>,
    /// Shadow generators are stored as bare payloads.
    #[serde(deserialize_with = "nullable")]
    pub shadow_generators: Vec<Value>,
    #[serde(deserialize_with = "nullable")]
    pub sounds: Vec<PayloadDescriptor>,
    #[serde(deserialize_with = "nullable")]
    pub render_targets: Vec<RenderTargetDescriptor>,
    #[serde(deserialize_with = "nullable")]
    pub effect_layers: Vec<EffectLayerDescriptor>,
    #[serde(deserialize_with = "nullable")]
    pub lens_flares: Vec<PayloadDescriptor>,
    #[serde(deserialize_with = "nullable")]
    pub post_processes: Vec<PostProcessDescriptor>,

    /// Scene-level action graph.
    pub actions: Option<Value>,

    #[serde(deserialize_with = "nullable")]
    pub global_configuration: GlobalConfiguration,

    /// Extension name → extension data.
    #[serde(deserialize_with = "nullable")]
    pub custom_metadatas: Map<String, Value>,

    /// Asset component id → component data.
    #[serde(deserialize_with = "nullable")]
    pub assets: Map<String, Value>,
}

impl ProjectDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading project document from {}", path.display());
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Total number of descriptors across all collections.
    #[must_use]
    pub fn descriptor_count(&self) -> usize {
        self.nodes.len()
            + self.particle_systems.len()
            + self.materials.len()
            + self.textures.len()
            + self.shadow_generators.len()
            + self.sounds.len()
            + self.render_targets.len()
            + self.effect_layers.len()
            + self.lens_flares.len()
            + self.post_processes.len()
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// A node of the project.
///
/// Without a type tag and payload the descriptor only references an existing
/// node by name (to attach animations or actions to it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeDescriptor {
    pub name: String,
    pub id: Option<String>,
    /// `"Light"`, `"Camera"` or `"Mesh"`.
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub serialization_object: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    pub animations: Vec<AnimationDescriptor>,
    pub actions: Option<Value>,
    pub physics: Option<PhysicsDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationDescriptor {
    pub serialization_object: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleSystemDescriptor {
    /// The emitting node exists in the project on its own.
    pub has_emitter: bool,
    pub serialization_object: Value,
    pub emitter_position: Option<Vec3>,
}

impl ParticleSystemDescriptor {
    /// `emitterId` of the payload, if any.
    #[must_use]
    pub fn emitter_id(&self) -> Option<&str> {
        self.serialization_object.get("emitterId").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialDescriptor {
    /// Names of the meshes the material is assigned to.
    #[serde(deserialize_with = "nullable")]
    pub meshes_names: Vec<String>,
    pub serialized_values: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextureDescriptor {
    /// Create a copy in addition to reconciling by name.
    pub new_instance: bool,
    pub serialized_values: Value,
}

/// Descriptor carrying nothing but its payload (sounds, lens flares).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayloadDescriptor {
    pub serialization_object: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderTargetDescriptor {
    pub is_probe: bool,
    pub serialization_object: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectLayerDescriptor {
    /// Layer class, e.g. `GlowLayer`.
    pub name: String,
    pub serialization_object: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostProcessDescriptor {
    /// Pipeline class, e.g. `DefaultRenderingPipeline`.
    pub name: String,
    /// Attach the pipeline to every camera of the scene.
    #[serde(default = "default_true")]
    pub attach: bool,
    pub serialization_object: Value,
}

impl Default for PostProcessDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            attach: true,
            serialization_object: Value::Null,
        }
    }
}

/// Scene-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalConfiguration {
    pub clear_color: Option<Vec4>,
    pub ambient_color: Option<Vec3>,
    pub fog_mode: Option<u32>,
    pub fog_density: Option<f32>,
    pub fog_start: Option<f32>,
    pub fog_end: Option<f32>,
    pub fog_color: Option<Vec3>,
    pub gravity: Option<Vec3>,
    pub physics_enabled: Option<bool>,
    /// Serialized texture used for image-based lighting.
    pub environment_texture: Option<Value>,
    pub image_processing_configuration: Option<Value>,
    pub environment_helper: Option<Value>,
}
