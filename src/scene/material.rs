use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

const STANDARD_MATERIAL_TYPE: &str = "BABYLON.StandardMaterial";

#[derive(Debug, Clone)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub uuid: Uuid,

    /// Editor class of the material (e.g. `BABYLON.StandardMaterial`).
    pub custom_type: String,

    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emissive: Vec3,
    pub ambient: Vec3,
    pub alpha: f32,
    pub back_face_culling: bool,
    pub wireframe: bool,

    /// Name of the texture sampled for the diffuse channel.
    pub diffuse_texture: Option<String>,
    /// Name of the texture sampled for the normal channel.
    pub bump_texture: Option<String>,

    pub metadata: Option<Value>,
}

impl Material {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let uuid = Uuid::new_v4();
        let id = id.into();
        Self {
            id: if id.is_empty() { uuid.to_string() } else { id },
            name: name.into(),
            uuid,
            custom_type: STANDARD_MATERIAL_TYPE.to_string(),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            emissive: Vec3::ZERO,
            ambient: Vec3::ZERO,
            alpha: 1.0,
            back_face_culling: true,
            wireframe: false,
            diffuse_texture: None,
            bump_texture: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn parse(payload: &MaterialPayload) -> Self {
        let mut material = Self::new(
            payload.id.clone().unwrap_or_default(),
            payload.name.as_deref().unwrap_or("Material"),
        );
        if let Some(custom_type) = &payload.custom_type {
            material.custom_type.clone_from(custom_type);
        }
        material.apply(payload);
        material
    }

    /// Applies a serialized material in place. Absent fields are left untouched.
    pub fn apply(&mut self, payload: &MaterialPayload) {
        if let Some(name) = &payload.name {
            self.name.clone_from(name);
        }
        if let Some(diffuse) = payload.diffuse {
            self.diffuse = diffuse;
        }
        if let Some(specular) = payload.specular {
            self.specular = specular;
        }
        if let Some(emissive) = payload.emissive {
            self.emissive = emissive;
        }
        if let Some(ambient) = payload.ambient {
            self.ambient = ambient;
        }
        if let Some(alpha) = payload.alpha {
            self.alpha = alpha;
        }
        if let Some(back_face_culling) = payload.back_face_culling {
            self.back_face_culling = back_face_culling;
        }
        if let Some(wireframe) = payload.wireframe {
            self.wireframe = wireframe;
        }
        if let Some(texture) = &payload.diffuse_texture {
            self.diffuse_texture = Some(texture.name.clone());
        }
        if let Some(texture) = &payload.bump_texture {
            self.bump_texture = Some(texture.name.clone());
        }
        if let Some(metadata) = &payload.metadata {
            self.metadata = Some(metadata.clone());
        }
    }
}

/// Reference to a texture inside a serialized material.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextureRef {
    pub name: String,
}

/// Serialized form of a material.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub custom_type: Option<String>,

    pub diffuse: Option<Vec3>,
    pub specular: Option<Vec3>,
    pub emissive: Option<Vec3>,
    pub ambient: Option<Vec3>,
    pub alpha: Option<f32>,
    pub back_face_culling: Option<bool>,
    pub wireframe: Option<bool>,

    pub diffuse_texture: Option<TextureRef>,
    pub bump_texture: Option<TextureRef>,

    pub metadata: Option<Value>,
}
