use serde::Deserialize;
use uuid::Uuid;

/// Vertex data shared between meshes.
///
/// Geometries are registered with the scene independently of the meshes that
/// use them; a mesh refers to its geometry by id.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub id: String,
    pub uuid: Uuid,

    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Geometry {
    #[must_use]
    pub fn parse(payload: &VertexDataPayload) -> Self {
        Self {
            id: payload.id.clone(),
            uuid: Uuid::new_v4(),
            positions: payload.positions.clone(),
            normals: payload.normals.clone(),
            uvs: payload.uvs.clone(),
            indices: payload.indices.clone(),
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Serialized vertex data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VertexDataPayload {
    pub id: String,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Geometry block bundled with serialized meshes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometriesPayload {
    pub vertex_data: Vec<VertexDataPayload>,
}
