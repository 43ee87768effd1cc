//! Screen-space and view-dependent effects: effect layers, lens flares,
//! reflection probes and post-process pipelines.

use glam::{Vec3, Vec4};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::scene::{CameraKey, MeshKey, NodeHandle};

/// Rendering group used when a layer does not pin one.
pub const DEFAULT_RENDERING_GROUP: i32 = -1;

// ============================================================================
// Effect layers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EffectLayerKind {
    Glow {
        intensity: f32,
        blur_kernel_size: u32,
    },
    Highlight {
        inner_glow: bool,
        outer_glow: bool,
        /// Highlighted meshes with their glow colour.
        meshes: Vec<(MeshKey, Vec4)>,
    },
}

#[derive(Debug, Clone)]
pub struct EffectLayer {
    pub name: String,
    pub uuid: Uuid,
    pub kind: EffectLayerKind,
    pub rendering_group_id: i32,
    pub included_meshes: Vec<MeshKey>,
    pub excluded_meshes: Vec<MeshKey>,
}

impl EffectLayer {
    /// Constructs a layer; `lookup` resolves mesh ids.
    ///
    /// Returns `None` for layer classes the importer does not know.
    pub fn parse(payload: &EffectLayerPayload, lookup: impl Fn(&str) -> Option<MeshKey>) -> Option<Self> {
        let resolve = |ids: &[String]| ids.iter().filter_map(|id| lookup(id.as_str())).collect::<Vec<_>>();

        let kind = match payload.custom_type.as_str() {
            "BABYLON.GlowLayer" => EffectLayerKind::Glow {
                intensity: payload.intensity.unwrap_or(1.0),
                blur_kernel_size: payload.blur_kernel_size.unwrap_or(32),
            },
            "BABYLON.HighlightLayer" => EffectLayerKind::Highlight {
                inner_glow: payload.inner_glow.unwrap_or(true),
                outer_glow: payload.outer_glow.unwrap_or(true),
                meshes: payload
                    .meshes
                    .iter()
                    .filter_map(|entry| lookup(entry.mesh_id.as_str()).map(|key| (key, entry.color)))
                    .collect(),
            },
            _ => return None,
        };

        Some(Self {
            name: payload.name.clone(),
            uuid: Uuid::new_v4(),
            kind,
            rendering_group_id: payload.rendering_group_id.unwrap_or(DEFAULT_RENDERING_GROUP),
            included_meshes: resolve(&payload.included_meshes),
            excluded_meshes: resolve(&payload.excluded_meshes),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightedMeshPayload {
    pub mesh_id: String,
    pub color: Vec4,
}

/// Serialized form of an effect layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectLayerPayload {
    pub name: String,
    pub custom_type: String,
    pub rendering_group_id: Option<i32>,
    pub intensity: Option<f32>,
    pub blur_kernel_size: Option<u32>,
    pub inner_glow: Option<bool>,
    pub outer_glow: Option<bool>,
    pub meshes: Vec<HighlightedMeshPayload>,
    pub included_meshes: Vec<String>,
    pub excluded_meshes: Vec<String>,
}

// ============================================================================
// Lens flares
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LensFlare {
    pub size: f32,
    pub position: f32,
    pub color: Vec3,
    pub texture_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LensFlareSystem {
    pub id: String,
    pub name: String,
    pub emitter: NodeHandle,
    pub border_limit: f32,
    pub flares: Vec<LensFlare>,
}

impl LensFlareSystem {
    #[must_use]
    pub fn parse(payload: &LensFlareSystemPayload, emitter: NodeHandle, resolve_url: impl Fn(&str) -> String) -> Self {
        Self {
            id: payload.id.clone(),
            name: payload.name.clone(),
            emitter,
            border_limit: payload.border_limit.unwrap_or(300.0),
            flares: payload
                .flares
                .iter()
                .map(|flare| LensFlare {
                    size: flare.size,
                    position: flare.position,
                    color: flare.color,
                    texture_url: flare.texture_name.as_deref().map(&resolve_url),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LensFlarePayload {
    pub size: f32,
    pub position: f32,
    pub color: Vec3,
    pub texture_name: Option<String>,
}

/// Serialized form of a lens-flare system.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LensFlareSystemPayload {
    pub id: String,
    pub name: String,
    pub emitter_id: String,
    pub border_limit: Option<f32>,
    pub flares: Vec<LensFlarePayload>,
}

// ============================================================================
// Reflection probes
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReflectionProbe {
    pub name: String,
    pub uuid: Uuid,
    pub size: u32,
    pub refresh_rate: i32,
    pub position: Vec3,
    pub attached_mesh: Option<MeshKey>,
    pub render_list: Vec<MeshKey>,
}

impl ReflectionProbe {
    #[must_use]
    pub fn parse(payload: &ReflectionProbePayload, lookup: impl Fn(&str) -> Option<MeshKey>) -> Self {
        Self {
            name: payload.name.clone(),
            uuid: Uuid::new_v4(),
            size: payload.render_target_size.unwrap_or(512),
            refresh_rate: payload.refresh_rate.unwrap_or(1),
            position: payload.position.unwrap_or(Vec3::ZERO),
            attached_mesh: payload.attached_mesh_id.as_deref().and_then(&lookup),
            render_list: payload.render_list.iter().filter_map(|id| lookup(id.as_str())).collect(),
        }
    }
}

/// Serialized form of a reflection probe.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflectionProbePayload {
    pub name: String,
    pub render_target_size: Option<u32>,
    pub refresh_rate: Option<i32>,
    pub position: Option<Vec3>,
    pub attached_mesh_id: Option<String>,
    pub render_list: Vec<String>,
}

// ============================================================================
// Post-process pipelines
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Standard,
    Ssao,
    Default,
}

impl PipelineKind {
    /// Maps the editor's pipeline name; unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardRenderingPipeline" => Some(Self::Standard),
            "SSAORenderingPipeline" | "SSAO2RenderingPipeline" => Some(Self::Ssao),
            "DefaultRenderingPipeline" => Some(Self::Default),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostProcessPipeline {
    pub name: String,
    pub kind: PipelineKind,
    /// Cameras the pipeline renders for.
    pub cameras: Vec<CameraKey>,
    /// Pipeline parameters, forwarded untouched to the renderer.
    pub settings: Value,
}
