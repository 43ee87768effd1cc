use serde::Deserialize;

use crate::scene::{LightKey, MeshKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowFilter {
    None,
    Poisson,
    Exponential,
    BlurExponential,
    PercentageCloser,
}

#[derive(Debug, Clone)]
pub struct ShadowGenerator {
    pub light: LightKey,
    pub map_size: u32,
    pub bias: f32,
    pub normal_bias: f32,
    pub darkness: f32,
    pub filter: ShadowFilter,
    /// Meshes casting shadows.
    pub render_list: Vec<MeshKey>,
}

impl ShadowGenerator {
    #[must_use]
    pub fn parse(payload: &ShadowGeneratorPayload, light: LightKey, render_list: Vec<MeshKey>) -> Self {
        let filter = if payload.use_percentage_closer_filtering {
            ShadowFilter::PercentageCloser
        } else if payload.use_blur_exponential_shadow_map {
            ShadowFilter::BlurExponential
        } else if payload.use_exponential_shadow_map {
            ShadowFilter::Exponential
        } else if payload.use_poisson_sampling {
            ShadowFilter::Poisson
        } else {
            ShadowFilter::None
        };

        Self {
            light,
            map_size: payload.map_size.unwrap_or(1024),
            bias: payload.bias.unwrap_or(0.000_05),
            normal_bias: payload.normal_bias.unwrap_or(0.0),
            darkness: payload.darkness.unwrap_or(0.0),
            filter,
            render_list,
        }
    }
}

/// Serialized form of a shadow generator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShadowGeneratorPayload {
    pub light_id: String,
    pub map_size: Option<u32>,
    pub bias: Option<f32>,
    pub normal_bias: Option<f32>,
    pub darkness: Option<f32>,
    pub use_poisson_sampling: bool,
    pub use_exponential_shadow_map: bool,
    pub use_blur_exponential_shadow_map: bool,
    pub use_percentage_closer_filtering: bool,
    /// Ids of the meshes casting shadows.
    pub render_list: Vec<String>,
}
