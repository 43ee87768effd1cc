use glam::Vec3;
use serde::Deserialize;

use crate::scene::node::{NodeCore, NodeFields};

// Editor light type codes.
const LIGHT_TYPE_POINT: u32 = 0;
const LIGHT_TYPE_DIRECTIONAL: u32 = 1;
const LIGHT_TYPE_SPOT: u32 = 2;
const LIGHT_TYPE_HEMISPHERIC: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    /// Cone angle in radians.
    pub angle: f32,
    pub exponent: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HemisphericLight {
    pub ground_color: Vec3,
}

// High-level abstraction: light component in the scene
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Point,
    Directional,
    Spot(SpotLight),
    Hemispheric(HemisphericLight),
}

impl LightKind {
    fn from_code(code: u32, payload: &LightPayload) -> Self {
        match code {
            LIGHT_TYPE_DIRECTIONAL => Self::Directional,
            LIGHT_TYPE_SPOT => Self::Spot(SpotLight {
                angle: payload.angle.unwrap_or(std::f32::consts::FRAC_PI_4),
                exponent: payload.exponent.unwrap_or(2.0),
            }),
            LIGHT_TYPE_HEMISPHERIC => Self::Hemispheric(HemisphericLight {
                ground_color: payload.ground_color.unwrap_or(Vec3::ZERO),
            }),
            LIGHT_TYPE_POINT => Self::Point,
            other => {
                log::warn!("Unknown light type code {other}, importing as point light");
                Self::Point
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Light {
    pub core: NodeCore,
    pub kind: LightKind,

    pub direction: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub shadow_enabled: bool,
}

impl Light {
    #[must_use]
    pub fn new(core: NodeCore, kind: LightKind) -> Self {
        Self {
            core,
            kind,
            direction: Vec3::NEG_Y,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            intensity: 1.0,
            range: f32::MAX,
            shadow_enabled: true,
        }
    }

    /// Constructs a new light from its serialized form.
    #[must_use]
    pub fn parse(payload: &LightPayload) -> Self {
        let kind = LightKind::from_code(payload.light_type.unwrap_or(LIGHT_TYPE_POINT), payload);
        let mut light = Self::new(NodeCore::parse(&payload.node, "Light"), kind);
        light.apply_properties(payload);
        light
    }

    /// Applies a serialized light onto this one in place.
    ///
    /// The light's kind is fixed at construction; only the parameters of the
    /// current kind are updated.
    pub fn apply(&mut self, payload: &LightPayload) {
        self.core.apply(&payload.node);
        self.apply_properties(payload);
        match &mut self.kind {
            LightKind::Spot(spot) => {
                if let Some(angle) = payload.angle {
                    spot.angle = angle;
                }
                if let Some(exponent) = payload.exponent {
                    spot.exponent = exponent;
                }
            }
            LightKind::Hemispheric(hemi) => {
                if let Some(ground_color) = payload.ground_color {
                    hemi.ground_color = ground_color;
                }
            }
            LightKind::Point | LightKind::Directional => {}
        }
    }

    fn apply_properties(&mut self, payload: &LightPayload) {
        if let Some(direction) = payload.direction {
            self.direction = direction;
        }
        if let Some(diffuse) = payload.diffuse {
            self.diffuse = diffuse;
        }
        if let Some(specular) = payload.specular {
            self.specular = specular;
        }
        if let Some(intensity) = payload.intensity {
            self.intensity = intensity;
        }
        if let Some(range) = payload.range {
            self.range = range;
        }
        if let Some(shadow_enabled) = payload.shadow_enabled {
            self.shadow_enabled = shadow_enabled;
        }
    }
}

/// Serialized form of a light.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightPayload {
    #[serde(flatten)]
    pub node: NodeFields,

    #[serde(rename = "type")]
    pub light_type: Option<u32>,
    pub direction: Option<Vec3>,
    pub diffuse: Option<Vec3>,
    pub specular: Option<Vec3>,
    pub intensity: Option<f32>,
    pub range: Option<f32>,
    pub shadow_enabled: Option<bool>,

    pub angle: Option<f32>,
    pub exponent: Option<f32>,
    pub ground_color: Option<Vec3>,
}
