use glam::{Vec3, Vec4};
use serde::Deserialize;
use uuid::Uuid;

use crate::scene::{NodeHandle, TextureKey};

/// What a particle system emits from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emitter {
    /// A fixed point in world space.
    Point(Vec3),
    /// A node of the scene.
    Node(NodeHandle),
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub id: String,
    pub name: String,
    pub uuid: Uuid,

    pub capacity: u32,
    pub emitter: Option<Emitter>,
    pub particle_texture: Option<TextureKey>,

    pub emit_rate: f32,
    pub min_life_time: f32,
    pub max_life_time: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub min_emit_power: f32,
    pub max_emit_power: f32,

    pub color1: Vec4,
    pub color2: Vec4,
    pub color_dead: Vec4,
    pub gravity: Vec3,
    pub direction1: Vec3,
    pub direction2: Vec3,
    pub min_emit_box: Vec3,
    pub max_emit_box: Vec3,

    pub blend_mode: u32,
    pub auto_start: bool,
}

impl ParticleSystem {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        let uuid = Uuid::new_v4();
        let id = id.into();
        Self {
            id: if id.is_empty() { uuid.to_string() } else { id },
            name: name.into(),
            uuid,
            capacity,
            emitter: None,
            particle_texture: None,
            emit_rate: 10.0,
            min_life_time: 1.0,
            max_life_time: 1.0,
            min_size: 1.0,
            max_size: 1.0,
            min_emit_power: 1.0,
            max_emit_power: 1.0,
            color1: Vec4::ONE,
            color2: Vec4::ONE,
            color_dead: Vec4::new(0.0, 0.0, 0.0, 1.0),
            gravity: Vec3::ZERO,
            direction1: Vec3::Y,
            direction2: Vec3::Y,
            min_emit_box: Vec3::splat(-0.5),
            max_emit_box: Vec3::splat(0.5),
            blend_mode: 0,
            auto_start: true,
        }
    }

    /// Constructs a particle system from its serialized form.
    ///
    /// `emitter_node` is the node the payload's `emitterId` resolved to, if
    /// any. Without an `emitterId` the system emits from a point.
    #[must_use]
    pub fn parse(payload: &ParticleSystemPayload, emitter_node: Option<NodeHandle>) -> Self {
        let mut system = Self::new(
            payload.id.clone().unwrap_or_default(),
            payload.name.as_deref().unwrap_or("Particle System"),
            payload.capacity.unwrap_or(1000),
        );

        system.emitter = match &payload.emitter_id {
            Some(_) => emitter_node.map(Emitter::Node),
            None => Some(Emitter::Point(payload.emitter.unwrap_or(Vec3::ZERO))),
        };

        macro_rules! copy_fields {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = payload.$field {
                    system.$field = value;
                })*
            };
        }
        copy_fields!(
            emit_rate,
            min_life_time,
            max_life_time,
            min_size,
            max_size,
            min_emit_power,
            max_emit_power,
            color1,
            color2,
            color_dead,
            gravity,
            direction1,
            direction2,
            min_emit_box,
            max_emit_box,
            blend_mode,
        );
        if let Some(prevent_auto_start) = payload.prevent_auto_start {
            system.auto_start = !prevent_auto_start;
        }

        system
    }
}

/// Serialized form of a particle system.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSystemPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub capacity: Option<u32>,

    /// Id of the emitting node; absent for point emitters.
    pub emitter_id: Option<String>,
    /// Position of a point emitter.
    pub emitter: Option<Vec3>,

    /// File name of the particle texture, resolved against the root url.
    pub texture_name: Option<String>,
    /// Legacy inline texture, base64 encoded (optionally as a data URI).
    pub base64_texture: Option<String>,
    pub base64_texture_name: Option<String>,

    pub emit_rate: Option<f32>,
    pub min_life_time: Option<f32>,
    pub max_life_time: Option<f32>,
    pub min_size: Option<f32>,
    pub max_size: Option<f32>,
    pub min_emit_power: Option<f32>,
    pub max_emit_power: Option<f32>,

    pub color1: Option<Vec4>,
    pub color2: Option<Vec4>,
    pub color_dead: Option<Vec4>,
    pub gravity: Option<Vec3>,
    pub direction1: Option<Vec3>,
    pub direction2: Option<Vec3>,
    pub min_emit_box: Option<Vec3>,
    pub max_emit_box: Option<Vec3>,

    pub blend_mode: Option<u32>,
    pub prevent_auto_start: Option<bool>,
}
