use glam::Vec3;
use serde::Deserialize;
use uuid::Uuid;

use crate::scene::MeshKey;

#[derive(Debug, Clone)]
pub struct Sound {
    pub name: String,
    pub uuid: Uuid,
    pub url: String,

    pub autoplay: bool,
    pub looping: bool,
    pub volume: f32,
    pub playback_rate: f32,

    pub spatial: bool,
    pub max_distance: f32,
    pub position: Vec3,
    /// Mesh the sound follows, when spatial.
    pub connected_mesh: Option<MeshKey>,
}

impl Sound {
    #[must_use]
    pub fn parse(payload: &SoundPayload, url: String, connected_mesh: Option<MeshKey>) -> Self {
        Self {
            name: payload.name.clone(),
            uuid: Uuid::new_v4(),
            url,
            autoplay: payload.autoplay,
            looping: payload.r#loop,
            volume: payload.volume.unwrap_or(1.0),
            playback_rate: payload.playback_rate.unwrap_or(1.0),
            spatial: payload.spatial_sound,
            max_distance: payload.max_distance.unwrap_or(100.0),
            position: payload.position.unwrap_or(Vec3::ZERO),
            connected_mesh,
        }
    }
}

/// Serialized form of a sound.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoundPayload {
    pub name: String,
    /// Url of the audio file; defaults to the sound's name.
    pub url: Option<String>,
    pub autoplay: bool,
    pub r#loop: bool,
    pub volume: Option<f32>,
    pub playback_rate: Option<f32>,
    pub spatial_sound: bool,
    pub max_distance: Option<f32>,
    pub position: Option<Vec3>,
    pub connected_mesh_id: Option<String>,
}
