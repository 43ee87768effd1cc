use crate::errors::Result;
use crate::import::ImportContext;
use crate::import::materials::parse_texture;
use crate::project::GlobalConfiguration;
use crate::provenance::Provenance;
use crate::scene::{FogMode, TexturePayload};

/// Applies the project's scene-wide settings. Absent fields keep the
/// scene's current values.
pub(crate) fn import_environment(ctx: &mut ImportContext<'_>, config: &GlobalConfiguration) -> Result<()> {
    let env = &mut ctx.scene.environment;

    if let Some(clear_color) = config.clear_color {
        env.clear_color = clear_color;
    }
    if let Some(ambient_color) = config.ambient_color {
        env.ambient_color = ambient_color;
    }
    if let Some(mode) = config.fog_mode {
        env.fog.mode = FogMode::from_code(mode);
    }
    if let Some(density) = config.fog_density {
        env.fog.density = density;
    }
    if let Some(start) = config.fog_start {
        env.fog.start = start;
    }
    if let Some(end) = config.fog_end {
        env.fog.end = end;
    }
    if let Some(color) = config.fog_color {
        env.fog.color = color;
    }
    if let Some(gravity) = config.gravity {
        env.gravity = gravity;
    }
    if ctx.settings.enable_physics
        && let Some(enabled) = config.physics_enabled
    {
        env.physics_enabled = enabled;
    }
    if let Some(image_processing) = &config.image_processing_configuration {
        env.image_processing = Some(image_processing.clone());
    }
    if let Some(helper) = &config.environment_helper {
        env.helper = Some(helper.clone());
    }

    if let Some(value) = &config.environment_texture {
        let payload: TexturePayload = ctx.decode("environment texture", "environment", value)?;
        let texture = parse_texture(ctx, &payload);
        let key = ctx.scene.textures.insert(texture);
        ctx.tag(key, Provenance::ADDED);
        ctx.scene.environment.environment_texture = Some(key);
    }
    Ok(())
}
