//! Asset Import Tests
//!
//! Tests for:
//! - Material reconciliation and assignment by mesh name
//! - Texture reconciliation by name, including `newInstance` copies
//! - Particle systems and legacy inline textures
//! - Shadow generators, sounds, scene actions
//! - Effect layers, render targets, lens flares, post-processes
//! - Environment settings
//! - Host asset components and extensions

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec3, Vec4};
use serde_json::{Value, json};

use project_importer::provenance::Provenance;
use project_importer::scene::{
    EffectLayerKind, Emitter, FogMode, LightKind, NodeCore, PipelineKind, TextureSource, Trigger,
};
use project_importer::{
    AssetComponent, Camera, Extension, ImportSettings, Light, Material, Mesh, ProjectDocument, ProjectImporter, Scene,
    Texture,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn import_with(importer: &mut ProjectImporter, scene: &mut Scene, doc: Value) {
    init_logger();
    let doc: ProjectDocument = serde_json::from_value(doc).expect("valid document");
    importer.import_blocking(scene, doc).expect("import succeeds");
}

fn import(scene: &mut Scene, doc: Value) {
    import_with(&mut ProjectImporter::default(), scene, doc);
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn existing_material_is_modified_and_assigned() {
    let mut scene = Scene::new();
    let material = scene.materials.insert(Material::new("mat", "Wood"));
    let mesh = scene.add_mesh(Mesh::new_empty("box", "Box"));

    import(
        &mut scene,
        json!({
            "materials": [{
                "meshesNames": ["Box", "Missing"],
                "serializedValues": { "id": "mat", "alpha": 0.5 }
            }]
        }),
    );

    assert_eq!(scene.materials.len(), 1);
    assert!((scene.materials[material].alpha - 0.5).abs() < f32::EPSILON);
    assert!(scene.provenance.has(material, Provenance::MODIFIED));
    assert_eq!(scene.meshes[mesh].material, Some(material));
}

#[test]
fn material_assignment_skips_instances() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Rock",
                "type": "Mesh",
                "serializationObject": {
                    "meshes": [{ "id": "rock", "name": "Rock", "instances": [{ "id": "rock-2", "name": "Rock 2" }] }]
                }
            }],
            "materials": [{
                "meshesNames": ["Rock", "Rock 2"],
                "serializedValues": { "id": "stone", "name": "Stone" }
            }]
        }),
    );

    let material = scene.get_material_by_id("stone").unwrap();
    assert!(scene.provenance.has(material, Provenance::ADDED));

    let rock = scene.get_mesh_by_id("rock").unwrap();
    let instance = scene.get_mesh_by_id("rock-2").unwrap();
    assert_eq!(scene.meshes[rock].material, Some(material));
    assert_eq!(scene.meshes[instance].material, None);
}

// ============================================================================
// Textures
// ============================================================================

#[test]
fn new_instance_texture_adds_copy_and_modifies_original() {
    let mut scene = Scene::new();
    let original = scene.textures.insert(Texture::new("wood.png"));

    import(
        &mut scene,
        json!({
            "textures": [{ "newInstance": true, "serializedValues": { "name": "wood.png", "level": 0.5 } }]
        }),
    );

    assert_eq!(scene.textures.len(), 2);
    assert!(scene.provenance.has(original, Provenance::MODIFIED));
    assert!((scene.textures[original].level - 0.5).abs() < f32::EPSILON);

    let (copy, _) = scene.textures.iter().find(|(k, _)| *k != original).unwrap();
    assert!(scene.provenance.has(copy, Provenance::ADDED));
    assert_eq!(scene.textures[copy].name, "wood.png");
}

#[test]
fn unknown_texture_is_added_with_resolved_url() {
    let mut scene = Scene::new();
    let mut importer = ProjectImporter::new(ImportSettings {
        root_url: "assets/".into(),
        ..Default::default()
    });

    import_with(
        &mut importer,
        &mut scene,
        json!({ "textures": [{ "serializedValues": { "name": "grass.png", "uScale": 4 } }] }),
    );

    let key = scene.get_texture_by_name("grass.png").unwrap();
    let texture = &scene.textures[key];
    assert_eq!(texture.source, Some(TextureSource::Url("assets/grass.png".into())));
    assert!((texture.scale.x - 4.0).abs() < f32::EPSILON);
    assert_eq!(scene.provenance.get(key), Provenance::ADDED);
}

// ============================================================================
// Particle systems
// ============================================================================

#[test]
fn legacy_base64_texture_is_decoded() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "particleSystems": [{
                "serializationObject": {
                    "name": "sparks",
                    "emitter": [0, 1, 0],
                    "base64TextureName": "data:flare.png",
                    "base64Texture": "data:image/png;base64,aGk="
                }
            }]
        }),
    );

    let (key, system) = scene.particle_systems.iter().next().unwrap();
    assert_eq!(system.emitter, Some(Emitter::Point(Vec3::Y)));
    assert!(scene.provenance.has(key, Provenance::ADDED));

    let texture = &scene.textures[system.particle_texture.unwrap()];
    assert_eq!(texture.name, "flare.png");
    assert_eq!(texture.source, Some(TextureSource::Bytes(b"hi".to_vec())));
}

#[test]
fn broken_base64_texture_is_skipped() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "particleSystems": [{
                "serializationObject": { "base64TextureName": "data:x.png", "base64Texture": "%%%" }
            }]
        }),
    );

    assert_eq!(scene.particle_systems.len(), 1);
    assert!(scene.textures.is_empty());
}

#[test]
fn point_emitter_takes_emitter_position() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "particleSystems": [{ "serializationObject": { "capacity": 50 }, "emitterPosition": [4, 0, 0] }]
        }),
    );

    let (_, system) = scene.particle_systems.iter().next().unwrap();
    assert_eq!(system.capacity, 50);
    assert_eq!(system.emitter, Some(Emitter::Point(Vec3::new(4.0, 0.0, 0.0))));
}

// ============================================================================
// Shadows, sounds, scene actions
// ============================================================================

#[test]
fn shadow_generator_needs_known_light() {
    let mut scene = Scene::new();
    let light = scene.add_light(Light::new(NodeCore::new("sun", "Sun"), LightKind::Directional));
    let caster = scene.add_mesh(Mesh::new_empty("caster", "Caster"));

    import(
        &mut scene,
        json!({
            "shadowGenerators": [
                { "lightId": "sun", "mapSize": 2048, "renderList": ["caster", "ghost"], "usePoissonSampling": true },
                { "lightId": "moon" }
            ]
        }),
    );

    assert_eq!(scene.shadow_generators.len(), 1);
    let (key, generator) = scene.shadow_generators.iter().next().unwrap();
    assert_eq!(generator.light, light);
    assert_eq!(generator.map_size, 2048);
    assert_eq!(generator.render_list, vec![caster]);
    assert!(scene.provenance.has(key, Provenance::ADDED));
}

#[test]
fn sound_url_is_resolved_and_mesh_connected() {
    let mut scene = Scene::new();
    let speaker = scene.add_mesh(Mesh::new_empty("speaker", "Speaker"));
    let mut importer = ProjectImporter::new(ImportSettings {
        root_url: "audio/".into(),
        ..Default::default()
    });

    import_with(
        &mut importer,
        &mut scene,
        json!({
            "sounds": [{
                "serializationObject": { "name": "music.mp3", "loop": true, "spatialSound": true, "connectedMeshId": "speaker" }
            }]
        }),
    );

    let (_, sound) = scene.sounds.iter().next().unwrap();
    assert_eq!(sound.url, "audio/music.mp3");
    assert!(sound.looping);
    assert_eq!(sound.connected_mesh, Some(speaker));
}

#[test]
fn scene_actions_replace_previous_manager() {
    let mut scene = Scene::new();
    let doc = json!({
        "actions": {
            "name": "Scene",
            "children": [{
                "type": "trigger",
                "name": "OnKeyDownTrigger",
                "properties": [{ "name": "parameter", "value": "r" }],
                "children": [{ "type": "action", "name": "PlayAnimationAction" }]
            }]
        }
    });

    import(&mut scene, doc.clone());
    import(&mut scene, doc);

    assert_eq!(scene.action_managers.len(), 1);
    let manager = &scene.action_managers[scene.action_manager.unwrap()];
    assert_eq!(manager.owner, None);
    assert_eq!(manager.triggers[0].trigger, Trigger::OnKeyDown);
    assert_eq!(manager.triggers[0].parameter, Some(json!("r")));
}

// ============================================================================
// Effects
// ============================================================================

#[test]
fn effect_layers_drop_legacy_rendering_group() {
    let mut scene = Scene::new();
    let glowing = scene.add_mesh(Mesh::new_empty("lamp", "Lamp"));

    import(
        &mut scene,
        json!({
            "effectLayers": [
                { "name": "GlowLayer", "serializationObject": { "renderingGroupId": 2, "intensity": 0.7, "includedMeshes": ["lamp"] } },
                { "name": "HighlightLayer", "serializationObject": { "meshes": [{ "meshId": "lamp", "color": [1, 0, 0, 1] }] } },
                { "name": "BlurLayer", "serializationObject": {} }
            ]
        }),
    );

    assert_eq!(scene.effect_layers.len(), 2);
    let mut layers = scene.effect_layers.values();

    let glow = layers.next().unwrap();
    assert_eq!(glow.rendering_group_id, -1);
    assert_eq!(glow.kind, EffectLayerKind::Glow { intensity: 0.7, blur_kernel_size: 32 });
    assert_eq!(glow.included_meshes, vec![glowing]);

    let highlight = layers.next().unwrap();
    match &highlight.kind {
        EffectLayerKind::Highlight { meshes, .. } => assert_eq!(meshes, &vec![(glowing, Vec4::new(1.0, 0.0, 0.0, 1.0))]),
        other => panic!("unexpected layer {other:?}"),
    }
}

#[test]
fn render_targets_split_into_probes_and_textures() {
    let mut scene = Scene::new();
    let mirror = scene.add_mesh(Mesh::new_empty("mirror", "Mirror"));

    import(
        &mut scene,
        json!({
            "renderTargets": [
                { "isProbe": true, "serializationObject": { "name": "probe", "renderTargetSize": 256, "attachedMeshId": "mirror" } },
                { "isProbe": false, "serializationObject": { "name": "rtt", "renderList": ["mirror"] } }
            ]
        }),
    );

    let (_, probe) = scene.reflection_probes.iter().next().unwrap();
    assert_eq!(probe.size, 256);
    assert_eq!(probe.attached_mesh, Some(mirror));

    assert_eq!(scene.custom_render_targets.len(), 1);
    let target = &scene.textures[scene.custom_render_targets[0]];
    assert!(target.is_render_target());
    assert_eq!(target.render_target.as_ref().unwrap().render_list, vec![mirror]);
}

#[test]
fn lens_flares_need_known_emitter() {
    let mut scene = Scene::new();
    scene.add_light(Light::new(NodeCore::new("sun", "Sun"), LightKind::Point));

    import(
        &mut scene,
        json!({
            "lensFlares": [
                { "serializationObject": { "name": "flares", "emitterId": "sun", "flares": [{ "size": 0.2, "position": 0.5, "color": [1, 1, 1], "textureName": "flare.png" }] } },
                { "serializationObject": { "name": "lost", "emitterId": "nowhere" } }
            ]
        }),
    );

    assert_eq!(scene.lens_flare_systems.len(), 1);
    let (_, system) = scene.lens_flare_systems.iter().next().unwrap();
    assert_eq!(system.flares.len(), 1);
    assert_eq!(system.flares[0].texture_url.as_deref(), Some("flare.png"));
}

#[test]
fn post_processes_attach_to_cameras() {
    let mut scene = Scene::new();
    let camera = scene.add_camera(Camera::new(NodeCore::new("cam", "Camera")));

    import(
        &mut scene,
        json!({
            "postProcesses": [
                { "name": "DefaultRenderingPipeline", "serializationObject": { "bloomEnabled": true } },
                { "name": "SSAO2RenderingPipeline", "attach": false, "serializationObject": {} },
                { "name": "MotionBlurPipeline", "serializationObject": {} }
            ]
        }),
    );

    assert_eq!(scene.post_processes.len(), 2);
    let mut pipelines = scene.post_processes.values();

    let default = pipelines.next().unwrap();
    assert_eq!(default.kind, PipelineKind::Default);
    assert_eq!(default.cameras, vec![camera]);
    assert_eq!(default.settings, json!({ "bloomEnabled": true }));

    let ssao = pipelines.next().unwrap();
    assert_eq!(ssao.kind, PipelineKind::Ssao);
    assert!(ssao.cameras.is_empty());
}

// ============================================================================
// Environment
// ============================================================================

#[test]
fn global_configuration_updates_environment() {
    let mut scene = Scene::new();
    let default_gravity = scene.environment.gravity;

    import(
        &mut scene,
        json!({
            "globalConfiguration": {
                "clearColor": [0, 0, 0, 1],
                "fogMode": 3,
                "fogEnd": 50,
                "physicsEnabled": true,
                "environmentTexture": { "name": "sky.env", "isCube": true },
                "imageProcessingConfiguration": { "exposure": 1.2 }
            }
        }),
    );

    let env = &scene.environment;
    assert_eq!(env.clear_color, Vec4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(env.fog.mode, FogMode::Linear);
    assert!((env.fog.end - 50.0).abs() < f32::EPSILON);
    assert_eq!(env.gravity, default_gravity);
    assert!(env.physics_enabled);
    assert_eq!(env.image_processing, Some(json!({ "exposure": 1.2 })));

    let texture = env.environment_texture.expect("environment texture");
    assert!(scene.textures[texture].is_cube);
    assert!(scene.provenance.has(texture, Provenance::ADDED));
}

// ============================================================================
// Host hooks
// ============================================================================

struct Prefabs {
    seen: Rc<RefCell<Vec<Value>>>,
    cleared: Rc<RefCell<usize>>,
}

impl AssetComponent for Prefabs {
    fn id(&self) -> &str {
        "prefabs"
    }

    fn clear(&mut self) {
        *self.cleared.borrow_mut() += 1;
    }

    fn on_parse_assets(&mut self, _scene: &mut Scene, data: &Value) {
        self.seen.borrow_mut().push(data.clone());
    }
}

struct Title;

impl Extension for Title {
    fn on_load(&mut self, scene: &mut Scene, data: &Value) {
        if let Some(title) = data.get("title").and_then(Value::as_str) {
            scene.name = title.to_string();
        }
    }
}

#[test]
fn assets_and_extensions_receive_their_entries() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let cleared = Rc::new(RefCell::new(0));

    let mut importer = ProjectImporter::default();
    importer.assets.register(Prefabs {
        seen: Rc::clone(&seen),
        cleared: Rc::clone(&cleared),
    });
    importer.extensions.register("title", || Title);

    let mut scene = Scene::new();
    import_with(
        &mut importer,
        &mut scene,
        json!({
            "assets": { "prefabs": [{ "name": "tree" }], "unknown": {} },
            "customMetadatas": { "title": { "title": "Level 2" }, "notRegistered": 1 }
        }),
    );

    assert_eq!(*cleared.borrow(), 1);
    assert_eq!(*seen.borrow(), vec![json!([{ "name": "tree" }])]);
    assert_eq!(scene.name, "Level 2");
    assert_eq!(importer.extensions.loaded().collect::<Vec<_>>(), vec!["title"]);
}
