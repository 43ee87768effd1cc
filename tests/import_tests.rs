//! Node Import Tests
//!
//! Tests for:
//! - Light/camera/mesh reconciliation (modify existing by id, add otherwise)
//! - Mesh bundles, geometry registration and instances
//! - Particle emitter synthesis
//! - Deferred parent links
//! - Animations, actions and physics attached to bound nodes
//! - Hard failures (unknown type tag, undecodable payload)

use glam::Vec3;
use serde_json::{Value, json};

use project_importer::import::ImportPhase;
use project_importer::provenance::Provenance;
use project_importer::scene::{Emitter, LightKind, NodeCore, NodeHandle};
use project_importer::{Camera, ImportError, ImportSettings, Light, Mesh, ProjectDocument, ProjectImporter, Scene};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn import_with(importer: &mut ProjectImporter, scene: &mut Scene, doc: Value) -> project_importer::Result<()> {
    init_logger();
    let doc: ProjectDocument = serde_json::from_value(doc).expect("valid document");
    importer.import_blocking(scene, doc)
}

fn import(scene: &mut Scene, doc: Value) -> project_importer::Result<()> {
    import_with(&mut ProjectImporter::default(), scene, doc)
}

// ============================================================================
// Lights & Cameras
// ============================================================================

#[test]
fn existing_light_is_modified_in_place() {
    let mut scene = Scene::new();
    let mut core = NodeCore::new("L1", "Sun");
    core.metadata = Some(json!("owned by host"));
    let key = scene.add_light(Light::new(core, LightKind::Directional));

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Sun",
                "id": "L1",
                "type": "Light",
                "serializationObject": {
                    "id": "L1",
                    "name": "Sun",
                    "type": 1,
                    "intensity": 2.5,
                    "metadata": { "overwritten": true }
                }
            }]
        }),
    )
    .unwrap();

    assert_eq!(scene.lights.len(), 1);
    let light = &scene.lights[key];
    assert!((light.intensity - 2.5).abs() < f32::EPSILON);
    assert_eq!(light.core.metadata, Some(json!("owned by host")));
    assert!(scene.provenance.has(key, Provenance::MODIFIED));
    assert!(!scene.provenance.has(key, Provenance::ADDED));
}

#[test]
fn unknown_light_id_adds_one_light() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Lamp",
                "type": "Light",
                "serializationObject": { "id": "L2", "name": "Lamp", "type": 2, "angle": 0.5 }
            }]
        }),
    )
    .unwrap();

    assert_eq!(scene.lights.len(), 1);
    let key = scene.get_light_by_id("L2").unwrap();
    assert!(matches!(scene.lights[key].kind, LightKind::Spot(ref spot) if (spot.angle - 0.5).abs() < f32::EPSILON));
    assert_eq!(scene.provenance.get(key), Provenance::ADDED);
}

#[test]
fn existing_camera_keeps_identity() {
    let mut scene = Scene::new();
    let key = scene.add_camera(Camera::new(NodeCore::new("C1", "Main")));
    let uuid = scene.cameras[key].core.uuid;

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Main",
                "type": "Camera",
                "serializationObject": { "id": "C1", "fov": 1.2, "position": [0, 5, -10] }
            }]
        }),
    )
    .unwrap();

    assert_eq!(scene.cameras.len(), 1);
    let camera = &scene.cameras[key];
    assert_eq!(camera.core.uuid, uuid);
    assert_eq!(camera.core.transform.position, Vec3::new(0.0, 5.0, -10.0));
    assert!(scene.provenance.has(key, Provenance::MODIFIED));
}

#[test]
fn descriptor_id_used_when_payload_has_none() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{ "name": "Cam", "id": "C9", "type": "Camera", "serializationObject": { "name": "Cam" } }]
        }),
    )
    .unwrap();

    assert!(scene.get_camera_by_id("C9").is_some());
}

// ============================================================================
// Meshes
// ============================================================================

#[test]
fn mesh_bundle_registers_geometry_and_binds_last_mesh() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Boxes",
                "type": "Mesh",
                "serializationObject": {
                    "geometries": { "vertexData": [{ "id": "g1", "positions": [0, 0, 0, 1, 0, 0, 0, 1, 0], "indices": [0, 1, 2] }] },
                    "meshes": [
                        { "id": "m1", "name": "First", "geometryId": "g1" },
                        { "id": "m2", "name": "Second", "geometryId": "g1" }
                    ]
                },
                "animations": [{ "serializationObject": { "name": "spin", "property": "rotation.y", "dataType": 0, "keys": [] } }]
            }]
        }),
    )
    .unwrap();

    assert_eq!(scene.geometries.len(), 1);
    let geometry = scene.get_geometry_by_id("g1").unwrap();
    assert_eq!(scene.geometries[geometry].vertex_count(), 3);

    let first = scene.get_mesh_by_id("m1").unwrap();
    let second = scene.get_mesh_by_id("m2").unwrap();
    assert_eq!(scene.meshes[first].geometry, Some(geometry));
    assert!(scene.meshes[first].core.animations.is_empty());
    assert_eq!(scene.meshes[second].core.animations.len(), 1);
}

#[test]
fn known_geometry_is_not_registered_twice() {
    let mut scene = Scene::new();
    let node = |mesh_id: &str| {
        json!({
            "name": mesh_id,
            "type": "Mesh",
            "serializationObject": {
                "geometries": { "vertexData": [{ "id": "shared" }] },
                "meshes": [{ "id": mesh_id, "geometryId": "shared" }]
            }
        })
    };

    import(&mut scene, json!({ "nodes": [node("a"), node("b")] })).unwrap();

    assert_eq!(scene.geometries.len(), 1);
    assert_eq!(scene.meshes.len(), 2);
}

#[test]
fn existing_mesh_is_modified() {
    let mut scene = Scene::new();
    let key = scene.add_mesh(Mesh::new_empty("m1", "Box"));

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Box",
                "type": "Mesh",
                "serializationObject": { "meshes": [{ "id": "m1", "isVisible": false }] }
            }]
        }),
    )
    .unwrap();

    assert_eq!(scene.meshes.len(), 1);
    assert!(!scene.meshes[key].visible);
    assert!(scene.provenance.has(key, Provenance::MODIFIED));
}

#[test]
fn instances_are_created_with_their_source() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Tree",
                "type": "Mesh",
                "serializationObject": {
                    "meshes": [{
                        "id": "tree",
                        "name": "Tree",
                        "instances": [{ "id": "tree-1", "name": "Tree 1", "position": [3, 0, 0] }]
                    }]
                }
            }]
        }),
    )
    .unwrap();

    let source = scene.get_mesh_by_id("tree").unwrap();
    let instance = scene.get_mesh_by_id("tree-1").unwrap();
    assert!(scene.meshes[instance].is_instance());
    assert_eq!(scene.meshes[instance].source(), Some(source));
    assert!(scene.provenance.has(instance, Provenance::ADDED));
}

// ============================================================================
// Emitter synthesis
// ============================================================================

#[test]
fn emitter_is_synthesized_for_particle_system() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{ "name": "Fountain", "id": "E1" }],
            "particleSystems": [{
                "hasEmitter": false,
                "serializationObject": { "name": "water", "emitterId": "E1" },
                "emitterPosition": [1, 2, 3]
            }]
        }),
    )
    .unwrap();

    let emitter = scene.get_mesh_by_id("E1").expect("synthesized emitter");
    assert_eq!(scene.meshes[emitter].core.name, "Fountain");
    assert!(scene.provenance.has(emitter, Provenance::ADDED_PARTICLE_SYSTEM));
    assert_eq!(scene.meshes[emitter].core.transform.position, Vec3::new(1.0, 2.0, 3.0));

    let (_, system) = scene.particle_systems.iter().next().unwrap();
    assert_eq!(system.emitter, Some(Emitter::Node(NodeHandle::Mesh(emitter))));
}

#[test]
fn no_emitter_synthesized_when_system_has_its_own() {
    let mut scene = Scene::new();
    let light = scene.add_light(Light::new(NodeCore::new("E2", "Torch"), LightKind::Point));

    import(
        &mut scene,
        json!({
            "nodes": [{ "name": "Torch", "id": "E2" }],
            "particleSystems": [{ "hasEmitter": true, "serializationObject": { "emitterId": "E2" } }]
        }),
    )
    .unwrap();

    assert!(scene.meshes.is_empty());
    let (_, system) = scene.particle_systems.iter().next().unwrap();
    assert_eq!(system.emitter, Some(Emitter::Node(NodeHandle::Light(light))));
}

// ============================================================================
// Deferred parents
// ============================================================================

#[test]
fn child_before_parent_is_linked() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [
                {
                    "name": "Child",
                    "type": "Mesh",
                    "serializationObject": { "meshes": [{ "id": "child", "parentId": "P" }] }
                },
                {
                    "name": "Parent",
                    "type": "Light",
                    "serializationObject": { "id": "P", "position": [0, 10, 0] }
                }
            ]
        }),
    )
    .unwrap();

    let child = NodeHandle::Mesh(scene.get_mesh_by_id("child").unwrap());
    let parent = NodeHandle::Light(scene.get_light_by_id("P").unwrap());
    assert_eq!(scene.node_core(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.children_of(parent), vec![child]);
    assert_eq!(Vec3::from(scene.world_matrix(child).translation), Vec3::new(0.0, 10.0, 0.0));
}

#[test]
fn dangling_parent_leaves_node_at_root() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{ "name": "Orphan", "type": "Camera", "serializationObject": { "id": "o", "parentId": "nobody" } }]
        }),
    )
    .unwrap();

    let orphan = NodeHandle::Camera(scene.get_camera_by_id("o").unwrap());
    assert_eq!(scene.node_core(orphan).unwrap().parent(), None);
}

#[test]
fn dangling_parent_detaches_existing_node() {
    let mut scene = Scene::new();
    let old_parent = NodeHandle::Mesh(scene.add_mesh(Mesh::new_empty("P", "P")));
    let child = NodeHandle::Light(scene.add_light(Light::new(NodeCore::new("C", "C"), LightKind::Point)));
    assert!(scene.attach(child, old_parent));

    import(
        &mut scene,
        json!({
            "nodes": [{ "name": "C", "type": "Light", "serializationObject": { "id": "C", "parentId": "ghost" } }]
        }),
    )
    .unwrap();

    assert_eq!(scene.node_count(), 2);
    assert_eq!(scene.node_core(child).unwrap().parent(), None);
    assert!(scene.children_of(old_parent).is_empty());
}

// ============================================================================
// Animations, actions, physics
// ============================================================================

#[test]
fn scene_root_receives_animations() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{
                "name": "Scene",
                "animations": [{ "serializationObject": { "name": "fade", "property": "alpha", "dataType": 0, "keys": [{ "frame": 0, "values": [1] }] } }]
            }]
        }),
    )
    .unwrap();

    assert_eq!(scene.root_animations.len(), 1);
    let key = scene.root_animations[0];
    assert_eq!(scene.animations[key].name, "fade");
    assert!(scene.provenance.has(key, Provenance::ADDED));
}

#[test]
fn reference_only_node_missing_from_scene_is_skipped() {
    let mut scene = Scene::new();

    import(
        &mut scene,
        json!({
            "nodes": [{ "name": "Ghost", "animations": [{ "serializationObject": { "name": "a", "dataType": 0 } }] }]
        }),
    )
    .unwrap();

    assert!(scene.animations.is_empty());
}

#[test]
fn mesh_actions_and_physics_are_attached() {
    let mut scene = Scene::new();
    let key = scene.add_mesh(Mesh::new_empty("crate", "Crate"));

    let doc = json!({
        "nodes": [{
            "name": "Crate",
            "actions": {
                "name": "Crate",
                "children": [{
                    "type": "trigger",
                    "name": "OnPickTrigger",
                    "children": [{ "type": "action", "name": "SetValueAction" }]
                }]
            },
            "physics": { "physicsImpostor": 2, "physicsMass": 5, "physicsRestitution": 0.5 }
        }]
    });
    import(&mut scene, doc.clone()).unwrap();

    let mesh = &scene.meshes[key];
    let manager = mesh.action_manager.expect("action manager");
    assert_eq!(scene.action_managers[manager].action_count(), 1);
    assert!(scene.provenance.has(manager, Provenance::ADDED));

    let impostor = mesh.physics_impostor.expect("impostor");
    assert!((impostor.mass - 5.0).abs() < f32::EPSILON);

    // re-importing replaces the manager instead of stacking a second one
    import(&mut scene, doc).unwrap();
    assert_eq!(scene.action_managers.len(), 1);
}

#[test]
fn physics_ignored_when_disabled() {
    let mut scene = Scene::new();
    let key = scene.add_mesh(Mesh::new_empty("ball", "Ball"));
    let mut importer = ProjectImporter::new(ImportSettings {
        enable_physics: false,
        ..Default::default()
    });

    import_with(
        &mut importer,
        &mut scene,
        json!({ "nodes": [{ "name": "Ball", "physics": { "physicsImpostor": 1, "physicsMass": 1 } }] }),
    )
    .unwrap();

    assert!(scene.meshes[key].physics_impostor.is_none());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn unrecognized_type_tag_names_descriptor() {
    let mut scene = Scene::new();

    let err = import(
        &mut scene,
        json!({ "nodes": [{ "name": "Blob", "type": "Blob", "serializationObject": {} }] }),
    )
    .unwrap_err();

    match &err {
        ImportError::UnrecognizedNodeType { name, type_tag } => {
            assert_eq!(name, "Blob");
            assert_eq!(type_tag, "Blob");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Blob"));
}

#[test]
fn failure_keeps_earlier_nodes() {
    let mut scene = Scene::new();

    let result = import(
        &mut scene,
        json!({
            "nodes": [
                { "name": "Lamp", "type": "Light", "serializationObject": { "id": "l" } },
                { "name": "Blob", "type": "Blob", "serializationObject": {} }
            ]
        }),
    );

    assert!(result.is_err());
    assert_eq!(scene.lights.len(), 1);
}

#[test]
fn undecodable_payload_is_invalid() {
    let mut scene = Scene::new();

    let err = import(
        &mut scene,
        json!({ "nodes": [{ "name": "Lamp", "type": "Light", "serializationObject": { "intensity": "bright" } }] }),
    )
    .unwrap_err();

    assert!(matches!(err, ImportError::InvalidPayload { kind: "light", ref name, .. } if name == "Lamp"));
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn phase_order_is_fixed() {
    assert_eq!(ImportPhase::ORDER.first(), Some(&ImportPhase::Normalize));
    assert_eq!(ImportPhase::ORDER.last(), Some(&ImportPhase::DeferredParents));

    let position = |phase| ImportPhase::ORDER.iter().position(|p| *p == phase).unwrap();
    assert!(position(ImportPhase::Nodes) < position(ImportPhase::ParticleSystems));
    assert!(position(ImportPhase::Materials) < position(ImportPhase::Textures));
    assert!(position(ImportPhase::Assets) < position(ImportPhase::Extensions));
}
