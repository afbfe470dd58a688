use std::io;
use std::path::Path;

use glam::Vec3;
use serde::{ Serialize, Deserialize };

use crate::camera::{ Camera, rotation_y };
use crate::color::Color;
use crate::geometry::Triangle;
use crate::light::{ Light, Material };
use crate::world::World;

/// A fully formed scene: the world to trace and the camera viewing it.
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// Loads a scene description from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Scene> {
        let text = std::fs::read_to_string(path)?;
        let scene_json: SceneJson = serde_json::from_str(&text)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(scene_json.into())
    }
}

impl From<SceneJson> for Scene {
    fn from(scene_json: SceneJson) -> Scene {
        // Create the light source.
        let light_color = Color::from(&scene_json.light.color);
        let light_position = vec3_from(&scene_json.light.position);
        let light = match scene_json.light.kind.as_str() {
            "point" => Light::point(light_position, light_color),
            "directional" => {
                let direction = scene_json.light.direction.as_ref()
                    .expect("Directional light must carry a direction.");
                Light::directional(light_position, vec3_from(direction), light_color)
            }
            _ => panic!("Unrecognized light kind in scene description JSON."),
        };

        // Create the world: material arena first, then the triangles
        // holding handles into it.
        let mut world = World::new(light, Color::from(&scene_json.ambient));
        for material_json in &scene_json.materials {
            world.add_material(material_json.into());
        }
        for triangle_json in &scene_json.triangles {
            world.triangles.push(Triangle::new(
                vec3_from(&triangle_json.v0),
                vec3_from(&triangle_json.v1),
                vec3_from(&triangle_json.v2),
                triangle_json.material,
            ));
        }

        // Create the camera.
        let mut camera = Camera::new(
            vec3_from(&scene_json.camera_position),
            scene_json.focal,
            scene_json.width,
            scene_json.height,
        );
        camera.rotation = rotation_y(scene_json.camera_yaw);

        Scene { world, camera }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    width: usize,
    height: usize,
    focal: f32,

    camera_position: Vec<f32>,
    #[serde(default)]
    camera_yaw: f32,

    light: LightJson,
    ambient: Vec<f32>,

    materials: Vec<MaterialJson>,
    triangles: Vec<TriangleJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct LightJson {
    kind: String,
    position: Vec<f32>,
    #[serde(default)]
    direction: Option<Vec<f32>>,
    color: Vec<f32>,
}

#[derive(Clone, Serialize, Deserialize)]
struct MaterialJson {
    color: Vec<f32>,
    specular: f32,
    diffuse: f32,
    ambient: f32,
    shininess: f32,
    reflection: f32,
    refraction: f32,
    #[serde(default = "default_cauchy_a")]
    cauchy_a: f32,
    #[serde(default)]
    cauchy_b: f32,
}

fn default_cauchy_a() -> f32 {
    1.0
}

impl From<&MaterialJson> for Material {
    fn from(material_json: &MaterialJson) -> Material {
        Material {
            color: Color::from(&material_json.color),
            specular: material_json.specular,
            diffuse: material_json.diffuse,
            ambient: material_json.ambient,
            shininess: material_json.shininess,
            reflection: material_json.reflection,
            refraction: material_json.refraction,
            cauchy_a: material_json.cauchy_a,
            cauchy_b: material_json.cauchy_b,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct TriangleJson {
    v0: Vec<f32>,
    v1: Vec<f32>,
    v2: Vec<f32>,
    material: usize,
}

/// Takes the first three elements of a vector as a `Vec3`, defaulting
/// missing components to zero (mirroring the `Color` conversion).
fn vec3_from(v: &[f32]) -> Vec3 {
    match *v {
        [] => Vec3::ZERO,
        [x] => Vec3::new(x, 0.0, 0.0),
        [x, y] => Vec3::new(x, y, 0.0),
        [x, y, z, ..] => Vec3::new(x, y, z),
    }
}

/* Tests */

#[cfg(test)]
const MINIMAL_SCENE: &str = r#"{
    "width": 40,
    "height": 30,
    "focal": 30.0,
    "camera_position": [0.0, 0.0, -2.9],
    "light": {
        "kind": "point",
        "position": [0.0, -0.5, -0.7],
        "color": [20.0, 20.0, 20.0]
    },
    "ambient": [0.5, 0.5, 0.5],
    "materials": [
        {
            "color": [0.15, 0.75, 0.15],
            "specular": 1.0,
            "diffuse": 1.0,
            "ambient": 1.0,
            "shininess": 1.0,
            "reflection": 0.02,
            "refraction": 0.0
        }
    ],
    "triangles": [
        { "v0": [-1.0, 1.0, -1.0], "v1": [1.0, 1.0, -1.0],
          "v2": [0.0, 1.0, 1.0], "material": 0 }
    ]
}"#;

#[test]
fn scene_from_minimal_json() {
    let scene_json: SceneJson = serde_json::from_str(MINIMAL_SCENE).unwrap();
    let scene: Scene = scene_json.into();

    assert_eq!(scene.camera.width, 40);
    assert_eq!(scene.camera.height, 30);
    assert_eq!(scene.camera.position, Vec3::new(0.0, 0.0, -2.9));

    assert_eq!(scene.world.triangles.len(), 1);
    assert_eq!(scene.world.materials.len(), 1);
    assert_eq!(scene.world.ambient, Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(scene.world.light.position(), Vec3::new(0.0, -0.5, -0.7));

    // omitted Cauchy pair falls back to a non-dispersive material
    assert_eq!(scene.world.materials[0].cauchy_a, 1.0);
    assert_eq!(scene.world.materials[0].cauchy_b, 0.0);
}

#[test]
fn directional_light_from_json() {
    let text = r#"{
        "kind": "directional",
        "position": [0.0, 5.0, 0.0],
        "direction": [0.0, -2.0, 0.0],
        "color": [1.0, 1.0, 1.0]
    }"#;

    let light_json: LightJson = serde_json::from_str(text).unwrap();
    assert_eq!(light_json.kind, "directional");

    // the conversion normalizes the direction
    let scene_json = SceneJson {
        width: 1, height: 1, focal: 1.0,
        camera_position: vec![0.0, 0.0, 0.0],
        camera_yaw: 0.0,
        light: light_json,
        ambient: vec![0.0, 0.0, 0.0],
        materials: vec![],
        triangles: vec![],
    };
    let scene: Scene = scene_json.into();

    assert_eq!(
        scene.world.light.incident_direction(Vec3::ZERO),
        Vec3::new(0.0, -1.0, 0.0)
    );
}
