use std::f32::consts::PI;

use glam::Vec3;

use crate::color::Color;
use crate::ray::reflect;

/// A light source.
///
/// Either an omni-directional point light or a directional light with
/// parallel rays. All capabilities the shading code needs (incident
/// direction, distance, falloff) dispatch over the variant, so adding a
/// light kind is an exhaustiveness error everywhere at once.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    /// Radiates in all directions from a position; inverse-square falloff.
    Point {
        position: Vec3,
        color: Color,
    },

    /// Parallel rays along a fixed direction; inverse-linear falloff. The
    /// position anchors the shadow-ray origin and the projected distance.
    Directional {
        position: Vec3,
        direction: Vec3,
        color: Color,
    },
}

impl Light {
    /// Creates a point light.
    pub fn point(position: Vec3, color: Color) -> Light {
        Light::Point { position, color }
    }

    /// Creates a directional light. The direction is normalized here.
    pub fn directional(position: Vec3, direction: Vec3, color: Color) -> Light {
        Light::Directional { position, direction: direction.normalize(), color }
    }

    pub fn position(&self) -> Vec3 {
        match *self {
            Light::Point { position, .. } => position,
            Light::Directional { position, .. } => position,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Light::Point { color, .. } => color,
            Light::Directional { color, .. } => color,
        }
    }

    /// Unit direction light travels along at `hit` (from the light toward
    /// the point).
    pub fn incident_direction(&self, hit: Vec3) -> Vec3 {
        match *self {
            Light::Point { position, .. } => (hit - position).normalize(),
            Light::Directional { direction, .. } => direction,
        }
    }

    /// Distance from the light to `hit`. For a directional light this is
    /// the offset projected onto the light direction.
    pub fn distance(&self, hit: Vec3) -> f32 {
        match *self {
            Light::Point { position, .. } => (hit - position).length(),
            Light::Directional { position, direction, .. } => {
                (hit - position).dot(direction).abs()
            }
        }
    }

    /// Intensity attenuation at `hit`.
    pub fn falloff(&self, hit: Vec3) -> f32 {
        let d = self.distance(hit);
        match *self {
            Light::Point { .. } => 1.0 / (4.0 * PI * d * d),
            Light::Directional { .. } => 1.0 / d,
        }
    }

    /// Moves the light source. Applied between render passes only.
    pub fn translate(&mut self, delta: Vec3) {
        match self {
            Light::Point { position, .. } => *position += delta,
            Light::Directional { position, .. } => *position += delta,
        }
    }
}

/// A material record.
///
/// Carries the Phong coefficients together with the recursive-transport
/// weights and the Cauchy dispersion pair. `reflection` and `refraction`
/// weight the recursive branches independently of the diffuse/specular
/// terms; nothing forces the weights to sum to one, so a careless material
/// can gain energy. That matches the reference combination policy and is a
/// documented limitation, not something the engine corrects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,

    pub specular: f32,
    pub diffuse: f32,
    pub ambient: f32,
    pub shininess: f32,

    pub reflection: f32,
    pub refraction: f32,

    /// Cauchy coefficient A (dimensionless); also the base refractive index.
    pub cauchy_a: f32,
    /// Cauchy coefficient B, in nanometers squared.
    pub cauchy_b: f32,
}

impl Material {
    /// A plain colored surface: full Phong terms, a trace of reflectivity,
    /// no transmission, no dispersion.
    pub fn flat(color: Color) -> Material {
        Material {
            color,
            specular: 1.0,
            diffuse: 1.0,
            ambient: 1.0,
            shininess: 1.0,
            reflection: 0.02,
            refraction: 0.0,
            cauchy_a: 1.0,
            cauchy_b: 0.0,
        }
    }

    /// The base refractive index, used for non-dispersive refraction.
    pub fn refractive_index(&self) -> f32 {
        self.cauchy_a
    }

    /// The refractive index at `wavelength` nanometers, per Cauchy's
    /// dispersion formula `n(w) = A + B / w^2`.
    pub fn cauchy_refractive_index(&self, wavelength: f32) -> f32 {
        self.cauchy_a + self.cauchy_b / (wavelength * wavelength)
    }
}

impl Default for Material {
    fn default() -> Material {
        Material::flat(Color::white())
    }
}

fn positive_cos(v1: Vec3, v2: Vec3) -> f32 {
    v1.dot(v2).max(0.0)
}

/// Lambertian illumination of a hit.
///
/// `light_direction` points from the surface toward the light;
/// `direct_light` is the (already shadowed, falloff-weighted) light color
/// reaching the point. The cosine clamp keeps backlit surfaces from
/// receiving a negative diffuse term.
pub fn lambertian(material: &Material, normal: Vec3, ambient_light: Color,
    direct_light: Color, light_direction: Vec3) -> Color {
    let cos_angle = positive_cos(light_direction, normal);

    material.color
        * (ambient_light * material.ambient
            + direct_light * material.diffuse * cos_angle)
}

/// Phong illumination of a hit.
///
/// The Lambertian term plus a specular highlight around the mirror
/// reflection of the light direction. `view_direction` is the incoming
/// ray's direction, not negated; the sign convention must match the caller.
pub fn phong(material: &Material, normal: Vec3, view_direction: Vec3,
    ambient_light: Color, direct_light: Color, light_direction: Vec3) -> Color {
    let reflected_direction = reflect(light_direction, normal);

    let lambertian_part =
        lambertian(material, normal, ambient_light, direct_light, light_direction);
    let specular_part = material.color
        * material.specular
        * positive_cos(reflected_direction, view_direction).powf(material.shininess)
        * direct_light;

    lambertian_part + specular_part
}

/// Blinn-Phong illumination of a hit.
///
/// Same as `phong`, but the specular exponent is evaluated against the
/// halfway vector and the normal, which skips the reflect computation.
pub fn blinn_phong(material: &Material, normal: Vec3, view_direction: Vec3,
    ambient_light: Color, direct_light: Color, light_direction: Vec3) -> Color {
    let halfway_direction = (light_direction + view_direction).normalize();

    let lambertian_part =
        lambertian(material, normal, ambient_light, direct_light, light_direction);
    let specular_part = material.color
        * material.specular
        * positive_cos(halfway_direction, normal).powf(material.shininess)
        * direct_light;

    lambertian_part + specular_part
}

#[test]
fn point_light_incident_direction_and_distance() {
    let light = Light::point(Vec3::new(0.0, 10.0, 0.0), Color::white());
    let hit = Vec3::new(0.0, 0.0, 0.0);

    assert_eq!(light.incident_direction(hit), Vec3::new(0.0, -1.0, 0.0));
    assert!(crate::feq(light.distance(hit), 10.0));
}

#[test]
fn point_light_inverse_square_falloff() {
    let light = Light::point(Vec3::ZERO, Color::white());

    let near = light.falloff(Vec3::new(1.0, 0.0, 0.0));
    let far = light.falloff(Vec3::new(2.0, 0.0, 0.0));

    assert!(crate::feq(near, 1.0 / (4.0 * PI)));
    assert!(crate::feq(near / far, 4.0));
}

#[test]
fn directional_light_projected_distance() {
    let light = Light::directional(
        Vec3::new(0.0, 5.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Color::white(),
    );

    // offset orthogonal to the light direction does not count
    let hit = Vec3::new(3.0, 0.0, 0.0);
    assert!(crate::feq(light.distance(hit), 5.0));
    assert!(crate::feq(light.falloff(hit), 1.0 / 5.0));
}

#[test]
fn directional_light_constant_incident_direction() {
    let light = Light::directional(Vec3::ZERO, Vec3::new(0.0, -2.0, 0.0), Color::white());

    let d1 = light.incident_direction(Vec3::new(5.0, 0.0, 0.0));
    let d2 = light.incident_direction(Vec3::new(-5.0, 0.0, 3.0));

    assert_eq!(d1, Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(d1, d2);
}

#[test]
fn translate_moves_light() {
    let mut light = Light::point(Vec3::ZERO, Color::white());
    light.translate(Vec3::new(1.0, 2.0, 3.0));

    assert_eq!(light.position(), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn cauchy_refractive_index() {
    let mut material = Material::flat(Color::white());
    material.cauchy_a = 1.5;
    material.cauchy_b = 30_000.0;

    let expected = 1.5 + 30_000.0 / (500.0 * 500.0);
    assert!(crate::feq(material.cauchy_refractive_index(500.0), expected));
    assert!(crate::feq(material.refractive_index(), 1.5));
}

#[test]
fn lambertian_full_incidence() {
    let mut material = Material::flat(Color::white());
    material.ambient = 0.0;
    material.diffuse = 1.0;

    let normal = Vec3::new(0.0, 1.0, 0.0);
    let light_direction = Vec3::new(0.0, 1.0, 0.0);
    let direct = Color::rgb(0.5, 0.5, 0.5);

    let shaded = lambertian(&material, normal, Color::black(), direct, light_direction);
    assert_eq!(shaded, direct);
}

#[test]
fn lambertian_backlit_surface_gets_only_ambient() {
    let material = Material::flat(Color::rgb(0.2, 0.4, 0.6));

    let normal = Vec3::new(0.0, 1.0, 0.0);
    let light_direction = Vec3::new(0.0, -1.0, 0.0);
    let ambient = Color::rgb(0.5, 0.5, 0.5);

    let shaded = lambertian(&material, normal, ambient, Color::white(), light_direction);
    assert_eq!(shaded, material.color * ambient);
}

#[test]
fn phong_adds_specular_highlight() {
    let mut material = Material::flat(Color::white());
    material.ambient = 0.0;
    material.diffuse = 0.0;
    material.specular = 1.0;
    material.shininess = 1.0;

    let normal = Vec3::new(0.0, 1.0, 0.0);
    // light from straight above; its mirror reflection points back up
    let light_direction = Vec3::new(0.0, 1.0, 0.0);
    // viewer looking straight down the reflected direction
    let view_direction = Vec3::new(0.0, 1.0, 0.0);
    let direct = Color::rgb(0.25, 0.5, 0.75);

    // reflect((0,1,0), (0,1,0)) = (0,-1,0); cos against the view is clamped
    let shaded = phong(&material, normal, view_direction,
        Color::black(), direct, light_direction);
    assert_eq!(shaded, Color::black());

    let shaded = phong(&material, normal, -view_direction,
        Color::black(), direct, light_direction);
    assert_eq!(shaded, direct);
}

#[test]
fn blinn_phong_halfway_highlight() {
    let mut material = Material::flat(Color::white());
    material.ambient = 0.0;
    material.diffuse = 0.0;
    material.specular = 1.0;
    material.shininess = 2.0;

    let normal = Vec3::new(0.0, 1.0, 0.0);
    let light_direction = Vec3::new(0.0, 1.0, 0.0);
    // halfway between the light direction and itself is the normal
    let view_direction = Vec3::new(0.0, 1.0, 0.0);
    let direct = Color::white();

    let shaded = blinn_phong(&material, normal, view_direction,
        Color::black(), direct, light_direction);
    assert_eq!(shaded, Color::white());
}
