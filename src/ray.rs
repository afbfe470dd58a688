use glam::Vec3;

/// A ray with a normalized direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray. The direction is normalized here, so every consumer
    /// can treat the ray parameter as a distance.
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray { origin, direction: direction.normalize() }
    }

    /// The point at parameter `t` along the ray.
    pub fn position(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

/// A ray tagged with spectral information.
///
/// A broadband ray carries the whole visible spectrum; a monochromatic ray
/// carries a single wavelength (in nanometers) and is what a dispersive
/// refraction event fans a broadband ray into.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayWave {
    pub ray: Ray,
    pub is_monochromatic: bool,
    pub wavelength: f32,
}

impl RayWave {
    /// A ray carrying the whole spectrum. The wavelength field is
    /// meaningless until the ray is made monochromatic.
    pub fn broadband(ray: Ray) -> RayWave {
        RayWave { ray, is_monochromatic: false, wavelength: 0.0 }
    }

    /// A ray carrying a single wavelength, in nanometers.
    pub fn monochromatic(ray: Ray, wavelength: f32) -> RayWave {
        RayWave { ray, is_monochromatic: true, wavelength }
    }

    /// The same ray geometry, re-tagged with a single wavelength.
    pub fn with_wavelength(&self, wavelength: f32) -> RayWave {
        RayWave::monochromatic(self.ray, wavelength)
    }
}

/// Reflects a direction across a surface normal.
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refracts a direction through a surface with normal `n`.
///
/// `eta` is the ratio of refractive indices across the surface (entering a
/// medium of index `i` from vacuum: `1/i`; exiting: `i`). Returns `None`
/// when total internal reflection leaves no real refracted direction.
pub fn refract(v: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = n.dot(v);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);

    if k < 0.0 {
        None
    } else {
        Some(eta * v - (eta * cos_i + k.sqrt()) * n)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vec3::new(2.0, 3.0, 4.0),
                Vec3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vec3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vec3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vec3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vec3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_direction_normalized_on_construction() {
    let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));

    assert!(crate::feq(r.direction.length(), 1.0));
    assert_eq!(r.direction, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn wave_starts_broadband() {
    let w = RayWave::broadband(Ray::new(Vec3::ZERO, Vec3::Z));

    assert!(!w.is_monochromatic);
}

#[test]
fn wave_retagged_with_wavelength() {
    let w = RayWave::broadband(Ray::new(Vec3::ZERO, Vec3::Z));
    let mono = w.with_wavelength(550.0);

    assert!(mono.is_monochromatic);
    assert_eq!(mono.wavelength, 550.0);
    assert_eq!(mono.ray, w.ray);
}

#[test]
fn reflect_45_degrees() {
    let v = Vec3::new(1.0, -1.0, 0.0);
    let n = Vec3::new(0.0, 1.0, 0.0);

    assert_eq!(reflect(v, n), Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn refract_straight_through_at_unit_ratio() {
    let v = Vec3::new(0.0, 0.0, 1.0);
    let n = Vec3::new(0.0, 0.0, -1.0);

    let refracted = refract(v, n, 1.0).unwrap();
    assert!(crate::feq((refracted - v).length(), 0.0));
}

#[test]
fn refract_perpendicular_incidence_keeps_direction() {
    let v = Vec3::new(0.0, 0.0, 1.0);
    let n = Vec3::new(0.0, 0.0, -1.0);

    // entering glass head-on only changes speed, not direction
    let refracted = refract(v, n, 1.0 / 1.5).unwrap();
    assert!(crate::feq((refracted - v).length(), 0.0));
}

#[test]
fn refract_total_internal_reflection() {
    // grazing exit from a denser medium
    let v = Vec3::new(1.0, 0.0, -0.05).normalize();
    let n = Vec3::new(0.0, 0.0, -1.0);

    assert_eq!(refract(v, n, 1.5), None);
}
