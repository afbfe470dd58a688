use glam::Vec3;

use crate::color::Color;
use crate::consts::GEOM_EPSILON;
use crate::geometry::Triangle;
use crate::intersect::{ Intersection, Intersections, find_intersections };
use crate::light::{ Light, Material, lambertian, phong };
use crate::ray::{ Ray, reflect, refract };

/// A world with triangles, materials and one light.
///
/// The world owns its triangle list and the material arena the triangles
/// index into. All shading logic lives here: shadowed direct light, the
/// single-bounce driver and the recursive reflect/refract driver.
///
/// A world is read-only for the duration of a render pass; mutation (via
/// `command`) and rendering are serialized by the caller.
pub struct World {
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
    pub light: Light,
    pub ambient: Color,
}

impl World {
    /// Creates an empty world lit by `light`.
    pub fn new(light: Light, ambient: Color) -> World {
        World {
            triangles: Vec::new(),
            materials: Vec::new(),
            light,
            ambient,
        }
    }

    /// Adds a material to the arena, returning the handle triangles store.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// The material of the triangle a hit landed on.
    pub fn material_of(&self, hit: &Intersection) -> &Material {
        &self.materials[self.triangles[hit.triangle].material]
    }

    /// The front-face normal of the triangle a hit landed on.
    pub fn normal_of(&self, hit: &Intersection) -> Vec3 {
        self.triangles[hit.triangle].normal
    }

    /// Intersects a ray against all triangles in the world.
    pub fn intersect(&self, ray: &Ray) -> Intersections {
        find_intersections(ray, &self.triangles)
    }

    /// The light color reaching a hit point, shadowed and attenuated.
    ///
    /// Casts a ray from the light along its incident direction and checks
    /// whether the nearest surface it meets is the hit point itself; any
    /// nearer surface occludes the point completely (hard shadows only).
    /// This is a second full scene traversal per shaded point.
    pub fn direct_light(&self, hit: &Intersection) -> Color {
        let incident = self.light.incident_direction(hit.position);
        let shadow_ray = Ray::new(self.light.position(), incident);
        let light_to_point = self.light.distance(hit.position);

        let mut intersections = self.intersect(&shadow_ray);
        if let Some(closest) = intersections.hit() {
            if (closest.distance - light_to_point).abs() > GEOM_EPSILON {
                return Color::black();
            }
        }

        self.light.color() * self.light.falloff(hit.position)
    }

    /// Shades a ray with direct illumination only.
    ///
    /// The single-bounce driver: nearest hit, shadowed direct light,
    /// Lambertian shading. A ray that escapes the scene yields black.
    pub fn color_at(&self, ray: &Ray) -> Color {
        let hit = {
            let mut intersections = self.intersect(ray);
            intersections.hit()
        };

        match hit {
            None => Color::black(),
            Some(hit) => {
                let direct = self.direct_light(&hit);
                let light_direction = -self.light.incident_direction(hit.position);

                lambertian(self.material_of(&hit), self.normal_of(&hit),
                    self.ambient, direct, light_direction)
            }
        }
    }

    /// Shades a ray recursively up to `depth_max` bounces.
    ///
    /// Per hit: a reflected branch when the material reflects, a refracted
    /// branch when it transmits, and the Phong direct term, summed as
    ///
    /// `direct + reflection * reflected + refraction * refracted`
    ///
    /// The branch weights are independent material coefficients; no
    /// normalization is applied.
    pub fn color_at_recursive(&self, ray: &Ray, depth_max: u32, depth: u32) -> Color {
        if depth >= depth_max {
            return Color::black();
        }

        let hit = {
            let mut intersections = self.intersect(ray);
            intersections.hit()
        };

        let hit = match hit {
            Some(hit) => hit,
            // the ray escapes to the background
            None => return Color::black(),
        };

        let material = *self.material_of(&hit);
        let normal = self.normal_of(&hit);

        let mut reflected = Color::black();
        if material.reflection > 0.0 {
            let reflected_ray = Ray::new(hit.position, reflect(ray.direction, normal));
            reflected = self.color_at_recursive(&reflected_ray, depth_max, depth + 1);
        }

        let mut refracted = Color::black();
        if material.refraction > 0.0 {
            refracted = self.refracted_light(&hit, ray, depth_max, depth);
        }

        let direct = self.direct_light(&hit);
        let light_direction = -self.light.incident_direction(hit.position);
        let illumination = phong(&material, normal, ray.direction,
            self.ambient, direct, light_direction);

        illumination
            + reflected * material.reflection
            + refracted * material.refraction
    }

    /// The refracted branch of the recursive driver.
    ///
    /// The side of the surface the ray arrives from selects entering vs.
    /// exiting the medium; normals are assumed to point outward from a
    /// single convex solid (nested media are unsupported). Total internal
    /// reflection transmits nothing.
    fn refracted_light(&self, hit: &Intersection, incoming: &Ray,
        depth_max: u32, depth: u32) -> Color {
        let material = self.material_of(hit);
        let normal = self.normal_of(hit);

        let ratio = if incoming.direction.dot(normal) <= 0.0 {
            1.0 / material.refractive_index()
        } else {
            material.refractive_index()
        };

        match refract(incoming.direction, normal, ratio) {
            Some(direction) => {
                let refracted_ray = Ray::new(hit.position, direction);
                self.color_at_recursive(&refracted_ray, depth_max, depth + 1)
            }
            None => Color::black(),
        }
    }
}

/* Tests */

#[cfg(test)]
mod fixtures {
    use super::*;

    /// A large triangle in the plane `z = depth`, facing the -Z side,
    /// strictly containing the view axis.
    pub fn facing_wall(z: f32, material: usize) -> Triangle {
        Triangle::new(
            Vec3::new(-5.0, -5.0, z),
            Vec3::new(5.0, -5.0, z),
            Vec3::new(0.0, 5.0, z),
            material,
        )
    }

    /// A floor pair in the plane `y = 0` with upward normals. The shared
    /// diagonal runs along `x + z = 0`; probe away from it.
    pub fn floor(material: usize) -> Vec<Triangle> {
        vec![
            Triangle::new(
                Vec3::new(-5.0, 0.0, -5.0),
                Vec3::new(5.0, 0.0, -5.0),
                Vec3::new(-5.0, 0.0, 5.0),
                material,
            ),
            Triangle::new(
                Vec3::new(5.0, 0.0, 5.0),
                Vec3::new(-5.0, 0.0, 5.0),
                Vec3::new(5.0, 0.0, -5.0),
                material,
            ),
        ]
    }

    /// An ambient-only material: shading depends on nothing but the
    /// world's ambient term.
    pub fn ambient_only(color: Color) -> Material {
        let mut material = Material::flat(color);
        material.ambient = 1.0;
        material.diffuse = 0.0;
        material.specular = 0.0;
        material.reflection = 0.0;
        material.refraction = 0.0;
        material
    }
}

#[cfg(test)]
fn overhead_light_world() -> World {
    World::new(
        Light::point(Vec3::new(0.0, 10.0, 0.0), Color::white()),
        Color::black(),
    )
}

#[test]
fn escaped_ray_is_black() {
    let world = overhead_light_world();
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(world.color_at(&ray), Color::black());
    assert_eq!(world.color_at_recursive(&ray, 5, 0), Color::black());
}

#[test]
fn direct_light_unoccluded() {
    use std::f32::consts::PI;

    let mut world = overhead_light_world();
    let diffuse = world.add_material(Material::flat(Color::white()));
    world.triangles = fixtures::floor(diffuse);

    let ray = Ray::new(Vec3::new(-1.0, 3.0, -1.0), Vec3::new(0.0, -1.0, 0.0));
    let hit = world.intersect(&ray).hit().unwrap();

    // inverse-square falloff over the 102 square units up to the light
    let expected = Color::white() * (1.0 / (4.0 * PI * 102.0));
    assert_eq!(world.direct_light(&hit), expected);
}

#[test]
fn direct_light_occluded_is_black() {
    let mut world = overhead_light_world();
    let diffuse = world.add_material(Material::flat(Color::white()));
    world.triangles = fixtures::floor(diffuse);

    // a small wall halfway between the light and the floor
    world.triangles.push(Triangle::new(
        Vec3::new(-1.0, 5.0, -1.0),
        Vec3::new(1.0, 5.0, -1.0),
        Vec3::new(0.0, 5.0, 1.0),
        diffuse,
    ));

    let ray = Ray::new(Vec3::new(-1.0, 3.0, -1.0), Vec3::new(0.0, -1.0, 0.0));
    let hit = world.intersect(&ray).hit().unwrap();

    assert!(crate::feq(hit.position.y, 0.0));
    assert_eq!(world.direct_light(&hit), Color::black());
}

#[test]
fn recursion_depth_invariant_when_coefficients_zero() {
    let mut world = overhead_light_world();
    world.ambient = Color::rgb(0.5, 0.5, 0.5);

    let mut material = Material::flat(Color::rgb(0.8, 0.4, 0.2));
    material.reflection = 0.0;
    material.refraction = 0.0;
    let floor = world.add_material(material);
    world.triangles = fixtures::floor(floor);

    let ray = Ray::new(Vec3::new(-1.0, 3.0, -1.0), Vec3::new(0.0, -1.0, 0.0));

    // no branch is spawned, so extra allowed bounces change nothing
    let shallow = world.color_at_recursive(&ray, 1, 0);
    assert_eq!(world.color_at_recursive(&ray, 2, 0), shallow);
    assert_eq!(world.color_at_recursive(&ray, 5, 0), shallow);
}

#[test]
fn reflection_picks_up_surface_behind_the_camera() {
    let mut world = overhead_light_world();
    world.ambient = Color::white();

    let mut mirror = Material::flat(Color::white());
    mirror.ambient = 0.0;
    mirror.diffuse = 0.0;
    mirror.specular = 0.0;
    mirror.reflection = 1.0;
    let mirror = world.add_material(mirror);

    let green = world.add_material(fixtures::ambient_only(Color::green()));

    // mirror wall ahead, green wall behind the ray origin
    world.triangles.push(fixtures::facing_wall(1.0, mirror));
    world.triangles.push(fixtures::facing_wall(-1.0, green));

    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    // the reflected ray needs a second bounce to reach the green wall
    assert_eq!(world.color_at_recursive(&ray, 2, 0), Color::green());
    assert_eq!(world.color_at_recursive(&ray, 1, 0), Color::black());
}

#[test]
fn total_internal_reflection_transmits_nothing() {
    let mut world = overhead_light_world();

    let mut glass = Material::flat(Color::white());
    glass.ambient = 0.0;
    glass.diffuse = 0.0;
    glass.specular = 0.0;
    glass.reflection = 0.0;
    glass.refraction = 1.0;
    glass.cauchy_a = 1.5;
    let glass = world.add_material(glass);
    world.triangles.push(fixtures::facing_wall(1.0, glass));

    // grazing the surface from the dense side (along the normal, the ray
    // travels with it), so the exit ratio applies and the law has no root
    let ray = Ray::new(Vec3::new(-0.5, 0.0, 1.025), Vec3::new(1.0, 0.0, -0.05));
    let hit = world.intersect(&ray).hit().unwrap();
    assert!(ray.direction.dot(world.normal_of(&hit)) > 0.0);

    assert_eq!(world.color_at_recursive(&ray, 5, 0), Color::black());
}
