use glam::Vec3;

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::{ BK7_CAUCHY_A, BK7_CAUCHY_B };
use crate::geometry::Triangle;
use crate::light::{ Light, Material };
use crate::world::World;

// Fixture palette
fn red() -> Color { Color::rgb(0.75, 0.15, 0.15) }
fn yellow() -> Color { Color::rgb(0.75, 0.75, 0.15) }
fn green() -> Color { Color::rgb(0.15, 0.75, 0.15) }
fn cyan() -> Color { Color::rgb(0.15, 0.75, 0.75) }
fn purple() -> Color { Color::rgb(0.75, 0.15, 0.75) }
fn white() -> Color { Color::rgb(0.75, 0.75, 0.75) }
fn grey() -> Color { Color::rgb(0.5, 0.5, 0.5) }

/// The dispersive prism material: BK7 borosilicate glass, fully
/// transmissive, with a faint specular sheen on the surface.
fn prism_material() -> Material {
    Material {
        color: grey(),
        specular: 1.0,
        diffuse: 0.1,
        ambient: 0.0,
        shininess: 2.0,
        reflection: 0.0,
        refraction: 1.0,
        cauchy_a: BK7_CAUCHY_A,
        cauchy_b: BK7_CAUCHY_B,
    }
}

/// The light and ambient term the fixtures are tuned for.
fn fixture_lighting() -> (Light, Color) {
    let light = Light::point(
        Vec3::new(0.0, -0.5, -0.7),
        Color::rgb(20.0, 20.0, 20.0),
    );

    (light, Color::rgb(0.5, 0.5, 0.5))
}

/// The camera the fixtures are tuned for: on the axis, backed off just far
/// enough to frame the unit cube. Focal length equals the screen height.
pub fn default_camera(width: usize, height: usize) -> Camera {
    let focal = height as f32;
    let position = Vec3::new(0.0, 0.0, -2.0 * focal / height as f32 - 0.9);

    Camera::new(position, focal, width, height)
}

/// Rescales fixture geometry from `[0, side]^3` into the volume
/// `[-1, 1]^3`, mirroring X and Y so that +Y is down and +X is left, and
/// recomputes every normal afterwards.
fn scale_to_unit_volume(triangles: &mut Vec<Triangle>, side: f32) {
    let remap = |v: Vec3| {
        let v = v * (2.0 / side) - Vec3::ONE;
        Vec3::new(-v.x, -v.y, v.z)
    };

    for triangle in triangles.iter_mut() {
        triangle.v0 = remap(triangle.v0);
        triangle.v1 = remap(triangle.v1);
        triangle.v2 = remap(triangle.v2);
        triangle.compute_normal();
    }
}

/// The Cornell box: five colored walls, a short diffuse block and a tall
/// block carrying the dispersive prism material.
pub fn cornell_box() -> World {
    let (light, ambient) = fixture_lighting();
    let mut world = World::new(light, ambient);

    let floor = world.add_material(Material::flat(green()));
    let left_wall = world.add_material(Material::flat(purple()));
    let right_wall = world.add_material(Material::flat(yellow()));
    let ceiling = world.add_material(Material::flat(cyan()));
    let back_wall = world.add_material(Material::flat(white()));
    let short_block = world.add_material(Material::flat(red()));
    let tall_block = world.add_material(prism_material());

    let mut triangles = Vec::with_capacity(5 * 2 + 2 * 10);

    // Length of the Cornell box side.
    let l = 555.0;

    // Room corners: ABCD on the floor, EFGH above them.
    let a = Vec3::new(l, 0.0, 0.0);
    let b = Vec3::new(0.0, 0.0, 0.0);
    let c = Vec3::new(l, 0.0, l);
    let d = Vec3::new(0.0, 0.0, l);

    let e = Vec3::new(l, l, 0.0);
    let f = Vec3::new(0.0, l, 0.0);
    let g = Vec3::new(l, l, l);
    let h = Vec3::new(0.0, l, l);

    // Floor
    triangles.push(Triangle::new(c, b, a, floor));
    triangles.push(Triangle::new(c, d, b, floor));

    // Left wall
    triangles.push(Triangle::new(a, e, c, left_wall));
    triangles.push(Triangle::new(c, e, g, left_wall));

    // Right wall
    triangles.push(Triangle::new(f, b, d, right_wall));
    triangles.push(Triangle::new(h, f, d, right_wall));

    // Ceiling
    triangles.push(Triangle::new(e, f, g, ceiling));
    triangles.push(Triangle::new(f, h, g, ceiling));

    // Back wall
    triangles.push(Triangle::new(g, d, c, back_wall));
    triangles.push(Triangle::new(g, h, d, back_wall));

    // Short block
    push_block(&mut triangles,
        Vec3::new(290.0, 0.0, 114.0),
        Vec3::new(130.0, 0.0, 65.0),
        Vec3::new(240.0, 0.0, 272.0),
        Vec3::new(82.0, 0.0, 225.0),
        165.0,
        short_block,
    );

    // Tall block
    push_block(&mut triangles,
        Vec3::new(423.0, 0.0, 247.0),
        Vec3::new(265.0, 0.0, 296.0),
        Vec3::new(472.0, 0.0, 406.0),
        Vec3::new(314.0, 0.0, 456.0),
        330.0,
        tall_block,
    );

    scale_to_unit_volume(&mut triangles, l);
    world.triangles = triangles;

    world
}

/// Pushes a box standing on the floor: base corners `a..d` (a-b and c-d
/// being opposite edges), walls up to `height`, and a top. The underside
/// is omitted; it sits on the floor.
fn push_block(triangles: &mut Vec<Triangle>,
    a: Vec3, b: Vec3, c: Vec3, d: Vec3, height: f32, material: usize) {
    let up = Vec3::new(0.0, height, 0.0);
    let e = a + up;
    let f = b + up;
    let g = c + up;
    let h = d + up;

    // Front
    triangles.push(Triangle::new(e, b, a, material));
    triangles.push(Triangle::new(e, f, b, material));

    // Right
    triangles.push(Triangle::new(f, d, b, material));
    triangles.push(Triangle::new(f, h, d, material));

    // Back
    triangles.push(Triangle::new(h, c, d, material));
    triangles.push(Triangle::new(h, g, c, material));

    // Left
    triangles.push(Triangle::new(g, e, c, material));
    triangles.push(Triangle::new(e, a, c, material));

    // Top
    triangles.push(Triangle::new(g, f, e, material));
    triangles.push(Triangle::new(g, h, f, material));
}

/// A floor plane with a triangular dispersive prism standing on it: the
/// scene that splits white light into a spectrum.
pub fn triangular_prism() -> World {
    let (light, ambient) = fixture_lighting();
    let mut world = World::new(light, ambient);

    let floor = world.add_material(Material::flat(green()));
    let prism = world.add_material(prism_material());

    let mut triangles = Vec::with_capacity(2 + 8);

    // Length of the scene side.
    let l = 20.0;

    // Floor corners
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(0.0, 0.0, l);
    let c = Vec3::new(l, 0.0, l);
    let d = Vec3::new(l, 0.0, 0.0);

    triangles.push(Triangle::new(c, b, a, floor));
    triangles.push(Triangle::new(c, a, d, floor));

    // Prism base: an isosceles triangle centered on the floor
    let half_l = l / 2.0;
    let size = 6.0;
    let e = Vec3::new(half_l - size, 0.0, half_l + size);
    let f = Vec3::new(half_l + size, 0.0, half_l + size);
    let g = Vec3::new(half_l, 0.0, half_l - size);

    // Prism top
    let height = 8.0;
    let up = Vec3::new(0.0, height, 0.0);
    let h = e + up;
    let i = f + up;
    let j = g + up;

    // Base
    triangles.push(Triangle::new(e, g, f, prism));

    // Top
    triangles.push(Triangle::new(h, j, i, prism));

    // Back
    triangles.push(Triangle::new(e, h, f, prism));
    triangles.push(Triangle::new(h, i, f, prism));

    // Left
    triangles.push(Triangle::new(f, i, g, prism));
    triangles.push(Triangle::new(i, j, g, prism));

    // Right
    triangles.push(Triangle::new(j, e, g, prism));
    triangles.push(Triangle::new(e, j, h, prism));

    scale_to_unit_volume(&mut triangles, l);
    world.triangles = triangles;

    world
}

/* Tests */

#[test]
fn cornell_box_triangle_count() {
    let world = cornell_box();

    // five wall pairs plus two ten-triangle blocks
    assert_eq!(world.triangles.len(), 30);
    assert_eq!(world.materials.len(), 7);
}

#[test]
fn triangular_prism_triangle_count() {
    let world = triangular_prism();

    assert_eq!(world.triangles.len(), 10);
    assert_eq!(world.materials.len(), 2);
}

#[test]
fn fixtures_fit_the_unit_volume() {
    for world in [cornell_box(), triangular_prism()].iter() {
        for triangle in world.triangles.iter() {
            for v in [triangle.v0, triangle.v1, triangle.v2].iter() {
                assert!(v.x.abs() <= 1.0 + crate::consts::FEQ_EPSILON);
                assert!(v.y.abs() <= 1.0 + crate::consts::FEQ_EPSILON);
                assert!(v.z.abs() <= 1.0 + crate::consts::FEQ_EPSILON);
            }
        }
    }
}

#[test]
fn fixture_normals_are_unit_length() {
    let world = cornell_box();

    for triangle in world.triangles.iter() {
        assert!(crate::feq(triangle.normal.length(), 1.0));
    }
}

#[test]
fn cornell_floor_normal_points_up() {
    let world = cornell_box();

    // +Y is down in this convention, so "up" is -Y
    assert_eq!(world.triangles[0].normal, Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn prism_block_is_dispersive() {
    let world = triangular_prism();
    let prism = &world.materials[world.triangles[2].material];

    assert!(prism.refraction > 0.0);
    assert!(prism.cauchy_b > 0.0);
    assert!(crate::feq(prism.refractive_index(), BK7_CAUCHY_A));
}

#[test]
fn default_camera_frames_the_unit_cube() {
    let camera = default_camera(200, 200);

    assert_eq!(camera.position, Vec3::new(0.0, 0.0, -2.9));
    assert!(crate::feq(camera.focal, 200.0));
    assert_eq!(camera.width, 200);
    assert_eq!(camera.height, 200);
}
