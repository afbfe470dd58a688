use glam::{ Mat3, Vec3 };
use indicatif::ProgressBar;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::ray::{ Ray, RayWave };
use crate::world::World;

/// Converts degrees to radians.
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Rotation around the Y axis by `yaw` degrees, in the camera's column
/// layout (`right`, `down`, `forward`).
pub fn rotation_y(yaw: f32) -> Mat3 {
    let r = degrees_to_radians(yaw);

    Mat3::from_cols(
        Vec3::new(r.cos(), 0.0, r.sin()),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-r.sin(), 0.0, r.cos()),
    )
}

/// Rotation around the X axis by `pitch` degrees.
pub fn rotation_x(pitch: f32) -> Mat3 {
    let r = degrees_to_radians(pitch);

    Mat3::from_cols(
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, r.cos(), -r.sin()),
        Vec3::new(0.0, r.sin(), r.cos()),
    )
}

/// Which transport driver a frame render uses.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RenderMode {
    /// Direct illumination only.
    Flat,
    /// Recursive reflection and refraction.
    Recursive,
    /// Recursive, with wavelength-dependent refraction.
    Dispersive,
}

/// A pinhole camera.
///
/// Screen coordinates are mapped onto a plane `focal` units along the
/// camera's forward axis, centered on the view direction; the rotation
/// matrix orients that plane in world space. Screen Y grows downward.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    pub position: Vec3,

    /// Orthonormal orientation; columns are `right`, `down`, `forward`.
    pub rotation: Mat3,

    /// Distance from the pinhole to the screen plane, in pixel units.
    pub focal: f32,

    pub width: usize,
    pub height: usize,
}

impl Camera {
    /// Creates a camera at `position` with an identity orientation.
    pub fn new(position: Vec3, focal: f32, width: usize, height: usize) -> Camera {
        Camera {
            position,
            rotation: Mat3::IDENTITY,
            focal,
            width,
            height,
        }
    }

    pub fn right(&self) -> Vec3 {
        self.rotation.x_axis
    }

    pub fn down(&self) -> Vec3 {
        self.rotation.y_axis
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation.z_axis
    }

    /// The primary ray through screen coordinate `(x, y)`.
    pub fn ray_for_pixel(&self, x: usize, y: usize) -> Ray {
        let direction = Vec3::new(
            x as f32 - self.width as f32 / 2.0,
            y as f32 - self.height as f32 / 2.0,
            self.focal,
        );

        Ray::new(self.position, self.rotation * direction)
    }

    /// Renders one pixel with direct illumination only.
    pub fn render_pixel(&self, world: &World, x: usize, y: usize) -> Color {
        world.color_at(&self.ray_for_pixel(x, y))
    }

    /// Renders one pixel with the recursive reflect/refract driver.
    pub fn render_pixel_recursive(&self, world: &World, x: usize, y: usize,
        depth_max: u32) -> Color {
        world.color_at_recursive(&self.ray_for_pixel(x, y), depth_max, 0)
    }

    /// Renders one pixel with the dispersion-aware driver. The primary ray
    /// carries the whole spectrum.
    pub fn render_pixel_dispersive(&self, world: &World, x: usize, y: usize,
        depth_max: u32) -> Color {
        let wave = RayWave::broadband(self.ray_for_pixel(x, y));
        world.color_at_dispersive(&wave, depth_max, 0)
    }

    /// Renders the whole frame, one scanline at a time.
    pub fn render(&self, world: &World, mode: RenderMode, depth_max: u32) -> Canvas {
        let mut image = Canvas::new(self.width, self.height);
        let progress = ProgressBar::new(self.height as u64);

        for y in 0..self.height {
            for x in 0..self.width {
                let color = match mode {
                    RenderMode::Flat => self.render_pixel(world, x, y),
                    RenderMode::Recursive =>
                        self.render_pixel_recursive(world, x, y, depth_max),
                    RenderMode::Dispersive =>
                        self.render_pixel_dispersive(world, x, y, depth_max),
                };
                image.write_pixel(x, y, &color);
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        image
    }
}

/* Tests */

#[test]
fn ray_through_screen_center_is_forward() {
    let c = Camera::new(Vec3::new(1.0, 2.0, 3.0), 100.0, 200, 200);
    let r = c.ray_for_pixel(100, 100);

    assert_eq!(r.origin, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(r.direction, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_off_center_tilts_down_right() {
    let c = Camera::new(Vec3::ZERO, 100.0, 200, 200);
    let r = c.ray_for_pixel(150, 150);

    assert!(r.direction.x > 0.0);
    assert!(r.direction.y > 0.0);
    assert!(r.direction.z > 0.0);
}

#[test]
fn ray_follows_camera_rotation() {
    let mut c = Camera::new(Vec3::ZERO, 100.0, 200, 200);
    c.rotation = rotation_y(90.0);

    let r = c.ray_for_pixel(100, 100);
    assert!(crate::feq((r.direction - Vec3::new(-1.0, 0.0, 0.0)).length(), 0.0));
}

#[test]
fn rotation_matrices_are_orthonormal() {
    for m in [rotation_y(37.0), rotation_x(-63.0)].iter() {
        let product = m.transpose() * *m;

        for (a, b) in product.to_cols_array().iter()
            .zip(Mat3::IDENTITY.to_cols_array().iter()) {
            assert!(crate::feq(*a, *b));
        }
    }
}

#[cfg(test)]
mod pixel_driver {
    use std::f32::consts::PI;

    use super::*;
    use crate::geometry::Triangle;
    use crate::light::{ Light, Material };

    /// A wall at `z = 2` facing the camera, a point light one unit in
    /// front of it, the camera on the axis looking straight at it.
    fn wall_scene() -> (World, Camera) {
        let mut world = World::new(
            Light::point(Vec3::new(0.0, 0.0, 1.0), Color::white()),
            Color::black(),
        );

        let mut material = Material::flat(Color::white());
        material.ambient = 0.0;
        material.diffuse = 1.0;
        material.specular = 0.0;
        material.reflection = 0.0;
        material.refraction = 0.0;
        let material = world.add_material(material);

        world.triangles.push(Triangle::new(
            Vec3::new(-5.0, -5.0, 2.0),
            Vec3::new(5.0, -5.0, 2.0),
            Vec3::new(0.0, 5.0, 2.0),
            material,
        ));

        (world, Camera::new(Vec3::ZERO, 100.0, 100, 100))
    }

    #[test]
    fn center_pixel_sees_falloff_weighted_diffuse() {
        let (world, camera) = wall_scene();

        // light one unit from the wall, square on: cos = 1, d = 1
        let expected = Color::white() * (1.0 / (4.0 * PI));
        assert_eq!(camera.render_pixel(&world, 50, 50), expected);
    }

    #[test]
    fn recursive_and_flat_agree_without_branches() {
        let (world, camera) = wall_scene();

        // specular is zero and no branch is spawned, so the recursive
        // driver reduces to the Lambertian term
        let flat = camera.render_pixel(&world, 50, 50);
        assert_eq!(camera.render_pixel_recursive(&world, 50, 50, 5), flat);
        assert_eq!(camera.render_pixel_dispersive(&world, 50, 50, 5), flat);
    }

    #[test]
    fn render_fills_canvas() {
        let (world, camera) = wall_scene();
        let camera = Camera { width: 4, height: 3, ..camera };

        let canvas = camera.render(&world, RenderMode::Flat, 1);

        assert_eq!(canvas.width, 4);
        assert_eq!(canvas.height, 3);
        assert!(canvas.read_pixel(2, 1).is_some());
    }
}
