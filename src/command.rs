use glam::Vec3;

use crate::camera::{ Camera, rotation_x, rotation_y };
use crate::world::World;

/// A scene mutation.
///
/// An interactive shell translates its input events into these values and
/// applies them strictly between render passes; a render pass never runs
/// concurrently with an `apply`. Angles are in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    TranslateCamera(Vec3),
    YawCamera(f32),
    PitchCamera(f32),
    TranslateLight(Vec3),
}

impl Command {
    /// Applies the mutation to the camera and world.
    pub fn apply(&self, camera: &mut Camera, world: &mut World) {
        match *self {
            Command::TranslateCamera(delta) => camera.position += delta,
            Command::YawCamera(degrees) => {
                camera.rotation = rotation_y(degrees) * camera.rotation;
            }
            Command::PitchCamera(degrees) => {
                camera.rotation = rotation_x(degrees) * camera.rotation;
            }
            Command::TranslateLight(delta) => world.light.translate(delta),
        }
    }
}

/* Tests */

#[cfg(test)]
fn test_pair() -> (Camera, World) {
    use crate::color::Color;
    use crate::light::Light;

    let camera = Camera::new(Vec3::ZERO, 100.0, 100, 100);
    let world = World::new(
        Light::point(Vec3::new(0.0, -0.5, -0.7), Color::white()),
        Color::black(),
    );

    (camera, world)
}

#[test]
fn translate_camera() {
    let (mut camera, mut world) = test_pair();

    Command::TranslateCamera(Vec3::new(0.1, 0.0, -0.2)).apply(&mut camera, &mut world);
    assert_eq!(camera.position, Vec3::new(0.1, 0.0, -0.2));
}

#[test]
fn translate_light() {
    let (mut camera, mut world) = test_pair();

    Command::TranslateLight(Vec3::new(0.0, 0.1, 0.0)).apply(&mut camera, &mut world);
    assert_eq!(world.light.position(), Vec3::new(0.0, -0.4, -0.7));
}

#[test]
fn yaw_rotates_the_forward_axis() {
    let (mut camera, mut world) = test_pair();

    Command::YawCamera(90.0).apply(&mut camera, &mut world);
    assert!(crate::feq((camera.forward() - Vec3::new(-1.0, 0.0, 0.0)).length(), 0.0));
}

#[test]
fn yaw_keeps_rotation_orthonormal() {
    let (mut camera, mut world) = test_pair();

    for _ in 0..8 {
        Command::YawCamera(33.0).apply(&mut camera, &mut world);
        Command::PitchCamera(-21.0).apply(&mut camera, &mut world);
    }

    let product = camera.rotation.transpose() * camera.rotation;
    for (a, b) in product.to_cols_array().iter()
        .zip(glam::Mat3::IDENTITY.to_cols_array().iter()) {
        assert!(crate::feq(*a, *b));
    }
}
