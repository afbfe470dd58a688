use glam::Vec3;

/// A triangular surface.
///
/// The normal is derived from the vertex winding and must be recomputed
/// whenever a vertex changes. The material is a handle into the world's
/// material arena; many triangles share one material record, and the arena
/// outlives every triangle referencing it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,

    /// Unit front-face normal, derived from the winding.
    pub normal: Vec3,

    /// Index into the world's material arena.
    pub material: usize,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: usize) -> Triangle {
        let mut triangle = Triangle { v0, v1, v2, normal: Vec3::ZERO, material };
        triangle.compute_normal();
        triangle
    }

    /// Recomputes the front-face normal from the current vertices.
    pub fn compute_normal(&mut self) {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;

        self.normal = e2.cross(e1).normalize();
    }
}

#[test]
fn normal_follows_winding() {
    // counter-clockwise in the XY plane seen from -Z
    let t = Triangle::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        0,
    );

    assert_eq!(t.normal, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn normal_flips_with_winding() {
    let t = Triangle::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        0,
    );

    assert_eq!(t.normal, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn normal_recomputed_after_vertex_change() {
    let mut t = Triangle::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        0,
    );

    // rotate the triangle into the XZ plane
    t.v2 = Vec3::new(0.0, 0.0, 1.0);
    t.compute_normal();

    assert_eq!(t.normal, Vec3::new(0.0, 1.0, 0.0));
}
