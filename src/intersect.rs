use glam::Vec3;

use crate::consts::{ GEOM_EPSILON, MAX_DISTANCE };
use crate::geometry::Triangle;
use crate::ray::Ray;

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. Parameter
/// `distance` is the ray parameter of the hit (the offset from the ray
/// origin, which is a distance because ray directions are unit length).
///
/// The hit triangle is stored as an index into the world's triangle list
/// rather than a reference, so the record stays `Copy` and carries no
/// lifetime through the recursive shading calls.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub position: Vec3,
    pub distance: f32,
    pub triangle: usize,
}

/// A collection of intersections.
///
/// Mostly a wrapper for a vector of `Intersection` records. See the
/// `Intersection` documentation for more information.
#[derive(Clone, Debug, Default)]
pub struct Intersections {
    pub intersections: Vec<Intersection>,
}

impl Intersections {
    /// Creates a new list of intersections.
    pub fn new() -> Intersections {
        Intersections { intersections: Vec::new() }
    }

    /// Selects the nearest hit, if any hit was recorded.
    ///
    /// The sort is stable, so two hits at equal distance resolve to the one
    /// found first; for a fixed triangle ordering the result is
    /// deterministic even under degenerate coplanar geometry.
    pub fn hit(&mut self) -> Option<Intersection> {
        self.intersections.retain(|i| i.distance.is_finite());
        self.sort();

        self.intersections.first().copied()
    }

    /// Sorts the intersections by distance, ignoring `f32` NaN semantics.
    pub fn sort(&mut self) {
        self.intersections.sort_by(|a, b|
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        );
    }
}

/// Intersects a ray with a single triangle.
///
/// Plane test first: a ray near-parallel to the triangle's plane is
/// rejected before the division, and the ray parameter must land in
/// `[0, MAX_DISTANCE]`. The candidate point is then expressed in the
/// (generally non-orthogonal) basis of the triangle's edges by solving the
/// 2x2 system with determinant `1 - B*D`; the point is inside the triangle
/// iff both coefficients lie in `[0, 1]` and they sum to at most one,
/// edges inclusive.
///
/// Returns the ray parameter and the hit point.
pub fn try_intersection(ray: &Ray, triangle: &Triangle) -> Option<(f32, Vec3)> {
    let e1 = triangle.v1 - triangle.v0;
    let e2 = triangle.v2 - triangle.v0;

    let plane_normal = e1.cross(e2).normalize();

    // computing the denominator preventively
    let den = ray.direction.dot(plane_normal);
    if den.abs() < GEOM_EPSILON {
        return None;
    }

    let lambda = (triangle.v0 - ray.origin).dot(plane_normal) / den;
    if lambda < 0.0 || lambda > MAX_DISTANCE {
        return None;
    }

    let point = ray.position(lambda);

    // Solving the linear system
    let a = (point - triangle.v0).dot(e1.normalize() / e1.length());
    let b = e1.normalize().dot(e2) / e1.length();
    let c = (point - triangle.v0).dot(e2.normalize() / e2.length());
    let d = e2.normalize().dot(e1) / e2.length();

    let det = 1.0 - b * d;
    if det.abs() <= GEOM_EPSILON {
        return None;
    }

    // linear combination coefficients of the intersection point
    let lambda1 = (a - b * c) / det;
    let lambda2 = (c - a * d) / det;

    if 0.0 <= lambda1 && lambda1 <= 1.0
        && 0.0 <= lambda2 && lambda2 <= 1.0
        && lambda1 + lambda2 <= 1.0 {
        Some((lambda, point))
    } else {
        None
    }
}

/// Collects every intersection of a ray along a triangle list.
///
/// Hits at the ray's own origin are rejected, so a secondary ray spawned on
/// a surface does not immediately re-hit it.
pub fn find_intersections(ray: &Ray, triangles: &[Triangle]) -> Intersections {
    let mut intersections = Intersections::new();

    for (index, triangle) in triangles.iter().enumerate() {
        if let Some((distance, position)) = try_intersection(ray, triangle) {
            if distance > GEOM_EPSILON {
                intersections.intersections.push(Intersection {
                    position,
                    distance,
                    triangle: index,
                });
            }
        }
    }

    intersections
}

/* Tests */

#[cfg(test)]
fn test_triangle(z: f32) -> Triangle {
    Triangle::new(
        Vec3::new(-1.0, -1.0, z),
        Vec3::new(1.0, -1.0, z),
        Vec3::new(0.0, 1.0, z),
        0,
    )
}

#[test]
fn hit_inside_triangle() {
    let triangle = test_triangle(1.0);
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    let (distance, point) = try_intersection(&ray, &triangle).unwrap();
    assert!(crate::feq(distance, 1.0));
    assert!(crate::feq((point - Vec3::new(0.0, 0.0, 1.0)).length(), 0.0));
}

#[test]
fn hit_distance_matches_analytic_value() {
    let triangle = test_triangle(1.0);
    let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, 1.0));

    let (distance, _) = try_intersection(&ray, &triangle).unwrap();
    assert!(crate::feq(distance, 3.0));
}

#[test]
fn hit_on_edge_is_inside() {
    let triangle = test_triangle(1.0);

    // midpoint of the bottom edge
    let ray = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
    assert!(try_intersection(&ray, &triangle).is_some());

    // exactly on a vertex
    let ray = Ray::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
    assert!(try_intersection(&ray, &triangle).is_some());
}

#[test]
fn miss_point_epsilon_outside_edge() {
    let triangle = test_triangle(1.0);

    // just below the bottom edge
    let ray = Ray::new(Vec3::new(0.0, -1.001, 0.0), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(try_intersection(&ray, &triangle), None);
}

#[test]
fn miss_point_outside_triangle() {
    let triangle = test_triangle(1.0);
    let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(try_intersection(&ray, &triangle), None);
}

#[test]
fn miss_parallel_ray() {
    let triangle = test_triangle(1.0);
    let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));

    assert_eq!(try_intersection(&ray, &triangle), None);
}

#[test]
fn miss_triangle_behind_ray() {
    let triangle = test_triangle(-1.0);
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(try_intersection(&ray, &triangle), None);
}

#[test]
fn nearest_hit_wins() {
    let triangles = vec![test_triangle(2.0), test_triangle(1.0)];
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    let hit = find_intersections(&ray, &triangles).hit().unwrap();
    assert_eq!(hit.triangle, 1);
    assert!(crate::feq(hit.distance, 1.0));
}

#[test]
fn equal_distance_resolves_to_first_inserted() {
    // two coincident triangles; insertion order decides
    let triangles = vec![test_triangle(1.0), test_triangle(1.0)];
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    let hit = find_intersections(&ray, &triangles).hit().unwrap();
    assert_eq!(hit.triangle, 0);
}

#[test]
fn hit_at_ray_origin_rejected() {
    let triangles = vec![test_triangle(0.0)];

    // secondary ray starting on the surface itself
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    let mut intersections = find_intersections(&ray, &triangles);

    assert_eq!(intersections.hit(), None);
}

#[test]
fn empty_scene_has_no_hit() {
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    let mut intersections = find_intersections(&ray, &[]);

    assert_eq!(intersections.hit(), None);
}
