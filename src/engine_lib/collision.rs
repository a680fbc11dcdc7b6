// src/engine_lib/collision.rs

use glam::{Mat4, Vec3};
use thiserror::Error;

/// Below this, a determinant or a hit distance counts as zero.
pub const INTERSECTION_EPSILON: f32 = 1e-7;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    #[error("collision vertex list has {len} entries, which is not a multiple of 3")]
    RaggedVertexList { len: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_length: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, max_length: f32) -> Self {
        Self { origin, direction, max_length: max_length.max(0.0) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self {
            v0: transform.transform_point3(self.v0),
            v1: transform.transform_point3(self.v1),
            v2: transform.transform_point3(self.v2),
        }
    }
}

pub struct TriangleIntersection;

impl TriangleIntersection {
    /// Möller–Trumbore. Returns the distance along `direction` (in units of its
    /// length) when the ray hits the triangle in front of `origin`.
    #[inline(always)]
    pub fn ray_triangle(origin: Vec3, direction: Vec3, triangle: &Triangle) -> Option<f32> {
        let edge1 = triangle.v1 - triangle.v0;
        let edge2 = triangle.v2 - triangle.v0;
        let h = direction.cross(edge2);
        let a = edge1.dot(h);

        // Parallel to the plane, or a degenerate triangle.
        if a.abs() < INTERSECTION_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = origin - triangle.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t > INTERSECTION_EPSILON {
            Some(t)
        } else {
            None
        }
    }
}

/// Static level geometry as a triangle soup: every three consecutive
/// positions form one triangle.
#[derive(Clone, Debug, Default)]
pub struct CollisionMesh {
    vertices: Vec<Vec3>,
}

impl CollisionMesh {
    pub fn new(vertices: Vec<Vec3>) -> Result<Self, CollisionError> {
        if vertices.len() % 3 != 0 {
            return Err(CollisionError::RaggedVertexList { len: vertices.len() });
        }
        Ok(Self { vertices })
    }

    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut vertices = Vec::with_capacity(triangles.len() * 3);
        for tri in triangles {
            vertices.extend_from_slice(&[tri.v0, tri.v1, tri.v2]);
        }
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| Triangle::new(tri[0], tri[1], tri[2]))
    }

    /// Bakes a placement into the vertices so later probes run in world space.
    pub fn to_world(&self, model: &Mat4) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| model.transform_point3(*v)).collect(),
        }
    }
}

/// True as soon as any triangle of `mesh` is hit closer than `max_length`.
/// With `model`, vertices are moved into world space before each test.
pub fn probe(
    origin: Vec3,
    direction: Vec3,
    max_length: f32,
    mesh: &CollisionMesh,
    model: Option<&Mat4>,
) -> bool {
    match model {
        Some(model) => mesh
            .triangles()
            .map(|tri| tri.transformed(model))
            .any(|tri| hits_within(origin, direction, max_length, &tri)),
        None => mesh
            .triangles()
            .any(|tri| hits_within(origin, direction, max_length, &tri)),
    }
}

pub fn probe_ray(ray: &Ray, mesh: &CollisionMesh, model: Option<&Mat4>) -> bool {
    probe(ray.origin, ray.direction, ray.max_length, mesh, model)
}

#[inline(always)]
fn hits_within(origin: Vec3, direction: Vec3, max_length: f32, triangle: &Triangle) -> bool {
    matches!(
        TriangleIntersection::ray_triangle(origin, direction, triangle),
        Some(t) if t < max_length
    )
}
