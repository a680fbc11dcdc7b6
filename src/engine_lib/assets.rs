// src/engine_lib/assets.rs

use std::path::{Path, PathBuf};
use glam::Vec3;
use thiserror::Error;
use crate::engine_lib::collision::{CollisionError, CollisionMesh};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load model {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("failed to load texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Collision(#[from] CollisionError),
}

/// One indexed sub-mesh of an OBJ model, positions/normals/uvs all sharing
/// the index buffer.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub diffuse_texture: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub path: PathBuf,
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// All triangles of all meshes, in model-local space.
    pub fn collision_mesh(&self) -> Result<CollisionMesh, CollisionError> {
        let mut vertices = Vec::new();
        for mesh in &self.meshes {
            // Trailing indices that do not form a whole triangle are dropped.
            let whole = mesh.indices.len() - mesh.indices.len() % 3;
            let expanded: Option<Vec<Vec3>> = mesh.indices[..whole]
                .iter()
                .map(|&i| mesh.positions.get(i as usize).map(|p| Vec3::from_array(*p)))
                .collect();
            match expanded {
                Some(triangles) => vertices.extend(triangles),
                None => log::warn!(
                    "Mesh '{}' in {} references missing positions, skipping it for collision",
                    mesh.name,
                    self.path.display()
                ),
            }
        }
        CollisionMesh::new(vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

pub fn load_obj(path: &Path) -> Result<ModelData, AssetError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Obj { path: path.to_path_buf(), source })?;

    let materials = match materials {
        Ok(materials) => materials,
        Err(e) => {
            log::warn!("No usable materials for {}: {}", path.display(), e);
            Vec::new()
        }
    };
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let meshes = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let vertex_count = mesh.positions.len() / 3;
            let positions = mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
            let normals = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect()
            } else {
                vec![[0.0, 1.0, 0.0]; vertex_count]
            };
            // OBJ puts v = 0 at the bottom of the image.
            let tex_coords = if mesh.texcoords.len() == vertex_count * 2 {
                mesh.texcoords.chunks_exact(2).map(|t| [t[0], 1.0 - t[1]]).collect()
            } else {
                vec![[0.0, 0.0]; vertex_count]
            };
            let diffuse_texture = mesh
                .material_id
                .and_then(|id| materials.get(id))
                .and_then(|material| material.diffuse_texture.as_ref())
                .map(|texture| base_dir.join(texture));

            MeshData {
                name: model.name,
                positions,
                normals,
                tex_coords,
                indices: mesh.indices,
                diffuse_texture,
            }
        })
        .collect();

    Ok(ModelData { path: path.to_path_buf(), meshes })
}
