//! The deformable terrain plane.

use glam::Vec3;
use venera_height::HeightField;

use crate::MeshVertex;

/// A regular grid mesh in plane coordinates, deformed in place each frame.
///
/// Topology (vertex count, index buffer, UVs) is fixed at construction; only
/// elevations and normals mutate. The plane spans
/// `[-plane_scale/2, +plane_scale/2]` on both axes with +Z as the out-of-plane
/// direction, matching the height field's coordinate convention.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    detail: u32,
    resolution: u32,
    plane_scale: f32,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl TerrainMesh {
    /// Allocate the flat plane.
    pub fn new(detail: u32, plane_scale: f32) -> Self {
        let resolution = detail + 1;
        let mut vertices = Vec::with_capacity((resolution * resolution) as usize);

        for iy in 0..resolution {
            for ix in 0..resolution {
                let u = ix as f32 / detail as f32;
                let v = iy as f32 / detail as f32;
                vertices.push(MeshVertex {
                    position: [plane_scale * (u - 0.5), plane_scale * (v - 0.5), 0.0],
                    normal: [0.0, 0.0, 1.0],
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity((detail * detail * 6) as usize);
        for iy in 0..detail {
            for ix in 0..detail {
                let v00 = iy * resolution + ix;
                let v10 = v00 + 1;
                let v01 = v00 + resolution;
                let v11 = v01 + 1;
                // Counter-clockwise when viewed from +Z.
                indices.extend_from_slice(&[v00, v10, v11, v00, v11, v01]);
            }
        }

        Self {
            detail,
            resolution,
            plane_scale,
            vertices,
            indices,
        }
    }

    /// Rewrite every vertex elevation from the field, then recompute normals.
    ///
    /// A full rewrite each frame is intentional: the field itself is rebuilt
    /// wholesale from the capture, and the grid is small enough that a delta
    /// scheme would save nothing. Normals computed here always describe this
    /// frame's heights.
    pub fn apply_height_field(&mut self, field: &HeightField) {
        for vertex in &mut self.vertices {
            let [x, y, _] = vertex.position;
            vertex.position[2] = field.sample(x, y);
        }
        self.recompute_normals();
    }

    /// Smoothed vertex normals: area-weighted face normal accumulation.
    fn recompute_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = [0.0; 3];
        }

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            // Unnormalized cross product weights each face by its area.
            let face = (pb - pa).cross(pc - pa);
            for &i in &[a, b, c] {
                let n = Vec3::from_array(self.vertices[i].normal) + face;
                self.vertices[i].normal = n.to_array();
            }
        }

        for vertex in &mut self.vertices {
            let n = Vec3::from_array(vertex.normal);
            vertex.normal = n.try_normalize().unwrap_or(Vec3::Z).to_array();
        }
    }

    /// Vertex slice for GPU upload.
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Triangle-list index slice.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertices per axis (`detail + 1`).
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Grid segments per axis.
    pub fn detail(&self) -> u32 {
        self.detail
    }

    /// Side length of the plane.
    pub fn plane_scale(&self) -> f32 {
        self.plane_scale
    }

    /// The vertex at grid position `(ix, iy)`.
    pub fn vertex_at(&self, ix: u32, iy: u32) -> &MeshVertex {
        &self.vertices[(iy * self.resolution + ix) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venera_height::elevation_at;

    const DETAIL: u32 = 8;
    const SCALE: f32 = 40.0;
    const MULT: f32 = 3.5;

    fn field_from_bytes(bytes: &[u8]) -> HeightField {
        let mut field = HeightField::new(DETAIL, SCALE, MULT);
        let rgba: Vec<u8> = bytes.iter().flat_map(|&r| [r, 0, 0, 255]).collect();
        field.update_from_rgba(&rgba).unwrap();
        field
    }

    fn ramp_bytes() -> Vec<u8> {
        let n = DETAIL + 1;
        (0..(n * n)).map(|i| (i % 256) as u8).collect()
    }

    #[test]
    fn test_topology_counts() {
        let mesh = TerrainMesh::new(DETAIL, SCALE);
        let n = DETAIL + 1;
        assert_eq!(mesh.vertices().len(), (n * n) as usize);
        assert_eq!(mesh.indices().len(), (DETAIL * DETAIL * 6) as usize);
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = TerrainMesh::new(DETAIL, SCALE);
        let count = mesh.vertices().len() as u32;
        assert!(mesh.indices().iter().all(|&i| i < count));
    }

    #[test]
    fn test_plane_spans_centered_square() {
        let mesh = TerrainMesh::new(DETAIL, SCALE);
        let first = mesh.vertex_at(0, 0).position;
        let last = mesh.vertex_at(DETAIL, DETAIL).position;
        assert_eq!(first[0], -SCALE / 2.0);
        assert_eq!(first[1], -SCALE / 2.0);
        assert_eq!(last[0], SCALE / 2.0);
        assert_eq!(last[1], SCALE / 2.0);
    }

    #[test]
    fn test_uvs_span_unit_square() {
        let mesh = TerrainMesh::new(DETAIL, SCALE);
        assert_eq!(mesh.vertex_at(0, 0).uv, [0.0, 0.0]);
        assert_eq!(mesh.vertex_at(DETAIL, DETAIL).uv, [1.0, 1.0]);
    }

    #[test]
    fn test_sea_level_field_leaves_mesh_flat() {
        let n = DETAIL + 1;
        let mut mesh = TerrainMesh::new(DETAIL, SCALE);
        mesh.apply_height_field(&field_from_bytes(&vec![128u8; (n * n) as usize]));

        for vertex in mesh.vertices() {
            assert_eq!(vertex.position[2], 0.0);
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_deform_then_query_round_trip_is_exact() {
        let field = field_from_bytes(&ramp_bytes());
        let mut mesh = TerrainMesh::new(DETAIL, SCALE);
        mesh.apply_height_field(&field);

        for iy in 0..mesh.resolution() {
            for ix in 0..mesh.resolution() {
                let vertex = mesh.vertex_at(ix, iy);
                let [x, y, z] = vertex.position;
                assert_eq!(
                    elevation_at(&field, x, y),
                    z,
                    "placement query disagreed with mesh at vertex ({ix}, {iy})"
                );
            }
        }
    }

    #[test]
    fn test_normals_tilt_against_slope() {
        let n = DETAIL + 1;
        // Bytes rise along +x, so the surface slopes up in +x and interior
        // normals must lean toward -x.
        let bytes: Vec<u8> = (0..(n * n))
            .map(|i| (100 + (i % n) * 10).min(255) as u8)
            .collect();
        let mut mesh = TerrainMesh::new(DETAIL, SCALE);
        mesh.apply_height_field(&field_from_bytes(&bytes));

        let normal = mesh.vertex_at(DETAIL / 2, DETAIL / 2).normal;
        assert!(normal[0] < 0.0, "normal x should lean against the slope");
        assert!(normal[2] > 0.0, "normal should still face up");
        let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normals_reflect_current_frame_not_stale() {
        let n = DETAIL + 1;
        let mut mesh = TerrainMesh::new(DETAIL, SCALE);

        let sloped: Vec<u8> = (0..(n * n)).map(|i| (100 + (i % n) * 10).min(255) as u8).collect();
        mesh.apply_height_field(&field_from_bytes(&sloped));
        let tilted = mesh.vertex_at(DETAIL / 2, DETAIL / 2).normal;
        assert!(tilted[0] < 0.0);

        // Re-deforming with a flat field must fully erase the old normals.
        mesh.apply_height_field(&field_from_bytes(&vec![128u8; (n * n) as usize]));
        assert_eq!(mesh.vertex_at(DETAIL / 2, DETAIL / 2).normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_topology_unchanged_by_deformation() {
        let mut mesh = TerrainMesh::new(DETAIL, SCALE);
        let indices_before = mesh.indices().to_vec();
        mesh.apply_height_field(&field_from_bytes(&ramp_bytes()));
        assert_eq!(mesh.indices(), indices_before.as_slice());
        // Plane coordinates are untouched; only elevation moved.
        assert_eq!(mesh.vertex_at(0, 0).position[0], -SCALE / 2.0);
    }
}
