use crate::game::draw::Primitive;

/// Interleaved `[x, y, z, shade, shade, shade]` vertices plus triangle indices.
/// Shapes are white and unit-sized; the material colour is applied per draw.
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

pub const FLOATS_PER_VERTEX: usize = 6;

impl Mesh {
    pub fn for_primitive(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Cube => Mesh::cube(),
            Primitive::Pad => Mesh::prism(8),
        }
    }

    pub fn cube() -> Self {
        let s = 0.5;
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };

        // Faces are shaded by orientation so the flat-colour shader still reads as 3D.
        mesh.quad([[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]], 0.9);
        mesh.quad([[s, -s, -s], [-s, -s, -s], [-s, s, -s], [s, s, -s]], 0.7);
        mesh.quad([[-s, s, s], [s, s, s], [s, s, -s], [-s, s, -s]], 1.0);
        mesh.quad([[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]], 0.4);
        mesh.quad([[s, -s, s], [s, -s, -s], [s, s, -s], [s, s, s]], 0.8);
        mesh.quad([[-s, -s, -s], [-s, -s, s], [-s, s, s], [-s, s, -s]], 0.6);
        mesh
    }

    /// A flat `sides`-gon slab of unit diameter and unit height.
    pub fn prism(sides: u16) -> Self {
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };
        let ring = |i: u16| {
            let a = i as f32 / sides as f32 * std::f32::consts::TAU;
            (0.5 * a.cos(), 0.5 * a.sin())
        };

        let top_centre = mesh.vertex([0.0, 0.5, 0.0], 1.0);
        let first = mesh.next_index();
        for i in 0..sides {
            let (x, z) = ring(i);
            mesh.vertex([x, 0.5, z], 1.0);
        }
        for i in 0..sides {
            mesh.indices.extend_from_slice(&[top_centre, first + (i + 1) % sides, first + i]);
        }

        for i in 0..sides {
            let (x0, z0) = ring(i);
            let (x1, z1) = ring(i + 1);
            mesh.quad([[x0, -0.5, z0], [x1, -0.5, z1], [x1, 0.5, z1], [x0, 0.5, z0]], 0.7);
        }
        mesh
    }

    fn next_index(&self) -> u16 {
        (self.vertices.len() / FLOATS_PER_VERTEX) as u16
    }

    fn vertex(&mut self, p: [f32; 3], shade: f32) -> u16 {
        let index = self.next_index();
        self.vertices.extend_from_slice(&[p[0], p[1], p[2], shade, shade, shade]);
        index
    }

    fn quad(&mut self, corners: [[f32; 3]; 4], shade: f32) {
        let base = self.next_index();
        for corner in corners {
            self.vertex(corner, shade);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_shaded_faces() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 24 * FLOATS_PER_VERTEX);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| (i as usize) < 24));
    }

    #[test]
    fn prism_indices_stay_in_range() {
        let pad = Mesh::prism(8);
        let count = pad.vertices.len() / FLOATS_PER_VERTEX;
        assert_eq!(count, 1 + 8 + 8 * 4);
        assert_eq!(pad.indices.len(), 8 * 3 + 8 * 6);
        assert!(pad.indices.iter().all(|&i| (i as usize) < count));
    }
}
