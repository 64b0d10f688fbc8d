use std::ops::Range;

use wgpu::{
    Buffer, BufferUsages, Device, IndexFormat, RenderPass, VertexBufferLayout,
    util::{BufferInitDescriptor, DeviceExt},
};

use crate::vertex::Vertex;

/// Fixed vertex and index data, grouped into triangles of three indices.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Geometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Geometry {
    pub(crate) fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Two side-by-side triangles with no shared vertices.
    pub(crate) fn twin_triangles() -> Self {
        Self::new(
            vec![
                // left
                Vertex::new(-0.5, 0.5, 0.0),
                Vertex::new(-1.0, -0.5, 0.0),
                Vertex::new(0.0, -0.5, 0.0),
                // right
                Vertex::new(0.5, 0.5, 0.0),
                Vertex::new(0.0, -0.5, 0.0),
                Vertex::new(1.0, -0.5, 0.0),
            ],
            vec![0, 1, 2, 3, 4, 5],
        )
    }

    pub(crate) fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub(crate) fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub(crate) fn draw_range(&self) -> Range<u32> {
        0..self.index_count()
    }

    /// Index triples as the rasterizer reads them. A trailing partial triple is dropped.
    pub(crate) fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|triple| [triple[0], triple[1], triple[2]])
    }

    /// Copies both arrays into GPU buffers in one call each.
    ///
    /// Index values are not checked against the vertex count.
    pub(crate) fn upload(&self, device: &Device) -> GeometryBuffers {
        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Geometry Vertex Buffer"),
            contents: bytemuck::cast_slice(self.vertices()),
            usage: BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Geometry Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: BufferUsages::INDEX,
        });

        log::debug!(
            "uploaded {} vertices and {} indices ({} triangles)",
            self.vertices.len(),
            self.indices.len(),
            self.triangles().count()
        );

        GeometryBuffers {
            vertex_buffer,
            index_buffer,
            vertex_buffer_layout: Vertex::layout(),
            draw_range: self.draw_range(),
        }
    }
}

pub(crate) struct GeometryBuffers {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    vertex_buffer_layout: VertexBufferLayout<'static>,
    draw_range: Range<u32>,
}

impl GeometryBuffers {
    pub(crate) fn vertex_buffer_layout(&self) -> &VertexBufferLayout<'static> {
        &self.vertex_buffer_layout
    }

    pub(crate) fn draw(&self, render_pass: &mut RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint32);
        render_pass.draw_indexed(self.draw_range.clone(), 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn draws_six_indices() {
        let geometry = Geometry::twin_triangles();
        assert_eq!(geometry.index_count(), 6);
        assert_eq!(geometry.draw_range(), 0..6);
    }

    #[test]
    fn triangles_are_disjoint() {
        let geometry = Geometry::twin_triangles();
        let triangles: Vec<[u32; 3]> = geometry.triangles().collect();
        assert_eq!(triangles, vec![[0, 1, 2], [3, 4, 5]]);

        let first: HashSet<u32> = triangles[0].into_iter().collect();
        let second: HashSet<u32> = triangles[1].into_iter().collect();
        assert!(first.is_disjoint(&second));
    }

    #[test]
    fn indices_stay_within_vertex_list() {
        let geometry = Geometry::twin_triangles();
        let vertex_count = geometry.vertices().len() as u32;
        assert_eq!(vertex_count, 6);
        assert!(geometry.triangles().flatten().all(|index| index < vertex_count));
    }

    #[test]
    fn partial_triple_is_not_a_triangle() {
        let geometry = Geometry::new(
            vec![Vertex::new(0.0, 0.0, 0.0); 4],
            vec![0, 1, 2, 3],
        );
        assert_eq!(geometry.triangles().count(), 1);
        assert_eq!(geometry.index_count(), 4);
    }

    #[test]
    fn triangles_share_a_position_but_not_an_index() {
        let geometry = Geometry::twin_triangles();
        let vertices = geometry.vertices();
        assert_eq!(vertices[2], vertices[4]);
    }
}
