use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexStepMode, vertex_attr_array};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    position: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [VertexAttribute; 1] = vertex_attr_array![0 => Float32x3];

    pub(crate) const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }

    /// Tightly packed, one `vec3<f32>` at shader location 0.
    pub(crate) fn layout() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::VertexFormat;

    #[test]
    fn layout_is_tightly_packed_vec3() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);

        let attribute = layout.attributes[0];
        assert_eq!(attribute.shader_location, 0);
        assert_eq!(attribute.offset, 0);
        assert_eq!(attribute.format, VertexFormat::Float32x3);
    }

    #[test]
    fn bytes_follow_position_order() {
        let vertex = Vertex::new(1.0, -1.0, 0.5);
        let floats: [f32; 3] = bytemuck::cast(vertex);
        assert_eq!(floats, [1.0, -1.0, 0.5]);
        assert_eq!(bytemuck::bytes_of(&vertex).len(), 12);
    }
}
