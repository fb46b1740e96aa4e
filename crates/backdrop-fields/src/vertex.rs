//! Interleaved point vertices for upload to an external renderer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::color::Rgb;
use crate::error::FieldError;

/// One point sprite: position, color, and size packed for a vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub size: f32,
}

impl PointVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: (std::mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32,
        },
    ];

    /// Get the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Zip index-aligned attribute arrays into vertices.
pub fn interleave(
    positions: &[Vec3],
    colors: &[Rgb],
    sizes: &[f32],
) -> Result<Vec<PointVertex>, FieldError> {
    if positions.len() != colors.len() || positions.len() != sizes.len() {
        return Err(FieldError::LengthMismatch {
            positions: positions.len(),
            colors: colors.len(),
            sizes: sizes.len(),
        });
    }

    Ok(positions
        .iter()
        .zip(colors)
        .zip(sizes)
        .map(|((p, c), s)| PointVertex {
            position: p.to_array(),
            color: *c,
            size: *s,
        })
        .collect())
}

/// Same vertices with positions replaced, e.g. after a per-frame update.
pub fn with_positions(
    vertices: &[PointVertex],
    positions: &[Vec3],
) -> Result<Vec<PointVertex>, FieldError> {
    if vertices.len() != positions.len() {
        return Err(FieldError::PositionMismatch {
            vertices: vertices.len(),
            positions: positions.len(),
        });
    }
    Ok(vertices
        .iter()
        .zip(positions)
        .map(|(v, p)| PointVertex {
            position: p.to_array(),
            ..*v
        })
        .collect())
}

/// Raw bytes for a buffer upload.
pub fn as_bytes(vertices: &[PointVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 28);
        assert_eq!(PointVertex::layout().array_stride, 28);
        assert_eq!(PointVertex::layout().attributes.len(), 3);
    }

    #[test]
    fn test_interleave_keeps_index_alignment() {
        let positions = [Vec3::X, Vec3::Y];
        let colors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let sizes = [0.1, 0.2];
        let vertices = interleave(&positions, &colors, &sizes).unwrap();
        assert_eq!(vertices[1].position, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[1].size, 0.2);
    }

    #[test]
    fn test_interleave_rejects_ragged_input() {
        let result = interleave(&[Vec3::ZERO], &[], &[1.0]);
        assert!(matches!(result, Err(FieldError::LengthMismatch { .. })));
    }

    #[test]
    fn test_as_bytes_length() {
        let vertices = vec![PointVertex::zeroed(); 4];
        assert_eq!(as_bytes(&vertices).len(), 4 * 28);
    }

    #[test]
    fn test_with_positions_rejects_wrong_count() {
        let vertices = vec![PointVertex::zeroed(); 2];
        let result = with_positions(&vertices, &[Vec3::X]);
        assert!(matches!(
            result,
            Err(FieldError::PositionMismatch {
                vertices: 2,
                positions: 1
            })
        ));
    }

    #[test]
    fn test_with_positions_keeps_color_and_size() {
        let vertices = interleave(&[Vec3::X], &[[0.5, 0.5, 0.5]], &[0.3]).unwrap();
        let moved = with_positions(&vertices, &[Vec3::Z]).unwrap();
        assert_eq!(moved[0].position, [0.0, 0.0, 1.0]);
        assert_eq!(moved[0].color, [0.5, 0.5, 0.5]);
        assert_eq!(moved[0].size, 0.3);
    }
}
