//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside the bounds
pub fn rect_outline(min: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    // Top, bottom, left, right
    vertices.extend(rect(min, Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + t), Vec2::new(t, size.y - 2.0 * t), color));
    vertices.extend(rect(
        Vec2::new(min.x + size.x - t, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices
}

/// Rhombus with the given center and half-diagonal
pub fn diamond(center: Vec2, half: f32, color: [f32; 4]) -> Vec<Vertex> {
    let top = center - Vec2::Y * half;
    let bottom = center + Vec2::Y * half;
    let left = center - Vec2::X * half;
    let right = center + Vec2::X * half;
    vec![
        Vertex::new(top.x, top.y, color),
        Vertex::new(right.x, right.y, color),
        Vertex::new(bottom.x, bottom.y, color),
        Vertex::new(top.x, top.y, color),
        Vertex::new(bottom.x, bottom.y, color),
        Vertex::new(left.x, left.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    #[test]
    fn test_rect_covers_bounds() {
        let v = rect(Vec2::new(20.0, 40.0), Vec2::splat(20.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (Vec2::new(20.0, 40.0), Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn test_outline_stays_inside() {
        let v = rect_outline(Vec2::ZERO, Vec2::splat(20.0), 2.0, [1.0; 4]);
        assert_eq!(v.len(), 24);
        assert_eq!(bounds(&v), (Vec2::ZERO, Vec2::splat(20.0)));
    }

    #[test]
    fn test_diamond_extent() {
        let v = diamond(Vec2::splat(10.0), 5.0, [1.0; 4]);
        assert_eq!(bounds(&v), (Vec2::splat(5.0), Vec2::splat(15.0)));
    }

    #[test]
    fn test_circle_triangle_count() {
        assert_eq!(circle(Vec2::ZERO, 3.0, [1.0; 4], 12).len(), 36);
    }
}
