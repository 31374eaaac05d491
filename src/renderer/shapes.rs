//! Shape generation for 2D primitives
//!
//! Everything is tessellated on the CPU into triangle lists in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segment count for a circle of this radius: smooth but bounded
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.8) as u32).clamp(12, 64)
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

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (dir1, dir2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Thick straight segment as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width * 0.5);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Axis-aligned filled rectangle from its top-left corner
fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let max = min + size;
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Seven-segment masks for 0-9: bit order a b c d e f g
const DIGIT_SEGMENTS: [u8; 10] = [
    0b1111110, 0b0110000, 0b1101101, 0b1111001, 0b0110011, 0b1011011, 0b1011111, 0b1110000,
    0b1111111, 0b1111011,
];

/// Width of one digit cell relative to the text height
const DIGIT_ASPECT: f32 = 0.55;
const DIGIT_GAP: f32 = 0.2;

/// Number label centered on `center`, `height` pixels tall, drawn as seven-segment digits
pub fn number(value: u32, center: Vec2, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let digits: Vec<u32> = value
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    let w = height * DIGIT_ASPECT;
    let gap = height * DIGIT_GAP * DIGIT_ASPECT;
    let t = (height * 0.12).max(1.0);
    let total = digits.len() as f32 * w + (digits.len().saturating_sub(1)) as f32 * gap;
    let mut origin = Vec2::new(center.x - total * 0.5, center.y - height * 0.5);

    let mut vertices = Vec::with_capacity(digits.len() * 7 * 6);
    for digit in digits {
        let mask = DIGIT_SEGMENTS[digit as usize];
        let half = (height - t) * 0.5;
        // a b c d e f g
        let segments = [
            (Vec2::new(0.0, 0.0), Vec2::new(w, t)),
            (Vec2::new(w - t, 0.0), Vec2::new(t, half + t)),
            (Vec2::new(w - t, half), Vec2::new(t, half + t)),
            (Vec2::new(0.0, height - t), Vec2::new(w, t)),
            (Vec2::new(0.0, half), Vec2::new(t, half + t)),
            (Vec2::new(0.0, 0.0), Vec2::new(t, half + t)),
            (Vec2::new(0.0, half), Vec2::new(w, t)),
        ];
        for (bit, (offset, size)) in segments.iter().enumerate() {
            if mask & (1 << (6 - bit)) != 0 {
                vertices.extend_from_slice(&rect(origin + *offset, *size, color));
            }
        }
        origin.x += w + gap;
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        for vertex in &v {
            let p = Vec2::from(vertex.position);
            assert!(p.length() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 3.0, [1.0; 4]).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::X, 3.0, [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_number_segments() {
        // "8" lights all seven segments, "1" only two
        assert_eq!(number(8, Vec2::ZERO, 20.0, [1.0; 4]).len(), 7 * 6);
        assert_eq!(number(1, Vec2::ZERO, 20.0, [1.0; 4]).len(), 2 * 6);
        assert_eq!(number(18, Vec2::ZERO, 20.0, [1.0; 4]).len(), 9 * 6);
    }

    #[test]
    fn test_number_is_centered() {
        let v = number(42, Vec2::new(100.0, 50.0), 20.0, [1.0; 4]);
        let (min_x, max_x) = v.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            (lo.min(v.position[0]), hi.max(v.position[0]))
        });
        assert!(((min_x + max_x) * 0.5 - 100.0).abs() < 1e-3);
    }
}
