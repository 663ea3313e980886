//! Unit meshes shared by every instance

use super::vertex::Vertex;

/// Outward normal plus the two in-plane axes (u x v = normal)
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// Two counter-clockwise triangles for a square centered at `center`
fn quad(center: [f32; 3], u: [f32; 3], v: [f32; 3], normal: [f32; 3], half: f32) -> [Vertex; 6] {
    let corner = |su: f32, sv: f32| {
        Vertex::new(
            [
                center[0] + (u[0] * su + v[0] * sv) * half,
                center[1] + (u[1] * su + v[1] * sv) * half,
                center[2] + (u[2] * su + v[2] * sv) * half,
            ],
            normal,
        )
    };
    let a = corner(-1.0, -1.0);
    let b = corner(1.0, -1.0);
    let c = corner(1.0, 1.0);
    let d = corner(-1.0, 1.0);
    [a, b, c, a, c, d]
}

/// Unit cube centered at the origin, 36 vertices with flat normals
pub fn unit_cube() -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in CUBE_FACES {
        let center = [normal[0] * 0.5, normal[1] * 0.5, normal[2] * 0.5];
        vertices.extend_from_slice(&quad(center, u, v, normal, 0.5));
    }
    vertices
}

/// Unit square in the XZ plane facing +Y. Drawn without culling, so both sides show.
pub fn ground_quad() -> Vec<Vertex> {
    quad([0.0; 3], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0], 0.5).to_vec()
}
