// Barycentric helpers for a single triangle.
//
// Weights are a Vec3 (w0, w1, w2) matching the triangle's vertex order.
// Nothing here guards against zero-area triangles; the mesh supplier must.

use glam::Vec3;

/// w0·v0 + w1·v1 + w2·v2.
#[inline]
pub fn interpolate(tri: &[Vec3; 3], weights: Vec3) -> Vec3 {
    weights.x * tri[0] + weights.y * tri[1] + weights.z * tri[2]
}

/// Project `p` onto the plane of `tri` and return its (unclamped) weights.
///
/// Standard dot-product solve over the edge basis (v1−v0, v2−v0).
/// Weights may be negative or above one when `p` lies outside the triangle.
pub fn project(tri: &[Vec3; 3], p: Vec3) -> Vec3 {
    let e0 = tri[1] - tri[0];
    let e1 = tri[2] - tri[0];
    let rel = p - tri[0];

    let d00 = e0.dot(e0);
    let d01 = e0.dot(e1);
    let d11 = e1.dot(e1);
    let d20 = rel.dot(e0);
    let d21 = rel.dot(e1);
    let denom = d00 * d11 - d01 * d01;

    let w1 = (d11 * d20 - d01 * d21) / denom;
    let w2 = (d00 * d21 - d01 * d20) / denom;
    Vec3::new(1.0 - w1 - w2, w1, w2)
}

/// Weights of the point on `tri` closest to `p` (clamped to the triangle).
///
/// Minimizes |v0 + s·e0 + t·e1 − p|² over the triangle's (s,t) domain by
/// classifying the unconstrained minimum into one of seven regions
/// (interior, three edges, three vertices) and clamping there.
/// Eberly, "Distance Between Point and Triangle in 3D".
pub fn closest(tri: &[Vec3; 3], p: Vec3) -> Vec3 {
    let e0 = tri[1] - tri[0];
    let e1 = tri[2] - tri[0];
    let diff = tri[0] - p;

    let a = e0.dot(e0);
    let b = e0.dot(e1);
    let c = e1.dot(e1);
    let d = e0.dot(diff);
    let e = e1.dot(diff);

    let det = a * c - b * b;
    let mut s = b * e - c * d;
    let mut t = b * d - a * e;

    if s + t < det {
        if s < 0.0 {
            if t < 0.0 {
                // Region 4: vertex v0, nearest along whichever edge descends.
                if d < 0.0 {
                    s = (-d / a).clamp(0.0, 1.0);
                    t = 0.0;
                } else {
                    s = 0.0;
                    t = (-e / c).clamp(0.0, 1.0);
                }
            } else {
                // Region 3: edge v0–v2.
                s = 0.0;
                t = (-e / c).clamp(0.0, 1.0);
            }
        } else if t < 0.0 {
            // Region 5: edge v0–v1.
            s = (-d / a).clamp(0.0, 1.0);
            t = 0.0;
        } else {
            // Region 0: interior.
            let inv_det = 1.0 / det;
            s *= inv_det;
            t *= inv_det;
        }
    } else if s < 0.0 {
        // Region 2: vertex v2, either edge v1–v2 or edge v0–v2.
        let tmp0 = b + d;
        let tmp1 = c + e;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            let denom = a - 2.0 * b + c;
            s = (numer / denom).clamp(0.0, 1.0);
            t = 1.0 - s;
        } else {
            s = 0.0;
            t = (-e / c).clamp(0.0, 1.0);
        }
    } else if t < 0.0 {
        // Region 6: vertex v1, either edge v1–v2 or edge v0–v1.
        if a + d > b + e {
            let numer = c + e - b - d;
            let denom = a - 2.0 * b + c;
            s = (numer / denom).clamp(0.0, 1.0);
            t = 1.0 - s;
        } else {
            s = (-d / a).clamp(0.0, 1.0);
            t = 0.0;
        }
    } else {
        // Region 1: edge v1–v2.
        let numer = c + e - b - d;
        let denom = a - 2.0 * b + c;
        s = (numer / denom).clamp(0.0, 1.0);
        t = 1.0 - s;
    }

    Vec3::new(1.0 - s - t, s, t)
}
