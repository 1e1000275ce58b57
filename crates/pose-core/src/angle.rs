//! Joint-angle geometry.

/// Angle at `vertex` between the rays toward `proximal` and `distal`, in
/// degrees within [0, 180].
///
/// Collinear rays land exactly on 0 or 180 thanks to the clamped cosine.
/// A degenerate ray (a landmark coinciding with the vertex) yields 0 rather
/// than an error; callers treat every frame's angles as transient values.
pub fn angle_between(proximal: (f32, f32), vertex: (f32, f32), distal: (f32, f32)) -> f32 {
    let (ax, ay) = (proximal.0 - vertex.0, proximal.1 - vertex.1);
    let (bx, by) = (distal.0 - vertex.0, distal.1 - vertex.1);

    let norms = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
    if norms <= f32::EPSILON {
        return 0.0;
    }

    let cosine = ((ax * bx + ay * by) / norms).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}
