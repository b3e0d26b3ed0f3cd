use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use std::f64::consts::PI;

/// Unweighted mean of a set of points, `None` when the set is empty.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Smallest sphere around `center` that encloses every `(point, radius)` ball.
pub fn enclosing_radius<'a>(
    center: &Point3<f64>,
    balls: impl IntoIterator<Item = (&'a Point3<f64>, f64)>,
) -> f64 {
    balls
        .into_iter()
        .map(|(p, r)| (p - center).norm() + r)
        .fold(0.0, f64::max)
}

pub fn rotation_to_align(from: &Vector3<f64>, to: &Vector3<f64>) -> Rotation3<f64> {
    Rotation3::rotation_between(from, to)
        .unwrap_or_else(|| Rotation3::from_axis_angle(&perpendicular_axis(from), PI))
}

fn perpendicular_axis(v: &Vector3<f64>) -> nalgebra::Unit<Vector3<f64>> {
    let helper = if v.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    nalgebra::Unit::new_normalize(v.cross(&helper))
}

/// Instance transform for a unit sphere scaled to `radius` at `center`.
pub fn sphere_transform(center: &Point3<f64>, radius: f64) -> Matrix4<f32> {
    (Matrix4::new_translation(&center.coords) * Matrix4::new_scaling(radius)).cast::<f32>()
}

/// Instance transform for a unit cylinder (height 1 along +Y, centered at the
/// origin) spanning `start`..`end` with the given radius.
pub fn cylinder_transform(start: &Point3<f64>, end: &Point3<f64>, radius: f64) -> Matrix4<f32> {
    let axis = end - start;
    let length = axis.norm();
    let midpoint = nalgebra::center(start, end);
    let rotation = if length > 0.0 {
        rotation_to_align(&Vector3::y(), &(axis / length))
    } else {
        Rotation3::identity()
    };
    (Matrix4::new_translation(&midpoint.coords)
        * rotation.to_homogeneous()
        * Matrix4::new_nonuniform_scaling(&Vector3::new(radius, length, radius)))
    .cast::<f32>()
}
