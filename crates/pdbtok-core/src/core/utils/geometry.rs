use nalgebra::Point3;

/// Signed dihedral angle in degrees, in (-180, 180], defined by four points.
///
/// Returns `None` for degenerate geometry (coincident or collinear points) where the
/// torsion is not defined.
pub fn dihedral_angle(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Option<f64> {
    let b1 = p1 - p0;
    let b2 = p2 - p1;
    let b3 = p3 - p2;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    if n1.norm_squared() < 1e-12 || n2.norm_squared() < 1e-12 {
        return None;
    }

    let x = n1.dot(&n2);
    let y = b2.norm() * b1.dot(&n2);
    Some(y.atan2(x).to_degrees())
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn frame() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        )
    }

    #[test]
    fn cis_arrangement_is_zero_degrees() {
        let (p0, p1, p2) = frame();
        let angle = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(angle.abs() < TOLERANCE);
    }

    #[test]
    fn trans_arrangement_is_one_eighty_degrees() {
        let (p0, p1, p2) = frame();
        let angle = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, -1.0, 0.0)).unwrap();
        assert!((angle.abs() - 180.0).abs() < TOLERANCE);
    }

    #[test]
    fn sign_follows_rotation_direction() {
        let (p0, p1, p2) = frame();
        let positive = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, 0.0, 1.0)).unwrap();
        let negative = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, 0.0, -1.0)).unwrap();
        assert!((positive - 90.0).abs() < TOLERANCE);
        assert!((negative + 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn collinear_points_have_no_dihedral() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(1.0, 0.0, 0.0);
        let p2 = Point3::new(2.0, 0.0, 0.0);
        let p3 = Point3::new(3.0, 1.0, 0.0);
        assert!(dihedral_angle(&p0, &p1, &p2, &p3).is_none());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!((distance(&a, &b) - 5.0).abs() < TOLERANCE);
    }
}
