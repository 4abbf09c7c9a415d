// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use grasp_geom::{GeomError, RigidTransform, Vec3};
use proptest::prelude::*;

const TOL: f64 = 1e-9;

fn angle() -> impl Strategy<Value = f64> {
    -180.0f64..180.0
}

fn coord() -> impl Strategy<Value = f64> {
    -5.0f64..5.0
}

fn transform() -> impl Strategy<Value = RigidTransform> {
    (
        prop::array::uniform3(coord()),
        prop::array::uniform3(angle()),
    )
        .prop_map(|(p, rpy)| RigidTransform::from_position_and_rpy(Vec3::from(p), rpy))
}

proptest! {
    #[test]
    fn from_axes_returns_its_basis(rpy in prop::array::uniform3(angle())) {
        // Any rotation's columns are a valid orthonormal triple.
        let r = RigidTransform::from_position_and_rpy(Vec3::ZERO, rpy);
        let (x, y, z) = (r.x_axis(), r.y_axis(), r.z_axis());
        let t = RigidTransform::from_axes(x, y, z).unwrap();
        prop_assert!(t.x_axis().approx_eq(&x, TOL));
        prop_assert!(t.y_axis().approx_eq(&y, TOL));
        prop_assert!(t.z_axis().approx_eq(&z, TOL));
        prop_assert!(t.translation().approx_eq(&Vec3::ZERO, TOL));
    }

    #[test]
    fn concatenate_is_associative(a in transform(), b in transform(), c in transform()) {
        let left = RigidTransform::concatenate(&RigidTransform::concatenate(&a, &b), &c);
        let right = RigidTransform::concatenate(&a, &RigidTransform::concatenate(&b, &c));
        prop_assert!(left.approx_eq(&right, TOL), "{left:?} vs {right:?}");
    }

    #[test]
    fn concatenated_frames_stay_orthonormal(a in transform(), b in transform()) {
        let t = RigidTransform::concatenate(&a, &b);
        let (x, y, z) = (t.x_axis(), t.y_axis(), t.z_axis());
        prop_assert!((x.length() - 1.0).abs() < TOL);
        prop_assert!(x.dot(&y).abs() < TOL);
        prop_assert!(x.cross(&y).approx_eq(&z, TOL));
    }
}

#[test]
fn from_axes_normalizes_scaled_axes() {
    let t = RigidTransform::from_axes(
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(0.0, 0.0, 3.0),
    )
    .unwrap();
    assert!(t.approx_eq(&RigidTransform::identity(), TOL));
}

#[test]
fn from_axes_reports_degenerate_axis() {
    let err = RigidTransform::from_axes(Vec3::new(1e-12, 0.0, 0.0), Vec3::UNIT_Y, Vec3::UNIT_Z)
        .unwrap_err();
    assert!(matches!(err, GeomError::DegenerateBasis { .. }));
    assert!(err.to_string().starts_with("degenerate basis: x axis"));
}

#[test]
fn position_and_rpy_places_offset_in_reference_frame() {
    // Reference yawed 90°: a local +x offset lands on world +y.
    let reference = RigidTransform::from_position_and_rpy(Vec3::new(1.0, 2.0, 0.0), [0.0, 0.0, 90.0]);
    let local = RigidTransform::from_position_and_rpy(Vec3::new(0.5, 0.0, 0.25), [0.0, 0.0, 0.0]);
    let world = RigidTransform::concatenate(&local, &reference);
    assert!(world.translation().approx_eq(&Vec3::new(1.0, 2.5, 0.25), TOL));
    assert!(world.x_axis().approx_eq(&Vec3::UNIT_Y, TOL));
}

#[test]
fn translated_moves_in_world_coordinates() {
    let t = RigidTransform::from_position_and_rpy(Vec3::ZERO, [0.0, 0.0, 90.0]);
    let moved = t.translated(Vec3::new(0.0, 0.0, -0.0811));
    assert!(moved.translation().approx_eq(&Vec3::new(0.0, 0.0, -0.0811), TOL));
    assert!(moved.x_axis().approx_eq(&t.x_axis(), TOL));
}
