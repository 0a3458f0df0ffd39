//! End-to-end tracing through small models.

use approx::assert_abs_diff_eq;
use quadric_kernel::{Line, Model, ModelError, TrackError, V3D, VOID_REGION};

fn regions(model: &Model, origin: V3D, dir: V3D) -> Vec<(i32, f64)> {
    let line = Line::new(origin, dir).unwrap();
    let track = model.trace(&line).unwrap();
    assert_eq!(track.non_complete(), 0);
    track.iter().map(|u| (u.region, u.distance)).collect()
}

#[test]
fn cylinder_crossed_by_x_line() {
    let model = Model::from_toml_str(
        r#"
        [[surface]]
        id = 1
        spec = "c/y 0 0 1"

        [[region]]
        id = 3
        cell = "-1"
        "#,
    )
    .unwrap();
    let line = Line::new(V3D::zero(), V3D::x_axis()).unwrap();
    let cyl = model.surface(1).unwrap();
    assert_eq!(
        line.intersect(cyl),
        vec![V3D::new(-1.0, 0.0, 0.0), V3D::new(1.0, 0.0, 0.0)]
    );

    let track = model.trace(&line).unwrap();
    assert_eq!(track.init_region(), 3);
    assert_eq!(track.len(), 1);
    assert_eq!(track.units()[0].end, V3D::new(1.0, 0.0, 0.0));

    let from_outside = regions(&model, V3D::new(-4.0, 0.0, 0.0), V3D::x_axis());
    assert_eq!(from_outside.len(), 2);
    assert_eq!(from_outside[0].0, VOID_REGION);
    assert_eq!(from_outside[1].0, 3);
    assert_abs_diff_eq!(from_outside[1].1, 5.0, epsilon = 1e-9);
}

#[test]
fn box_and_ball_side_by_side() {
    let model = Model::from_toml_str(
        r#"
        [[surface]]
        id = 1
        spec = "px 0"
        [[surface]]
        id = 2
        spec = "px 2"
        [[surface]]
        id = 3
        spec = "py -1"
        [[surface]]
        id = 4
        spec = "py 1"
        [[surface]]
        id = 5
        spec = "pz -1"
        [[surface]]
        id = 6
        spec = "pz 1"
        [[surface]]
        id = 7
        spec = "s 4 0 0 1"

        [[region]]
        id = 10
        cell = "1 -2 3 -4 5 -6"
        [[region]]
        id = 20
        cell = "-7"
        "#,
    )
    .unwrap();

    let segs = regions(&model, V3D::new(-1.0, 0.0, 0.0), V3D::x_axis());
    let ids: Vec<i32> = segs.iter().map(|s| s.0).collect();
    assert_eq!(ids, vec![0, 10, 0, 20]);
    assert_abs_diff_eq!(segs[1].1, 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(segs[3].1, 6.0, epsilon = 1e-9);

    // a slanted line through the ball centre sees the same sequence
    let diag = regions(&model, V3D::new(-1.0, 0.5, 0.0), V3D::new(1.0, -0.1, 0.0));
    let ids: Vec<i32> = diag.iter().map(|s| s.0).collect();
    assert_eq!(ids, vec![0, 10, 0, 20]);
}

#[test]
fn touching_regions_share_a_boundary() {
    let model = Model::from_toml_str(
        r#"
        [[surface]]
        id = 1
        spec = "so 2"
        [[surface]]
        id = 2
        spec = "so 4"

        [[region]]
        id = 1
        cell = "-1"
        [[region]]
        id = 2
        cell = "1 -2"
        "#,
    )
    .unwrap();

    let segs = regions(&model, V3D::new(0.0, 0.0, -10.0), V3D::z_axis());
    let ids: Vec<i32> = segs.iter().map(|s| s.0).collect();
    assert_eq!(ids, vec![0, 2, 1, 2]);
    let ends: Vec<f64> = segs.iter().map(|s| s.1).collect();
    for (got, want) in ends.iter().zip([6.0, 8.0, 12.0, 14.0]) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
    }
}

#[test]
fn single_sheet_cone_region() {
    let model = Model::from_toml_str(
        r#"
        [[surface]]
        id = 1
        spec = "kz 0 1 1"
        [[surface]]
        id = 2
        spec = "pz 3"

        [[region]]
        id = 5
        cell = "-1 -2"
        "#,
    )
    .unwrap();

    // below the apex the excluded sheet is never entered
    let below = Line::new(V3D::new(-10.0, 0.0, -2.0), V3D::x_axis()).unwrap();
    let track = model.trace(&below).unwrap();
    assert!(track.is_empty());

    let above = regions(&model, V3D::new(-10.0, 0.0, 2.0), V3D::x_axis());
    let ids: Vec<i32> = above.iter().map(|s| s.0).collect();
    assert_eq!(ids, vec![0, 5]);
    assert_abs_diff_eq!(above[1].1, 12.0, epsilon = 1e-9);
}

#[test]
fn overlapping_regions_are_reported() {
    let model = Model::from_toml_str(
        r#"
        [[surface]]
        id = 1
        spec = "so 2"
        [[surface]]
        id = 2
        spec = "s 1 0 0 2"

        [[region]]
        id = 1
        cell = "-1"
        [[region]]
        id = 2
        cell = "-2"
        "#,
    )
    .unwrap();
    let line = Line::new(V3D::new(-5.0, 0.0, 0.0), V3D::x_axis()).unwrap();
    let err = model.trace(&line).unwrap_err();
    assert!(matches!(
        err,
        ModelError::Track(TrackError::OverlappingEnter { region: 2, current: 1, .. })
    ));
}
