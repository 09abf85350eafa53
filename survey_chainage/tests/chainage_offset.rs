use survey_chainage::{
    project, project_with, AlignmentPoint, Centerline, ChainageError, ChainageReference,
    ProjectionOptions, Rounding, SurveyPoint,
};

fn centerline(points: &[(f64, f64, f64)]) -> Centerline {
    Centerline::from_points(
        points
            .iter()
            .map(|&(e, n, ch)| AlignmentPoint::new(e, n, ch))
            .collect(),
    )
    .unwrap()
}

fn three_point() -> Centerline {
    centerline(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0), (20.0, 0.0, 20.0)])
}

#[test]
fn point_beside_single_segment() {
    let cl = centerline(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0)]);
    let res = project(&[SurveyPoint::new("1", 5.0, 3.0)], &cl).unwrap();
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].survey_point_id, "1");
    assert!((res[0].chainage - 5.0).abs() < 1e-9);
    assert!((res[0].offset - 3.0).abs() < 1e-9);
}

#[test]
fn point_on_vertex() {
    let res = project(&[SurveyPoint::new("v", 10.0, 0.0)], &three_point()).unwrap();
    assert_eq!(res[0].chainage, 10.0);
    assert_eq!(res[0].offset, 0.0);
}

#[test]
fn point_before_start_clamps() {
    let res = project(&[SurveyPoint::new("b", -5.0, 0.0)], &three_point()).unwrap();
    assert_eq!(res[0].chainage, 0.0);
    assert_eq!(res[0].offset, 5.0);
}

#[test]
fn point_past_end_clamps() {
    let res = project(&[SurveyPoint::new("e", 26.0, 8.0)], &three_point()).unwrap();
    assert_eq!(res[0].chainage, 20.0);
    assert_eq!(res[0].offset, 10.0);
}

#[test]
fn empty_survey_gives_empty_result() {
    let res = project(&[], &three_point()).unwrap();
    assert!(res.is_empty());
}

#[test]
fn results_keep_input_order() {
    let survey = vec![
        SurveyPoint::new("c", 18.0, 1.0),
        SurveyPoint::new("a", 2.0, -1.0),
        SurveyPoint::new("b", 11.0, 2.0),
    ];
    let res = project(&survey, &three_point()).unwrap();
    let ids: Vec<&str> = res.iter().map(|r| r.survey_point_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    let chainages: Vec<f64> = res.iter().map(|r| r.chainage).collect();
    assert_eq!(chainages, vec![18.0, 2.0, 11.0]);
}

#[test]
fn values_rounded_to_three_places() {
    let cl = centerline(&[(0.0, 0.0, 0.0), (3.0, 4.0, 5.0)]);
    let res = project(&[SurveyPoint::new("r", 1.0, 0.0)], &cl).unwrap();
    // Foot at t = 0.12 -> chainage 0.6, offset 0.8.
    assert_eq!(res[0].chainage, 0.6);
    assert_eq!(res[0].offset, 0.8);

    let straight = centerline(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0)]);
    let res = project(&[SurveyPoint::new("r", 1.0 / 3.0, 1.0)], &straight).unwrap();
    assert_eq!(res[0].chainage, 0.333);
}

#[test]
fn rounding_mode_is_configurable() {
    // Unit-length segment keeps the tie values exact in binary.
    let cl = centerline(&[(0.0, 0.0, 0.0), (1.0, 0.0, 1.0)]);
    let survey = [SurveyPoint::new("t", 0.0625, 0.1875)];
    let away = project(&survey, &cl).unwrap();
    assert_eq!(away[0].chainage, 0.063);
    assert_eq!(away[0].offset, 0.188);

    let opts = ProjectionOptions {
        rounding: Rounding::HalfToEven,
        ..Default::default()
    };
    let even = project_with(&survey, &cl, &opts).unwrap();
    assert_eq!(even[0].chainage, 0.062);
    assert_eq!(even[0].offset, 0.188);
}

#[test]
fn stored_chainage_reference() {
    let cl = centerline(&[(0.0, 0.0, 2500.0), (10.0, 0.0, 2510.0), (20.0, 0.0, 2520.0)]);
    let opts = ProjectionOptions {
        chainage_reference: ChainageReference::Stored,
        ..Default::default()
    };
    let survey = [SurveyPoint::new("1", 10.0, 0.0), SurveyPoint::new("2", 15.0, -2.0)];
    let res = project_with(&survey, &cl, &opts).unwrap();
    assert_eq!(res[0].chainage, 2510.0);
    assert_eq!(res[1].chainage, 2515.0);
    assert_eq!(res[1].offset, 2.0);

    let arc = project(&survey, &cl).unwrap();
    assert_eq!(arc[0].chainage, 10.0);
}

#[test]
fn bent_centerline_uses_adjacent_segment() {
    let cl = centerline(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0), (10.0, 10.0, 20.0)]);
    let res = project(&[SurveyPoint::new("1", 9.0, 6.0)], &cl).unwrap();
    // Closest vertex is the far corner (10,10); the foot on the leg into it is (10,6).
    assert_eq!(res[0].chainage, 16.0);
    assert_eq!(res[0].offset, 1.0);
}

#[test]
fn duplicate_vertices_do_not_break_projection() {
    let cl = centerline(&[
        (0.0, 0.0, 0.0),
        (5.0, 0.0, 5.0),
        (5.0, 0.0, 5.0),
        (10.0, 0.0, 10.0),
    ]);
    let res = project(
        &[SurveyPoint::new("1", 5.0, 1.0), SurveyPoint::new("2", 7.0, 1.0)],
        &cl,
    )
    .unwrap();
    assert_eq!(res[0].chainage, 5.0);
    assert_eq!(res[0].offset, 1.0);
    assert_eq!(res[1].chainage, 7.0);
    assert_eq!(res[1].offset, 1.0);
}

#[test]
fn parallel_matches_sequential() {
    let cl = centerline(&[(0.0, 0.0, 0.0), (50.0, 10.0, 51.0), (100.0, -5.0, 103.0)]);
    let survey: Vec<SurveyPoint> = (0..200)
        .map(|i| SurveyPoint::new(i.to_string(), i as f64 * 0.5, (i % 7) as f64 - 3.0))
        .collect();
    let seq = project(&survey, &cl).unwrap();
    let opts = ProjectionOptions {
        parallel: true,
        ..Default::default()
    };
    let par = project_with(&survey, &cl, &opts).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn nan_coordinate_fails_the_batch() {
    let survey = vec![
        SurveyPoint::new("ok", 5.0, 1.0),
        SurveyPoint::new("n", f64::NAN, 1.0),
    ];
    match project(&survey, &three_point()) {
        Err(ChainageError::Schema { fields, record }) => {
            assert_eq!(fields, vec!["Easting".to_string()]);
            assert_eq!(record, Some(1));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn infinite_coordinate_fails_the_batch() {
    let survey = vec![SurveyPoint::new("i", f64::INFINITY, f64::NEG_INFINITY)];
    let opts = ProjectionOptions {
        parallel: true,
        ..Default::default()
    };
    match project_with(&survey, &three_point(), &opts) {
        Err(ChainageError::Schema { fields, record }) => {
            assert_eq!(fields, vec!["Easting".to_string(), "Northing".to_string()]);
            assert_eq!(record, Some(0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn oversized_decimals_are_clamped() {
    let cl = centerline(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0)]);
    let opts = ProjectionOptions {
        decimals: 400,
        ..Default::default()
    };
    let res = project_with(&[SurveyPoint::new("1", 5.0, 3.0)], &cl, &opts).unwrap();
    assert_eq!(res[0].chainage, 5.0);
    assert_eq!(res[0].offset, 3.0);
}
