//! End-to-end pipelines driven by the single-threaded executor.

mod common;

use common::{colors, entries, new_log, person, user, Probe, RowCountBy, UsersToPeopleByEmail};
use rowflow::prelude::*;

fn count_by_color(input: Vec<Record>) -> Vec<Box<dyn Operation>> {
    vec![
        Box::new(EnumerableOperation::new("colors", input)),
        Box::new(StreamingAggregation::new(
            "count_by_color",
            RowCountBy::new(&["color"]),
        )),
    ]
}

#[test]
fn test_source_to_aggregation_pipeline() {
    let mut ops = count_by_color(colors(&["red", "red", "green", "blue", "blue", "blue"]));
    let mut executor = SingleThreadedExecutor::new(PipelineConfig::default().with_name("colors"));

    let manifest = executor.run(&mut ops).expect("pipeline runs");

    assert_eq!(manifest.pipeline, "colors");
    assert_eq!(manifest.rows_out, 3);
    assert!(manifest.outputs_digest.is_some());
    assert!(manifest.finished_ms >= manifest.started_ms);
    assert!(executor.errors().is_empty());
}

#[test]
fn test_output_digest_is_deterministic() {
    let input = colors(&["red", "red", "green"]);
    let mut executor = SingleThreadedExecutor::default();

    let first = executor.run(&mut count_by_color(input.clone())).unwrap();
    let second = executor.run(&mut count_by_color(input)).unwrap();
    let other = executor
        .run(&mut count_by_color(colors(&["red", "green"])))
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.outputs_digest, second.outputs_digest);
    assert_ne!(first.outputs_digest, other.outputs_digest);
}

#[test]
fn test_manifest_records_config_hash() {
    let input = colors(&["red", "green"]);
    let nightly = PipelineConfig::default().with_name("nightly");

    let first = SingleThreadedExecutor::new(nightly.clone())
        .run(&mut count_by_color(input.clone()))
        .unwrap();
    let second = SingleThreadedExecutor::new(nightly)
        .run(&mut count_by_color(input.clone()))
        .unwrap();
    let traced = SingleThreadedExecutor::new(PipelineConfig {
        trace_rows: true,
        ..PipelineConfig::default().with_name("nightly")
    })
    .run(&mut count_by_color(input))
    .unwrap();

    assert_eq!(first.config_hash, second.config_hash);
    assert_ne!(first.config_hash, traced.config_hash);

    let json = serde_json::to_value(&first).unwrap();
    assert_eq!(json["pipeline"], "nightly");
    assert_eq!(json["rows_out"], 2);
    let back: RunManifest = serde_json::from_value(json).unwrap();
    assert_eq!(back.config_hash, first.config_hash);
}

#[test]
fn test_digest_can_be_disabled() {
    let config = PipelineConfig {
        digest_outputs: false,
        ..PipelineConfig::default()
    };
    let mut executor = SingleThreadedExecutor::new(config);
    let manifest = executor.run(&mut count_by_color(colors(&["red"]))).unwrap();
    assert_eq!(manifest.rows_out, 1);
    assert_eq!(manifest.outputs_digest, None);
}

#[test]
fn test_join_feeding_aggregation() {
    let mut join = StreamingMergeJoin::new("users_to_people", UsersToPeopleByEmail::default());
    join.left(EnumerableOperation::new(
        "users",
        vec![
            user(1, "a", "a@x.io"),
            user(2, "b", "b@x.io"),
            user(3, "c", "c@x.io"),
        ],
    ))
    .right(EnumerableOperation::new(
        "people",
        vec![person(1, "a@x.io"), person(2, "b@x.io"), person(3, "c@x.io")],
    ));

    let mut ops: Vec<Box<dyn Operation>> = vec![
        Box::new(join),
        Box::new(StreamingAggregation::new(
            "per_person",
            RowCountBy::new(&["person_id"]),
        )),
    ];

    let manifest = SingleThreadedExecutor::default().run(&mut ops).unwrap();
    assert_eq!(manifest.rows_out, 3);
}

#[test]
fn test_failed_run_reports_errors_and_disposes() {
    let log = new_log();
    let mut join = StreamingMergeJoin::new("failing", UsersToPeopleByEmail::default());
    join.left(Probe::new("users", vec![user(1, "a", "a@x.io")], &log))
        .right(
            Probe::new("people", vec![], &log)
                .failing_with(OpError::Exec("people unavailable".into()))
                .collected(vec![OpError::Exec("people deferred".into())]),
        );
    let mut ops: Vec<Box<dyn Operation>> = vec![Box::new(join)];

    let mut executor = SingleThreadedExecutor::default();
    let err = executor.run(&mut ops).unwrap_err();

    assert!(matches!(err, ExecError::Failed { count: 2, .. }));
    assert_eq!(
        executor.errors(),
        &[
            OpError::Exec("people unavailable".into()),
            OpError::Exec("people deferred".into()),
        ]
    );
    let log = entries(&log);
    assert_eq!(&log[log.len() - 2..], &["dispose users", "dispose people"]);
}

#[test]
fn test_configuration_error_still_disposes() {
    let log = new_log();
    let mut join = StreamingMergeJoin::new("half", UsersToPeopleByEmail::default());
    join.left(Probe::new("users", vec![], &log));
    let mut ops: Vec<Box<dyn Operation>> = vec![Box::new(join)];

    let err = SingleThreadedExecutor::default().run(&mut ops).unwrap_err();

    match err {
        ExecError::Operation(op_err) => assert!(op_err.is_config()),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(entries(&log), vec!["prepare users", "dispose users"]);
}

#[test]
fn test_empty_pipeline_is_rejected() {
    let mut ops: Vec<Box<dyn Operation>> = Vec::new();
    let err = SingleThreadedExecutor::default().run(&mut ops).unwrap_err();
    assert!(matches!(err, ExecError::Empty));
}

#[test]
fn test_aggregation_without_upstream_fails_fast() {
    let mut ops: Vec<Box<dyn Operation>> = vec![Box::new(StreamingAggregation::new(
        "orphan",
        RowCountBy::new(&["color"]),
    ))];
    let err = SingleThreadedExecutor::default().run(&mut ops).unwrap_err();
    assert!(matches!(err, ExecError::Operation(OpError::Config(_))));
}
