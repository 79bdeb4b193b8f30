//! Descriptor Loading Tests (requires the `serde` feature)

#![cfg(feature = "serde")]

use std::sync::Arc;

use kinema::animation::{Animation, Evaluator};
use kinema::core::EvaluatorSettings;

const ANIMATION_JSON: &str = r#"{
    "id": "bounce",
    "samplers": [
        { "id": "time", "components": 1, "control_points": [0.0, 0.3333333, 0.6666667, 1.0] },
        { "id": "height", "components": 1, "control_points": [0.0, 0.3333333, 0.6666667, 1.0] }
    ],
    "channels": [
        { "id": "bounce/y", "target": "ball/t.Y", "time_sampler": "time", "data_sampler": "height" }
    ]
}"#;

#[test]
fn animation_loads_from_json() -> anyhow::Result<()> {
    let animation: Animation = serde_json::from_str(ANIMATION_JSON)?;
    assert_eq!(animation.id, "bounce");
    assert_eq!(animation.samplers.len(), 2);
    assert_eq!(animation.samplers[0].segment_count(), 1);
    assert_eq!(animation.channels[0].target, "ball/t.Y");

    let mut evaluator = Evaluator::new();
    let position = evaluator.listener::<glam::Vec3>("ball/t")?;
    evaluator.add_animation(Arc::new(animation), 0.0);
    evaluator.update_absolute(0.5);
    assert!((position.value().y - 0.5).abs() < 1e-4);
    Ok(())
}

#[test]
fn malformed_sampler_fails_to_load() {
    let json = r#"{ "id": "bad", "components": 1, "control_points": [0.0, 1.0] }"#;
    let result: Result<kinema::animation::Sampler, _> = serde_json::from_str(json);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("Malformed sampler 'bad'"), "unexpected error: {err}");
}

#[test]
fn settings_fill_missing_fields_with_defaults() -> anyhow::Result<()> {
    let settings: EvaluatorSettings = serde_json::from_str(r#"{ "start_time": 3.0 }"#)?;
    assert_eq!(settings.start_time, 3.0);
    assert_eq!(settings.inversion_epsilon, EvaluatorSettings::default().inversion_epsilon);
    assert!(settings.report_inversion_failures);
    Ok(())
}
