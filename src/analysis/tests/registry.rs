use std::sync::Arc;

use super::common::*;
use crate::analysis::factor::{FactorDefinition, FactorResult, Layer};
use crate::analysis::registry::FactorRegistry;
use crate::error::AnalysisError;

fn definition(name: &'static str, layer: Layer, order: i32) -> FactorDefinition {
    FactorDefinition {
        name,
        layer,
        order,
        version: "1",
        description: "test factor",
        group: None,
        evaluator: Arc::new(|_context, _current| FactorResult::neutral("test", "noop")),
    }
}

#[test]
fn duplicate_name_is_rejected() {
    let mut registry = FactorRegistry::new();
    registry
        .register(definition("alpha", Layer::Special, 10))
        .expect("first registration");

    let err = registry
        .register(definition("alpha", Layer::Clinical, 20))
        .expect_err("duplicate must fail");
    assert!(matches!(err, AnalysisError::DuplicateFactor { name } if name == "alpha"));
}

#[test]
fn registration_after_freeze_is_rejected() {
    let mut registry = FactorRegistry::new();
    registry
        .register(definition("alpha", Layer::Special, 10))
        .expect("registers before freeze");

    registry.freeze();
    assert!(registry.is_frozen());

    let err = registry
        .register(definition("beta", Layer::Special, 20))
        .expect_err("frozen registry must reject");
    assert!(matches!(err, AnalysisError::RegistryFrozen { name } if name == "beta"));
}

#[test]
fn first_analysis_freezes_the_registry() {
    let analyzer = analyzer();
    assert!(!analyzer.registry().is_frozen());

    analyzer
        .analyze(&baseline_context())
        .expect("baseline analyzes");
    assert!(analyzer.registry().is_frozen());
}

#[test]
fn layer_ordering_is_stable_under_equal_order() {
    let mut registry = FactorRegistry::new();
    // Interleave layers and reuse the same order value; registration
    // sequence must break the ties.
    registry
        .register(definition("c_first", Layer::Clinical, 10))
        .expect("registers");
    registry
        .register(definition("s_first", Layer::Special, 10))
        .expect("registers");
    registry
        .register(definition("c_second", Layer::Clinical, 10))
        .expect("registers");
    registry
        .register(definition("c_early", Layer::Clinical, 5))
        .expect("registers");

    let names: Vec<&str> = registry
        .factors_for_layer(Layer::Clinical)
        .iter()
        .map(|definition| definition.name)
        .collect();
    assert_eq!(names, vec!["c_early", "c_first", "c_second"]);
}

#[test]
fn standard_registry_covers_every_layer() {
    let registry = FactorRegistry::with_standard_factors().expect("standard factors register");
    for layer in Layer::ordered() {
        assert!(
            !registry.factors_for_layer(layer).is_empty(),
            "layer {layer} has no factors"
        );
    }
}
