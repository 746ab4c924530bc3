//! Randomized edit sequences over the built-in templates and a fixture with
//! stacked show/hide rules, checking the visibility and validation invariants
//! after every step.

use payreq_forms::application::engine::FormEngine;
use payreq_forms::domain::template::{Dependency, DependencyAction, Template};
use payreq_forms::domain::value::FieldValue;
use payreq_forms::infrastructure::template_files::{builtin_catalog, parse};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn random_value(template: &Template, rng: &mut StdRng) -> (String, FieldValue) {
    let fields: Vec<_> = template.fields().collect();
    let field = fields.choose(rng).unwrap();

    let value = if !field.options.is_empty() && rng.gen_bool(0.8) {
        FieldValue::text(field.options.choose(rng).unwrap().value.clone())
    } else {
        match rng.gen_range(0..5) {
            0 => FieldValue::text(""),
            1 => FieldValue::Bool(rng.gen_bool(0.5)),
            2 => FieldValue::text("x".repeat(rng.gen_range(1..25))),
            3 => FieldValue::text(rng.gen_range(0..u64::MAX).to_string()),
            _ => field.kind.coerce(&rng.gen_range(1..100_000).to_string()),
        }
    };
    (field.id.clone(), value)
}

/// A field is visible iff no `hide` rule currently matches and no `show`
/// rule exists that currently fails to match.
fn assert_visibility_invariant(template: &Template, engine: &FormEngine) {
    let holds = |dependency: &Dependency| {
        engine
            .data()
            .get(&dependency.field)
            .is_some_and(|current| current.matches(&dependency.value))
    };

    for field in template.fields() {
        let hide_matches = field
            .dependencies
            .iter()
            .any(|d| d.action == DependencyAction::Hide && holds(d));
        let show_fails = field
            .dependencies
            .iter()
            .any(|d| d.action == DependencyAction::Show && !holds(d));

        assert_eq!(
            engine.is_visible(&field.id),
            !hide_matches && !show_fails,
            "{}: visibility of {}",
            template.id,
            field.id
        );
    }
}

fn stacked_rules() -> Arc<Template> {
    let json = std::fs::read_to_string("tests/fixtures/stacked_rules.json").unwrap();
    Arc::new(parse(&json).unwrap())
}

fn run(template: Arc<Template>, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = FormEngine::new();
    engine.select_template(Some(Arc::clone(&template)), None);

    for _ in 0..200 {
        let (field, value) = random_value(&template, &mut rng);
        assert!(engine.update_field(&field, value));
        assert_visibility_invariant(&template, &engine);
        assert!(engine.errors().keys().all(|id| engine.is_visible(id)));

        let valid = engine.validate_all();
        assert_eq!(valid, engine.errors().is_empty());
        for id in engine.errors().keys() {
            assert!(engine.is_visible(id), "{id} is hidden but has an error");
        }
    }
}

#[test]
fn test_random_edit_sequences_keep_invariants() {
    let catalog = builtin_catalog().unwrap();
    for (seed, template) in catalog.iter().enumerate() {
        for round in 0..5 {
            run(Arc::clone(template), (seed * 100 + round) as u64);
        }
    }
}

#[test]
fn test_random_edit_sequences_over_stacked_rules() {
    for seed in 0..20 {
        run(stacked_rules(), 1_000 + seed);
    }
}

#[test]
fn test_stacked_rules_visibility() {
    let template = stacked_rules();
    let mut engine = FormEngine::new();
    engine.select_template(Some(Arc::clone(&template)), None);
    assert!(!engine.is_visible("detalle"));
    assert!(!engine.is_visible("entrega"));
    assert!(!engine.is_visible("nota"));

    // both show rules must hold
    engine.update_field("canal", "A".into());
    assert!(!engine.is_visible("detalle"));
    engine.update_field("urgente", FieldValue::Bool(true));
    assert!(engine.is_visible("detalle"));
    engine.update_field("canal", "B".into());
    assert!(!engine.is_visible("detalle"));

    // a hide declared before a show still hides
    assert!(engine.is_visible("entrega"));
    assert!(engine.is_required("entrega"));
    engine.update_field("region", "Sur".into());
    assert!(!engine.is_visible("entrega"));
    assert!(engine.validate_all());

    engine.update_field("region", "Norte".into());
    assert!(engine.is_visible("nota"));
    assert!(engine.is_visible("entrega"));
    assert!(!engine.validate_all());
    assert!(engine.errors().contains_key("entrega"));
    assert!(engine.errors().contains_key("nota"));

    engine.update_field("canal", "A".into());
    assert!(!engine.is_visible("nota"));
    assert!(!engine.is_visible("entrega"));
}

#[test]
fn test_edit_order_does_not_change_final_state() {
    let catalog = builtin_catalog().unwrap();
    let template = catalog.get("transferencia-bancaria").unwrap();
    let edits = vec![
        ("swift", FieldValue::text("BBVAMXMM")),
        ("iban", FieldValue::text("ES9121000418450200051332")),
        ("es_internacional", FieldValue::Bool(true)),
        ("clabe_destino", FieldValue::text("123")),
        ("monto", FieldValue::text("100")),
    ];

    let mut rng = StdRng::seed_from_u64(7);
    let mut reference: Option<FormEngine> = None;
    for _ in 0..10 {
        let mut shuffled = edits.clone();
        shuffled.shuffle(&mut rng);

        let mut engine = FormEngine::new();
        engine.select_template(Some(Arc::clone(&template)), None);
        for (field, value) in shuffled {
            engine.update_field(field, value);
        }
        engine.validate_all();

        if let Some(reference) = &reference {
            assert_eq!(engine.data(), reference.data());
            assert_eq!(engine.visible_fields(), reference.visible_fields());
            assert_eq!(engine.errors(), reference.errors());
        } else {
            reference = Some(engine);
        }
    }
}
