//! Dependency and validation rules evaluated against live form data.
//!
//! Everything here is a pure function of a template and the current data, so
//! visibility is recomputed in full after every edit instead of being patched.

use super::template::{Dependency, DependencyAction, Field, Template};
use super::value::{FieldValue, FormData};
use regex::Regex;
use std::collections::BTreeSet;

pub const REQUIRED_MESSAGE: &str = "Este campo es obligatorio";
pub const NUMERIC_MESSAGE: &str = "Solo se permiten dígitos";
pub const PATTERN_MESSAGE: &str = "El formato no es válido";

/// A dependency matches when its controlling field currently holds the
/// expected value. Unset or unknown controlling fields never match.
pub fn dependency_matches(dependency: &Dependency, data: &FormData) -> bool {
    data.get(&dependency.field)
        .is_some_and(|current| current.matches(&dependency.value))
}

/// A field is visible while no `hide` rule matches and every `show` rule
/// matches. Fields without either kind are always visible.
pub fn is_field_visible(field: &Field, data: &FormData) -> bool {
    field.dependencies.iter().all(|dependency| match dependency.action {
        DependencyAction::Show => dependency_matches(dependency, data),
        DependencyAction::Hide => !dependency_matches(dependency, data),
        DependencyAction::Require => true,
    })
}

pub fn compute_visibility(template: &Template, data: &FormData) -> BTreeSet<String> {
    template
        .fields()
        .filter(|field| is_field_visible(field, data))
        .map(|field| field.id.clone())
        .collect()
}

/// Own `required` flag, or any currently matching `require` dependency.
pub fn is_field_required(field: &Field, data: &FormData) -> bool {
    field.validation.required
        || field.dependencies.iter().any(|dependency| {
            dependency.action == DependencyAction::Require && dependency_matches(dependency, data)
        })
}

/// Runs a field's rules against one value, first failure wins.
///
/// `pattern` is the field's compiled pattern; an uncompilable pattern is
/// passed as `None` and the rule is skipped.
pub fn check_value(
    field: &Field,
    value: Option<&FieldValue>,
    required: bool,
    pattern: Option<&Regex>,
) -> Option<String> {
    let rules = &field.validation;
    let message = |custom: &Option<String>, fallback: String| custom.clone().unwrap_or(fallback);

    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return required.then(|| message(&rules.required_message, REQUIRED_MESSAGE.to_string()));
    };
    let Some(text) = value.as_text() else {
        return None;
    };
    let length = text.chars().count();

    if let Some(exact) = rules.exact_length {
        if length != exact {
            return Some(message(
                &rules.length_message,
                format!("Debe tener exactamente {exact} caracteres"),
            ));
        }
    } else {
        if let Some(min) = rules.min_length
            && length < min
        {
            return Some(message(
                &rules.length_message,
                format!("Debe tener al menos {min} caracteres"),
            ));
        }
        if let Some(max) = rules.max_length
            && length > max
        {
            return Some(message(
                &rules.length_message,
                format!("Debe tener como máximo {max} caracteres"),
            ));
        }
    }

    if rules.numeric_only && !text.chars().all(|c| c.is_ascii_digit()) {
        return Some(message(&rules.numeric_message, NUMERIC_MESSAGE.to_string()));
    }

    if let Some(regex) = pattern
        && !regex.is_match(&text)
    {
        return Some(message(&rules.pattern_message, PATTERN_MESSAGE.to_string()));
    }

    None
}
