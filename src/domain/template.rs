use super::value::{FieldValue, FileRef};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Input kind of a field. Drives rendering and how raw text is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Currency,
    Email,
    Phone,
    Select,
    MultiSelect,
    Radio,
    Checkbox,
    Textarea,
    File,
    Date,
    AccountNumber,
    Bank,
}

impl FieldKind {
    /// Whether the kind picks from a fixed list of options.
    pub fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect | Self::Radio)
    }

    /// Converts raw renderer input into a typed value for this kind.
    ///
    /// Numeric kinds fall back to text when the input does not parse, so the
    /// validation rules still see what the user typed.
    pub fn coerce(self, raw: &str) -> FieldValue {
        let trimmed = raw.trim();
        match self {
            Self::Number | Self::Currency => trimmed
                .replace(',', "")
                .parse::<Decimal>()
                .map(FieldValue::Number)
                .unwrap_or_else(|_| FieldValue::Text(raw.to_string())),
            Self::Checkbox => FieldValue::Bool(matches!(
                trimmed.to_ascii_lowercase().as_str(),
                "true" | "1" | "si" | "sí" | "on"
            )),
            Self::MultiSelect => FieldValue::List(
                trimmed
                    .split(';')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            Self::File => FieldValue::Files(
                trimmed
                    .split(';')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(FileRef::named)
                    .collect(),
            ),
            _ => FieldValue::Text(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyAction {
    Show,
    Hide,
    Require,
}

/// Conditional relationship: when `field` currently equals `value`, apply
/// `action` to the field that declares this dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(alias = "campo")]
    pub field: String,
    #[serde(alias = "valor")]
    pub value: FieldValue,
    #[serde(alias = "accion")]
    pub action: DependencyAction,
}

/// Validation rules attached to a field, with optional per-rule messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    #[serde(alias = "requerido")]
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub exact_length: Option<usize>,
    pub numeric_only: bool,
    pub pattern: Option<String>,
    pub required_message: Option<String>,
    pub length_message: Option<String>,
    pub numeric_message: Option<String>,
    pub pattern_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub kind: FieldKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, alias = "validaciones")]
    pub validation: ValidationRules,
    #[serde(default, alias = "dependencias", skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

/// Static schema describing one payment-request form type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<Section>,
}

impl Template {
    /// All fields in declaration order, across sections.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields().find(|field| field.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    /// Reports authoring mistakes. The engine tolerates all of them.
    pub fn lint(&self) -> Vec<TemplateIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for field in self.fields() {
            if !seen.insert(field.id.as_str()) {
                issues.push(TemplateIssue::DuplicateField {
                    field: field.id.clone(),
                });
            }
            if field.kind.has_options() && field.options.is_empty() {
                issues.push(TemplateIssue::MissingOptions {
                    field: field.id.clone(),
                });
            }
            if let Some(pattern) = &field.validation.pattern
                && let Err(e) = Regex::new(pattern)
            {
                issues.push(TemplateIssue::InvalidPattern {
                    field: field.id.clone(),
                    error: e.to_string(),
                });
            }
            for dependency in &field.dependencies {
                if dependency.field == field.id {
                    issues.push(TemplateIssue::SelfDependency {
                        field: field.id.clone(),
                    });
                } else if !self.contains(&dependency.field) {
                    issues.push(TemplateIssue::DanglingDependency {
                        field: field.id.clone(),
                        target: dependency.field.clone(),
                    });
                }
            }
        }

        issues
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    DuplicateField { field: String },
    DanglingDependency { field: String, target: String },
    SelfDependency { field: String },
    MissingOptions { field: String },
    InvalidPattern { field: String, error: String },
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField { field } => write!(f, "field '{field}' is declared twice"),
            Self::DanglingDependency { field, target } => {
                write!(f, "field '{field}' depends on unknown field '{target}'")
            }
            Self::SelfDependency { field } => write!(f, "field '{field}' depends on itself"),
            Self::MissingOptions { field } => {
                write!(f, "choice field '{field}' declares no options")
            }
            Self::InvalidPattern { field, error } => {
                write!(f, "field '{field}' has an invalid pattern: {error}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_template_deserialization_accepts_legacy_keys() {
        let json = r#"{
            "id": "demo",
            "name": "Demo",
            "version": "1.0",
            "sections": [{
                "id": "main",
                "title": "Principal",
                "fields": [
                    {"id": "tipo", "kind": "select", "label": "Tipo",
                     "options": [{"value": "A", "label": "A"}]},
                    {"id": "detalle", "kind": "text", "label": "Detalle",
                     "validaciones": {"requerido": true, "max_length": 10},
                     "dependencias": [{"campo": "tipo", "valor": "A", "accion": "show"}]}
                ]
            }]
        }"#;
        let template: Template = serde_json::from_str(json).unwrap();

        let detalle = template.field("detalle").unwrap();
        assert!(detalle.validation.required);
        assert_eq!(detalle.validation.max_length, Some(10));
        assert_eq!(detalle.dependencies[0].action, DependencyAction::Show);
        assert_eq!(detalle.dependencies[0].value, FieldValue::text("A"));
        assert!(template.lint().is_empty());
    }

    #[test]
    fn test_lint_reports_authoring_mistakes() {
        let json = r#"{
            "id": "broken", "name": "Broken", "version": "0",
            "sections": [{"id": "s", "title": "S", "fields": [
                {"id": "a", "kind": "select", "label": "A"},
                {"id": "a", "kind": "text", "label": "A again",
                 "validation": {"pattern": "(unclosed"}},
                {"id": "b", "kind": "text", "label": "B", "dependencies": [
                    {"field": "ghost", "value": "x", "action": "require"},
                    {"field": "b", "value": "x", "action": "hide"}
                ]}
            ]}]
        }"#;
        let template: Template = serde_json::from_str(json).unwrap();
        let issues = template.lint();

        assert!(issues.contains(&TemplateIssue::MissingOptions { field: "a".into() }));
        assert!(issues.contains(&TemplateIssue::DuplicateField { field: "a".into() }));
        assert!(issues.contains(&TemplateIssue::DanglingDependency {
            field: "b".into(),
            target: "ghost".into()
        }));
        assert!(issues.contains(&TemplateIssue::SelfDependency { field: "b".into() }));
        assert!(
            issues
                .iter()
                .any(|issue| matches!(issue, TemplateIssue::InvalidPattern { .. }))
        );
    }

    #[test]
    fn test_coerce_by_kind() {
        assert_eq!(
            FieldKind::Currency.coerce("1,250.50"),
            FieldValue::Number(dec!(1250.50))
        );
        assert_eq!(FieldKind::Number.coerce("12a"), FieldValue::text("12a"));
        assert_eq!(FieldKind::Checkbox.coerce("Sí"), FieldValue::Bool(true));
        assert_eq!(
            FieldKind::MultiSelect.coerce("CC-01; CC-02;"),
            FieldValue::List(vec!["CC-01".into(), "CC-02".into()])
        );
        assert_eq!(
            FieldKind::File.coerce("factura.pdf"),
            FieldValue::Files(vec![FileRef::named("factura.pdf")])
        );
        assert_eq!(
            FieldKind::AccountNumber.coerce("012180001234567891"),
            FieldValue::text("012180001234567891")
        );
    }
}
