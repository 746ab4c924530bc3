use crate::domain::rules;
use crate::domain::template::Template;
use crate::domain::value::{FieldValue, FormData};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    /// No template selected.
    #[default]
    Idle,
    Editing,
    /// The submission gate passed and a save is in flight.
    Submitting,
}

/// Read-only view handed to the renderer.
#[derive(Debug, Serialize)]
pub struct FormSnapshot<'a> {
    pub data: &'a FormData,
    pub errors: &'a BTreeMap<String, String>,
    pub visible: &'a BTreeSet<String>,
}

/// Interprets a template against a stream of field edits.
///
/// `FormEngine` owns the state of one in-progress payment request: the values
/// entered so far, the fields currently visible and the errors to display.
/// Visibility is recomputed from scratch after every edit, while validation
/// runs for the edited field only; the whole form is validated by
/// [`FormEngine::validate_all`] at submission time.
#[derive(Debug, Default)]
pub struct FormEngine {
    template: Option<Arc<Template>>,
    data: FormData,
    errors: BTreeMap<String, String>,
    visible: BTreeSet<String>,
    patterns: HashMap<String, Regex>,
    /// Text as typed for fields whose value was parsed into a number.
    entered: HashMap<String, String>,
    phase: FormPhase,
}

impl FormEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates a template, optionally replaying previously stored data.
    ///
    /// `initial` is taken as-is; without it, fields start from their template
    /// defaults. A `None` template leaves the engine untouched.
    pub fn select_template(&mut self, template: Option<Arc<Template>>, initial: Option<FormData>) {
        let Some(template) = template else {
            return;
        };

        self.data = match initial {
            Some(data) => data,
            None => template
                .fields()
                .filter_map(|field| Some((field.id.clone(), field.default.clone()?)))
                .collect(),
        };
        self.patterns = compile_patterns(&template);
        self.entered.clear();
        self.errors.clear();
        self.visible = rules::compute_visibility(&template, &self.data);
        self.template = Some(template);
        self.phase = FormPhase::Editing;
    }

    /// Stores a value and refreshes visibility and the field's own error.
    ///
    /// Returns `false` when the write was ignored because no template is
    /// active or the template has no such field.
    pub fn update_field(&mut self, field_id: &str, value: FieldValue) -> bool {
        self.apply(field_id, value, None)
    }

    /// Like [`FormEngine::update_field`], coercing renderer text by field kind.
    ///
    /// Length, digit and pattern rules still see the text as typed when the
    /// kind parses it into a number.
    pub fn update_field_raw(&mut self, field_id: &str, raw: &str) -> bool {
        let kind = self
            .template
            .as_ref()
            .and_then(|template| template.field(field_id))
            .map(|field| field.kind);
        match kind.map(|kind| kind.coerce(raw)) {
            Some(value @ FieldValue::Number(_)) => self.apply(field_id, value, Some(raw.trim())),
            Some(value) => self.apply(field_id, value, None),
            None => self.apply(field_id, FieldValue::text(raw), None),
        }
    }

    fn apply(&mut self, field_id: &str, value: FieldValue, entered: Option<&str>) -> bool {
        let Some(template) = self.template.clone() else {
            debug!(field = field_id, "ignored write without an active template");
            return false;
        };
        if !template.contains(field_id) {
            debug!(field = field_id, template = %template.id, "ignored write to unknown field");
            return false;
        }

        self.data.insert(field_id.to_string(), value);
        match entered {
            Some(raw) => {
                self.entered.insert(field_id.to_string(), raw.to_string());
            }
            None => {
                self.entered.remove(field_id);
            }
        }
        self.visible = rules::compute_visibility(&template, &self.data);

        let visible = &self.visible;
        self.errors.retain(|id, _| visible.contains(id));
        match self.validate_field(field_id) {
            Some(error) => {
                self.errors.insert(field_id.to_string(), error);
            }
            None => {
                self.errors.remove(field_id);
            }
        }
        true
    }

    /// Error for one field, or `None` if it passes. Hidden fields always pass.
    pub fn validate_field(&self, field_id: &str) -> Option<String> {
        let template = self.template.as_ref()?;
        let field = template.field(field_id)?;
        if !self.visible.contains(field_id) {
            return None;
        }
        let required = rules::is_field_required(field, &self.data);
        let entered = self.entered.get(field_id).map(|raw| FieldValue::text(raw.as_str()));
        rules::check_value(
            field,
            entered.as_ref().or_else(|| self.data.get(field_id)),
            required,
            self.patterns.get(field_id),
        )
    }

    /// Validates every visible field and records all failures.
    pub fn validate_all(&mut self) -> bool {
        let errors: BTreeMap<String, String> = self
            .visible
            .iter()
            .filter_map(|id| self.validate_field(id).map(|error| (id.clone(), error)))
            .collect();
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Gate for saving: passes only while editing and when the form is valid.
    pub fn begin_submission(&mut self) -> bool {
        if self.phase != FormPhase::Editing || !self.validate_all() {
            return false;
        }
        self.phase = FormPhase::Submitting;
        true
    }

    /// The save failed; keep everything so the user can retry.
    pub fn submission_failed(&mut self) {
        if self.phase == FormPhase::Submitting {
            self.phase = FormPhase::Editing;
        }
    }

    pub fn submission_succeeded(&mut self) {
        self.reset();
    }

    pub fn snapshot(&self) -> FormSnapshot<'_> {
        FormSnapshot {
            data: &self.data,
            errors: &self.errors,
            visible: &self.visible,
        }
    }

    pub fn template(&self) -> Option<&Arc<Template>> {
        self.template.as_ref()
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn visible_fields(&self) -> &BTreeSet<String> {
        &self.visible
    }

    pub fn is_visible(&self, field_id: &str) -> bool {
        self.visible.contains(field_id)
    }

    pub fn is_required(&self, field_id: &str) -> bool {
        self.template
            .as_ref()
            .and_then(|template| template.field(field_id))
            .is_some_and(|field| rules::is_field_required(field, &self.data))
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == FormPhase::Submitting
    }
}

fn compile_patterns(template: &Template) -> HashMap<String, Regex> {
    let mut patterns = HashMap::new();
    for field in template.fields() {
        let Some(pattern) = &field.validation.pattern else {
            continue;
        };
        match Regex::new(pattern) {
            Ok(regex) => {
                patterns.insert(field.id.clone(), regex);
            }
            Err(e) => warn!(field = %field.id, error = %e, "skipping invalid pattern rule"),
        }
    }
    patterns
}
