use super::template::Template;
use super::value::FormData;
use std::sync::Arc;
use tracing::debug;

/// The set of templates a deployment offers, in display order.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Arc<Template>>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self {
            templates: templates.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Template>> {
        self.templates.iter().find(|t| t.id == id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Template>> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Guesses which template produced a stored payload.
    ///
    /// Picks the template declaring the most of the payload's keys; ties go to
    /// the earlier template and a payload sharing no key with any template
    /// yields `None`.
    pub fn detect(&self, data: &FormData) -> Option<Arc<Template>> {
        let mut best: Option<(&Arc<Template>, usize)> = None;
        for template in &self.templates {
            let score = data.keys().filter(|key| template.contains(key)).count();
            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((template, score));
            }
        }
        best.map(|(template, score)| {
            debug!(template = %template.id, score, "detected template from payload");
            Arc::clone(template)
        })
    }
}
