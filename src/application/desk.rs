use crate::application::engine::FormEngine;
use crate::domain::catalog::TemplateCatalog;
use crate::domain::legacy;
use crate::domain::ports::SubmissionStoreBox;
use crate::domain::submission::Submission;
use crate::error::{FormError, Result};
use tracing::{info, warn};

/// Entry point for requesters: opens forms and saves them.
///
/// `RequestDesk` owns the template catalog and the submission store. Forms are
/// handed out as `FormEngine`s; `submit` borrows the engine mutably for the
/// whole save, so no edit can slip in while it is in flight.
pub struct RequestDesk {
    catalog: TemplateCatalog,
    store: SubmissionStoreBox,
}

impl RequestDesk {
    /// Creates a new `RequestDesk`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The templates requesters can pick from.
    /// * `store` - Where submitted requests are persisted.
    pub fn new(catalog: TemplateCatalog, store: SubmissionStoreBox) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Starts a blank form for the given template.
    pub fn open(&self, template_id: &str) -> Result<FormEngine> {
        let template = self
            .catalog
            .get(template_id)
            .ok_or_else(|| FormError::UnknownTemplate(template_id.to_string()))?;

        let mut engine = FormEngine::new();
        engine.select_template(Some(template), None);
        Ok(engine)
    }

    /// Reopens a stored request for editing.
    ///
    /// The template is taken from the submission, or detected from its field
    /// names for payloads stored before the id was recorded. Retired field
    /// names are normalised before the data is replayed.
    pub async fn open_existing(&self, id: u32) -> Result<FormEngine> {
        let Submission {
            template_id,
            mut data,
            ..
        } = self
            .store
            .get(id)
            .await?
            .ok_or(FormError::UnknownSubmission(id))?;

        let template = match template_id {
            Some(template_id) => self
                .catalog
                .get(&template_id)
                .ok_or(FormError::UnknownTemplate(template_id))?,
            None => self
                .catalog
                .detect(&data)
                .ok_or_else(|| FormError::UnknownTemplate(format!("<undetectable for {id}>")))?,
        };

        legacy::normalize(&template, &mut data);

        let mut engine = FormEngine::new();
        engine.select_template(Some(template), Some(data));
        Ok(engine)
    }

    /// Validates and persists the form under `id`.
    ///
    /// On success the engine is reset and the stored submission returned. If
    /// the form is invalid, `FormError::Invalid` carries every field error. If
    /// the store fails, the engine goes back to editing with its data intact.
    pub async fn submit(&self, id: u32, engine: &mut FormEngine) -> Result<Submission> {
        if engine.is_busy() {
            return Err(FormError::Busy);
        }
        let template_id = engine
            .template()
            .map(|template| template.id.clone())
            .ok_or_else(|| FormError::UnknownTemplate("<none selected>".to_string()))?;

        if !engine.begin_submission() {
            return Err(FormError::Invalid(engine.errors().clone()));
        }

        let submission = Submission::new(id, template_id, engine.data().clone());
        match self.store.store(submission.clone()).await {
            Ok(()) => {
                info!(id, template = ?submission.template_id, "stored submission");
                engine.submission_succeeded();
                Ok(submission)
            }
            Err(e) => {
                warn!(id, error = %e, "failed to store submission");
                engine.submission_failed();
                Err(e)
            }
        }
    }

    pub async fn submissions(&self) -> Result<Vec<Submission>> {
        self.store.get_all().await
    }
}
