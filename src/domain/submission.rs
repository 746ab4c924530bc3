use super::value::FormData;
use serde::{Deserialize, Serialize};

/// A payment request as persisted by the backend.
///
/// Older payloads were stored without the template id; those are matched to a
/// template by their field names when reopened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub data: FormData,
}

impl Submission {
    pub fn new(id: u32, template_id: impl Into<String>, data: FormData) -> Self {
        Self {
            id,
            template_id: Some(template_id.into()),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::FieldValue;

    #[test]
    fn test_legacy_payload_without_template_id() {
        let json = r#"{"id": 7, "data": {"monto": 100, "beneficiario": "Ana"}}"#;
        let submission: Submission = serde_json::from_str(json).unwrap();

        assert_eq!(submission.id, 7);
        assert!(submission.template_id.is_none());
        assert_eq!(submission.data["beneficiario"], FieldValue::text("Ana"));
    }
}
