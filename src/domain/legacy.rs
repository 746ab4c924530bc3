//! One-time normalisation of payloads stored under retired field names.

use super::template::Template;
use super::value::FormData;
use tracing::debug;

/// `(retired name, current name)` pairs for card top-up requests.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("monto", "monto_total_tukash"),
    ("beneficiario", "beneficiario_tarjeta"),
];

/// Copies values from retired names into the current ones.
///
/// Only applies when the template declares the current name and the payload
/// does not already carry it. The retired key is left in place. Returns the
/// number of values copied.
pub fn normalize(template: &Template, data: &mut FormData) -> usize {
    let mut copied = 0;
    for (legacy, current) in FIELD_ALIASES {
        if !template.contains(current) || data.contains_key(*current) {
            continue;
        }
        if let Some(value) = data.get(*legacy).cloned() {
            debug!(from = %legacy, to = %current, "normalised legacy field");
            data.insert(current.to_string(), value);
            copied += 1;
        }
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::FieldValue;
    use rust_decimal_macros::dec;

    fn tukash() -> Template {
        serde_json::from_str(
            r#"{"id": "tarjetas-tukash", "name": "Tukash", "version": "1", "sections": [
                {"id": "s", "title": "S", "fields": [
                    {"id": "monto_total_tukash", "kind": "currency", "label": "Monto"},
                    {"id": "beneficiario_tarjeta", "kind": "text", "label": "Beneficiario"}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_copies_into_unset_fields() {
        let mut data = FormData::new();
        data.insert("monto".into(), FieldValue::Number(dec!(500)));
        data.insert("beneficiario".into(), FieldValue::text("Ana López"));

        assert_eq!(normalize(&tukash(), &mut data), 2);
        assert_eq!(data["monto_total_tukash"], FieldValue::Number(dec!(500)));
        assert_eq!(data["beneficiario_tarjeta"], FieldValue::text("Ana López"));
        assert!(data.contains_key("monto"));
    }

    #[test]
    fn test_never_overwrites_current_values() {
        let mut data = FormData::new();
        data.insert("monto".into(), FieldValue::Number(dec!(500)));
        data.insert("monto_total_tukash".into(), FieldValue::Number(dec!(750)));

        assert_eq!(normalize(&tukash(), &mut data), 0);
        assert_eq!(data["monto_total_tukash"], FieldValue::Number(dec!(750)));
    }

    #[test]
    fn test_ignores_templates_without_current_field() {
        let other: Template = serde_json::from_str(
            r#"{"id": "x", "name": "X", "version": "1", "sections": []}"#,
        )
        .unwrap();
        let mut data = FormData::new();
        data.insert("monto".into(), FieldValue::text("10"));

        assert_eq!(normalize(&other, &mut data), 0);
        assert_eq!(data.len(), 1);
    }
}
