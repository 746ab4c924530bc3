use crate::error::{FormError, Result};
use serde::Deserialize;
use std::io::Read;

/// One renderer edit: raw text typed into a field.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct FieldEdit {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Reads field edits from a `field,value` CSV source.
///
/// Wraps `csv::Reader` and yields edits lazily, in file order, so a recorded
/// session can be replayed into a `FormEngine`. Whitespace around cells is
/// trimmed and a missing value cell reads as an empty string.
pub struct EditReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EditReader<R> {
    /// Creates a new `EditReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn edits(self) -> impl Iterator<Item = Result<FieldEdit>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(FormError::from))
    }
}
