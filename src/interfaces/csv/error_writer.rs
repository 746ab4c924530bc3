use crate::error::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// Writes field validation errors as `field,error` CSV rows.
pub struct ErrorWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ErrorWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes the header and one row per error, in field id order.
    pub fn write_errors(&mut self, errors: &BTreeMap<String, String>) -> Result<()> {
        self.writer.write_record(["field", "error"])?;
        for (field, error) in errors {
            self.writer.write_record([field, error])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
