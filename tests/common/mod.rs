use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Writes a `field,value` edit log with `rows` edits that toggles the card
/// top-up form between its CLABE and card branches.
pub fn generate_edits_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["field", "value"])?;

    for i in 0..rows {
        let (field, value) = match i % 4 {
            0 => ("tipo_cuenta_destino", "CLABE".to_string()),
            1 => ("clabe_destino", format!("{:018}", i)),
            2 => ("tipo_cuenta_destino", "Tarjeta".to_string()),
            _ => ("monto_total_tukash", format!("{}.50", i)),
        };
        wtr.write_record([field, value.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a completed card top-up edit log followed by `padding` repeated
/// edits of the concept field, so the file reaches a useful size.
pub fn generate_large_edits_csv(path: &Path, padding: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["field", "value"])?;

    for (field, value) in [
        ("tipo_cuenta_destino", "Tarjeta"),
        ("tipo_tarjeta", "Credito"),
        ("numero_tarjeta", "5200123412341234"),
        ("banco_destino", "Santander"),
        ("beneficiario_tarjeta", "Proveedora del Norte"),
        ("monto_total_tukash", "98000"),
        ("comprobante", "lote.pdf"),
    ] {
        wtr.write_record([field, value])?;
    }
    for i in 0..padding {
        wtr.write_record(["concepto", &format!("Recarga {i}")])?;
    }

    wtr.flush()?;
    Ok(())
}
