use crate::domain::catalog::TemplateCatalog;
use crate::domain::template::Template;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Templates shipped with the crate, in the order requesters see them.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "pago-comisiones",
        include_str!("../../templates/pago-comisiones.json"),
    ),
    ("pago-polizas", include_str!("../../templates/pago-polizas.json")),
    (
        "transferencia-bancaria",
        include_str!("../../templates/transferencia-bancaria.json"),
    ),
    (
        "tarjetas-tukash",
        include_str!("../../templates/tarjetas-tukash.json"),
    ),
    (
        "servicios-internos",
        include_str!("../../templates/servicios-internos.json"),
    ),
];

/// Parses the embedded templates.
pub fn builtin_catalog() -> Result<TemplateCatalog> {
    let mut templates = Vec::with_capacity(BUILTIN_TEMPLATES.len());
    for (name, json) in BUILTIN_TEMPLATES {
        debug!(template = %name, "loading built-in template");
        templates.push(parse(json)?);
    }
    Ok(TemplateCatalog::new(templates))
}

/// Loads every `*.json` file in `dir` as a template, sorted by file name.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<TemplateCatalog> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        debug!(path = %path.display(), "loading template");
        templates.push(parse(&fs::read_to_string(&path)?)?);
    }
    Ok(TemplateCatalog::new(templates))
}

/// Parses one template and logs its lint findings. Findings never fail the load.
pub fn parse(json: &str) -> Result<Template> {
    let template: Template = serde_json::from_str(json)?;
    for issue in template.lint() {
        warn!(template = %template.id, "{}", issue);
    }
    Ok(template)
}
