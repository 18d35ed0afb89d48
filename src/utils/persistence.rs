use std::{fs, path::Path};

use crate::{errors::FormError, schema::FormDefinition, wizard::TableSnapshot};

/// Loads a step catalog from a JSON file. The catalog is checked with the
/// same rules as [`FormDefinition::new`].
pub fn load_definition_from_file(path: &Path) -> Result<FormDefinition, FormError> {
    let data = fs::read_to_string(path)?;
    let definition: FormDefinition = serde_json::from_str(&data)?;
    tracing::info!(path = %path.display(), steps = definition.len(), "form definition loaded");
    Ok(definition)
}

/// Writes a step catalog to disk by staging to a temporary file.
pub fn save_definition_to_file(definition: &FormDefinition, path: &Path) -> Result<(), FormError> {
    write_json_atomic(path, &serde_json::to_string_pretty(definition)?)
}

/// Writes a table snapshot to disk as pretty JSON.
pub fn export_table_to_file(snapshot: &TableSnapshot, path: &Path) -> Result<(), FormError> {
    write_json_atomic(path, &serde_json::to_string_pretty(snapshot)?)
}

fn write_json_atomic(path: &Path, json: &str) -> Result<(), FormError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}
