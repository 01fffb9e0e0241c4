use {
    crate::forecast::TrainedModel,
    anyhow::{Context, Result, bail},
    std::{
        fs::{self, File},
        io::{BufReader, BufWriter, Write},
        path::{Path, PathBuf},
    },
};

/// Sibling temp file that is renamed over the artifact once fully written.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

pub(crate) fn save_model(path: &Path, model: &TrainedModel) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create model directory {}", parent.display()))?;
    }

    let staging = staging_path(path);
    let file = File::create(&staging)
        .with_context(|| format!("Failed to create {}", staging.display()))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, model)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&staging, path)
        .with_context(|| format!("Failed to move model into place at {}", path.display()))?;
    Ok(())
}

/// `Ok(None)` when no model has been trained yet.
pub(crate) fn load_model(path: &Path) -> Result<Option<TrainedModel>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let model: TrainedModel = bincode::deserialize_from(reader)
        .with_context(|| format!("Model file {} is corrupt", path.display()))?;

    if model.format_version != TrainedModel::FORMAT_VERSION {
        bail!(
            "Model file {} has format v{}, expected v{}; retrain the model",
            path.display(),
            model.format_version,
            TrainedModel::FORMAT_VERSION
        );
    }
    Ok(Some(model))
}
