//! Engine construction shared by all subcommands.

use crate::error::{CliError, CliResult};
use mc_activity::{ActivityCoefficientEngine, ActivityOptions, ReferenceTable};
use mc_elements::ElementTable;
use mc_miedema::{GeoModel, GeometricExtrapolationModel, ModelOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything needed to build an activity engine.
#[derive(Debug, Clone, Default)]
pub struct ModelSetup {
    pub geo: GeoModel,
    pub model: ModelOptions,
    pub activity: ActivityOptions,
    /// YAML file merged over the built-in element table
    pub elements: Option<PathBuf>,
    /// YAML file of literature interaction coefficients
    pub references: Option<PathBuf>,
}

impl ModelSetup {
    pub fn engine(&self) -> CliResult<ActivityCoefficientEngine> {
        let mut table = ElementTable::with_builtin();
        if let Some(path) = &self.elements {
            let merged = table.merge_yaml_file(path)?;
            tracing::info!(path = %path.display(), merged, "element overrides loaded");
        }
        let model = GeometricExtrapolationModel::new(self.model, self.geo);
        let mut engine = ActivityCoefficientEngine::new(Arc::new(table), model).with_options(self.activity);
        if let Some(path) = &self.references {
            let refs = ReferenceTable::from_yaml_file(path)?;
            tracing::info!(path = %path.display(), entries = refs.len(), "reference table loaded");
            engine = engine.with_references(refs);
        }
        Ok(engine)
    }
}

/// `path` relative to `base` unless absolute.
pub fn resolve(base: Option<&Path>, path: &Path) -> PathBuf {
    match base {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

pub fn read_text(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
