//! Manifest generator: scanned records written out as JSON.

use crate::scanner::{ScannedRecord, scan_directory};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Builder for configuring and running the manifest generator.
pub struct ManifestGenerator {
    scan_paths: Vec<PathBuf>,
    output_file: PathBuf,
    crate_name: String,
    required_tags: Vec<String>,
    skip_untagged: bool,
}

impl Default for ManifestGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            scan_paths: Vec::new(),
            output_file: PathBuf::from("fieldtags.json"),
            crate_name: "crate".to_string(),
            required_tags: Vec::new(),
            skip_untagged: false,
        }
    }

    /// Add a path to scan for struct definitions.
    ///
    /// Can be called multiple times to scan multiple directories.
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    /// Set the output file path for the manifest.
    ///
    /// Default: `fieldtags.json`
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    /// Set the crate name used as the root of module paths.
    ///
    /// Default: `crate`
    pub fn crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = name.into();
        self
    }

    /// Keep only fields carrying at least one of these tag keys.
    pub fn require_tags<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.required_tags.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Drop fields without any tag.
    pub fn skip_untagged(mut self, skip: bool) -> Self {
        self.skip_untagged = skip;
        self
    }

    /// Scan all configured paths and apply the field filters.
    ///
    /// Records are deduplicated by module path and name and sorted for
    /// deterministic output.
    pub fn collect(&self) -> Result<Vec<ScannedRecord>> {
        // Default to scanning "src/" if no paths specified
        let default_paths = [PathBuf::from("src/")];
        let scan_paths = if self.scan_paths.is_empty() {
            &default_paths[..]
        } else {
            &self.scan_paths[..]
        };

        let mut records = Vec::new();
        for path in scan_paths {
            let found =
                scan_directory(path, &self.crate_name).with_context(|| format!("Failed to scan {}", path.display()))?;
            records.extend(found);
        }

        let mut seen = HashSet::new();
        records.retain(|r| seen.insert((r.module_path.clone(), r.name.clone())));
        records.sort_by(|a, b| (&a.module_path, &a.name).cmp(&(&b.module_path, &b.name)));

        for record in &mut records {
            if !self.required_tags.is_empty() {
                record.fields = record.fields.by_any_tag(&self.required_tags);
            }
            if self.skip_untagged {
                record.fields = record.fields.remove_untagged();
            }
        }

        Ok(records)
    }

    /// Run the generator.
    ///
    /// Writes the manifest only when its content changed, so build scripts
    /// do not trigger needless rebuilds.
    pub fn run(self) -> Result<()> {
        let records = self.collect()?;
        let manifest = serde_json::to_string_pretty(&records).context("Failed to serialize manifest")?;

        if let Some(parent) = self.output_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let should_write = match fs::read_to_string(&self.output_file) {
            Ok(existing) => existing != manifest,
            Err(_) => true,
        };

        if should_write {
            fs::write(&self.output_file, &manifest)
                .with_context(|| format!("Failed to write {}", self.output_file.display()))?;
            log::info!("wrote {} with {} records", self.output_file.display(), records.len());
        } else {
            log::debug!("{} is up to date", self.output_file.display());
        }

        Ok(())
    }
}
