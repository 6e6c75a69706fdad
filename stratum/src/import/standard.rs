//! The filesystem-backed location resolver.
//!
//! Handles three location forms:
//!
//! - `file:path` and bare `path`: relative paths resolve against the
//!   directory of the importing resource, or the configured base directory
//!   for imports declared by initial sources;
//! - `classpath:path`: searched in each configured resource root, first hit
//!   wins;
//! - any of the above ending in `/`: a directory whose `application.*`
//!   files are imported.
//!
//! The profile-specific variant of `dir/name.ext` for profile `p` is
//! `dir/name-p.ext`; variants are only returned when they exist, whether
//! or not the base file does.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::import::{LocationResolver, ResolverContext};
use crate::location::{ImportLocation, ResolvedLocation};
use crate::path::normalize::{absolutize, expand_tilde};
use crate::profiles::ProfileSet;

const FILE_PREFIX: &str = "file:";
const CLASSPATH_PREFIX: &str = "classpath:";
const DIRECTORY_BASENAME: &str = "application";
/// Directory file extensions in ascending precedence.
const EXTENSIONS: [&str; 4] = ["yml", "yaml", "props", "properties"];

/// Resolves `file:`, `classpath:` and bare filesystem locations.
#[derive(Debug, Clone)]
pub struct StandardLocationResolver {
    base_dir: PathBuf,
    resource_roots: Vec<PathBuf>,
}

impl StandardLocationResolver {
    /// A resolver rooted at `base_dir` searching `resource_roots` for
    /// `classpath:` locations.
    #[must_use]
    pub fn new(base_dir: PathBuf, resource_roots: Vec<PathBuf>) -> Self {
        Self {
            base_dir,
            resource_roots,
        }
    }

    /// Candidate base paths for a location, before existence checks.
    fn candidates(
        &self,
        context: &ResolverContext,
        location: &ImportLocation,
    ) -> Result<Vec<PathBuf>> {
        if let Some(relative) = location.strip_prefix(CLASSPATH_PREFIX) {
            let relative = relative.trim_start_matches('/');
            return self
                .resource_roots
                .iter()
                .map(|root| absolutize(&root.join(relative), &self.base_dir))
                .collect();
        }

        let raw = location.strip_prefix(FILE_PREFIX).unwrap_or(location.value());
        let path = expand_tilde(Path::new(raw))?;
        let base = context
            .parent()
            .and_then(ResolvedLocation::file_path)
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.base_dir.clone());
        Ok(vec![absolutize(&path, &base)?])
    }

    fn not_found(location: &ImportLocation, reason: impl Into<String>) -> Error {
        Error::LocationNotFound {
            location: location.to_string(),
            reason: Some(reason.into()),
        }
    }
}

fn is_directory_location(location: &ImportLocation) -> bool {
    location.value().ends_with('/')
}

fn has_scheme(value: &str) -> bool {
    value.split_once(':').is_some_and(|(scheme, _)| {
        scheme.len() > 1 && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

fn resource_id(path: &Path) -> String {
    format!("{FILE_PREFIX}{}", path.display())
}

fn directory_files(dir: &Path) -> Vec<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{DIRECTORY_BASENAME}.{ext}")))
        .filter(|p| p.is_file())
        .collect()
}

/// `dir/name.ext` -> `dir/name-{profile}.ext`.
fn profile_variant(path: &Path, profile: &str) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{profile}.{ext}"),
        None => format!("{stem}-{profile}"),
    };
    Some(path.with_file_name(name))
}

impl LocationResolver for StandardLocationResolver {
    fn is_resolvable(&self, _context: &ResolverContext, location: &ImportLocation) -> bool {
        location.has_prefix(FILE_PREFIX)
            || location.has_prefix(CLASSPATH_PREFIX)
            || !has_scheme(location.value())
    }

    fn resolve(
        &self,
        context: &ResolverContext,
        location: &ImportLocation,
    ) -> Result<Vec<ResolvedLocation>> {
        let candidates = self.candidates(context, location)?;

        if is_directory_location(location) {
            let dir = candidates
                .into_iter()
                .find(|p| p.is_dir())
                .ok_or_else(|| Self::not_found(location, "directory does not exist"))?;
            return Ok(directory_files(&dir)
                .iter()
                .map(|p| ResolvedLocation::new(location.clone(), resource_id(p)))
                .collect());
        }

        let file = candidates
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| Self::not_found(location, "no such file"))?;
        Ok(vec![ResolvedLocation::new(location.clone(), resource_id(&file))])
    }

    fn resolve_profile_specific(
        &self,
        context: &ResolverContext,
        location: &ImportLocation,
        profiles: &ProfileSet,
    ) -> Result<Vec<ResolvedLocation>> {
        let candidates = self.candidates(context, location)?;
        let bases: Vec<PathBuf> = if is_directory_location(location) {
            match candidates.into_iter().find(|p| p.is_dir()) {
                Some(dir) => EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{DIRECTORY_BASENAME}.{ext}")))
                    .collect(),
                None => return Ok(Vec::new()),
            }
        } else {
            // A missing base file still has variants; search every candidate.
            match candidates.iter().find(|p| p.is_file()).cloned() {
                Some(file) => vec![file],
                None => candidates,
            }
        };

        let mut resolved = Vec::new();
        for profile in profiles.iter() {
            if is_directory_location(location) {
                for base in &bases {
                    if let Some(variant) = profile_variant(base, profile).filter(|p| p.is_file()) {
                        resolved.push(ResolvedLocation::profile_specific(
                            location.clone(),
                            resource_id(&variant),
                            profile,
                        ));
                    }
                }
            } else if let Some(variant) = bases
                .iter()
                .filter_map(|base| profile_variant(base, profile))
                .find(|p| p.is_file())
            {
                resolved.push(ResolvedLocation::profile_specific(
                    location.clone(),
                    resource_id(&variant),
                    profile,
                ));
            }
        }
        Ok(resolved)
    }
}
