//! Pathway source databases and graph-file discovery

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ForteError, Result};

/// File extension of serialized pathway graphs
pub const GRAPH_EXTENSION: &str = "json";

/// The three supported pathway databases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathwaySource {
    Kegg,
    Reactome,
    WikiPathways,
}

impl fmt::Display for PathwaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathwaySource::Kegg => "kegg",
            PathwaySource::Reactome => "reactome",
            PathwaySource::WikiPathways => "wikipathways",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PathwaySource {
    type Err = ForteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "kegg" => Ok(PathwaySource::Kegg),
            "reactome" => Ok(PathwaySource::Reactome),
            "wikipathways" | "wp" => Ok(PathwaySource::WikiPathways),
            other => Err(ForteError::InvalidMapping {
                reason: format!("unknown pathway resource: {}", other),
            }),
        }
    }
}

/// A `(resource, pathway id)` pair, the key of all merge bookkeeping
pub type PathwayKey = (PathwaySource, String);

/// A pathway graph file found under one of the source directories
#[derive(Debug, Clone)]
pub struct DiscoveredPathway {
    pub source: PathwaySource,
    pub pathway_id: String,
    pub path: PathBuf,
}

/// Enumerate all pathway graph files across the three source directories.
/// Directory membership determines the source tag. Entries within each
/// directory are visited in name order.
pub fn discover_pathways(
    kegg_dir: &Path,
    reactome_dir: &Path,
    wikipathways_dir: &Path,
) -> Result<Vec<DiscoveredPathway>> {
    let mut discovered = Vec::new();
    discover_dir(kegg_dir, PathwaySource::Kegg, &mut discovered)?;
    discover_dir(reactome_dir, PathwaySource::Reactome, &mut discovered)?;
    discover_dir(wikipathways_dir, PathwaySource::WikiPathways, &mut discovered)?;
    Ok(discovered)
}

fn discover_dir(
    dir: &Path,
    source: PathwaySource,
    discovered: &mut Vec<DiscoveredPathway>,
) -> Result<()> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some(GRAPH_EXTENSION) {
            log::warn!("Unknown file in {} directory: {}", source, path.display());
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            log::warn!("Unreadable file name in {} directory: {}", source, path.display());
            continue;
        };
        discovered.push(DiscoveredPathway {
            source,
            pathway_id: pathway_id_from_stem(stem, source),
            path,
        });
    }
    Ok(())
}

/// Derive the pathway identifier from a file stem. KEGG exports may carry
/// an `_unflatten` suffix which is not part of the identifier.
fn pathway_id_from_stem(stem: &str, source: PathwaySource) -> String {
    match source {
        PathwaySource::Kegg => stem.strip_suffix("_unflatten").unwrap_or(stem).to_string(),
        _ => stem.to_string(),
    }
}
