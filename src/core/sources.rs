//! Source selection
//!
//! Decides which of the available log sources are exported: the configured
//! inclusion list, optionally widened by every source under a prefix, matched
//! by exact identifier against the enumerated sources.

use crate::adapters::traits::{LogSource, LogSourceEnumerator};
use crate::config::SourcesConfig;
use crate::domain::ids::SourceId;
use crate::domain::{LogvaultError, Result};
use std::collections::HashSet;

/// Sources from `all` whose identifier is in `inclusion`, in enumeration order
pub fn list_eligible(all: &[LogSource], inclusion: &[SourceId]) -> Vec<LogSource> {
    let wanted: HashSet<&SourceId> = inclusion.iter().collect();
    let mut seen = HashSet::new();
    all.iter()
        .filter(|source| wanted.contains(&source.id) && seen.insert(source.id.clone()))
        .cloned()
        .collect()
}

/// Result of resolving the configured selection against the service
#[derive(Debug, Clone)]
pub struct SourceSelection {
    /// Every source the service reported
    pub available: Vec<LogSource>,

    /// Identifiers asked for (inclusion list plus prefix matches)
    pub requested: Vec<SourceId>,

    /// Sources that will be exported
    pub eligible: Vec<LogSource>,
}

impl SourceSelection {
    pub fn eligible_ids(&self) -> Vec<SourceId> {
        self.eligible.iter().map(|s| s.id.clone()).collect()
    }
}

/// Enumerate sources and pick the eligible ones
///
/// # Errors
///
/// - `SourceEnumeration` when listing fails
/// - `NoEligibleSources` when nothing matches, carrying the counts that led there
pub async fn select_sources(
    enumerator: &dyn LogSourceEnumerator,
    config: &SourcesConfig,
) -> Result<SourceSelection> {
    let mut requested = parse_inclusion(&config.include)?;

    if let Some(prefix) = config.prefix.as_deref().filter(|p| !p.is_empty()) {
        let matches = enumerator
            .list_with_prefix(prefix)
            .await
            .map_err(|e| LogvaultError::SourceEnumeration(e.to_string()))?;
        tracing::debug!(prefix = %prefix, matches = matches.len(), "Resolved source prefix");
        for source in matches {
            if !requested.contains(&source.id) {
                requested.push(source.id);
            }
        }
    }

    let available = enumerator
        .list_all()
        .await
        .map_err(|e| LogvaultError::SourceEnumeration(e.to_string()))?;

    let eligible = list_eligible(&available, &requested);

    tracing::info!(
        available = available.len(),
        requested = requested.len(),
        eligible = eligible.len(),
        "Selected log sources"
    );

    if eligible.is_empty() {
        return Err(LogvaultError::NoEligibleSources {
            message: "There are no log groups matching the filter".to_string(),
            available: available.len(),
            requested: requested.into_iter().map(SourceId::into_inner).collect(),
        });
    }

    Ok(SourceSelection {
        available,
        requested,
        eligible,
    })
}

fn parse_inclusion(include: &[String]) -> Result<Vec<SourceId>> {
    let mut ids: Vec<SourceId> = Vec::with_capacity(include.len());
    for raw in include {
        let id = SourceId::new(raw.as_str()).map_err(LogvaultError::Configuration)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}
