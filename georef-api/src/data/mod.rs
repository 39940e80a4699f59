//! In-memory geographic reference data
//!
//! Regions and communes are loaded once at startup into two indices and are
//! never mutated afterwards. Handlers share them through an `Arc<GeoData>`,
//! so no locking is involved.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod loader;
pub mod resolver;

pub use loader::{load, load_communes, load_regions, split_aliases};
pub use resolver::{is_numeric, resolve_region_id};

/// One administrative region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Kept as the source string so "01" and "1" stay distinct
    pub id: String,
    pub name: String,
    /// Normalized (trimmed, lower-cased) lookup keys, source order
    pub alias: Vec<String>,
    pub capital: String,
    pub climate: String,
    pub coordinates: String,
}

impl Region {
    pub fn has_alias(&self, alias: &str) -> bool {
        self.alias.iter().any(|a| a == alias)
    }
}

/// One commune, grouped under its region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commune {
    pub region_id: String,
    #[serde(default)]
    pub commune_id: String,
    #[serde(default)]
    pub commune_name: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub coordinates: String,
}

/// Regions keyed by id, iterated in load order
///
/// A duplicate id replaces the earlier record but keeps its position.
/// The alias map is derived after all regions are in place; on a shared alias
/// the region loaded first wins.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    regions: Vec<Region>,
    positions: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl RegionIndex {
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.positions.get(id).map(|&pos| &self.regions[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Region id owning a normalized alias
    pub fn id_for_alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn insert(&mut self, region: Region) {
        match self.positions.get(&region.id) {
            Some(&pos) => self.regions[pos] = region,
            None => {
                self.positions.insert(region.id.clone(), self.regions.len());
                self.regions.push(region);
            }
        }
    }

    fn rebuild_aliases(&mut self) {
        self.aliases.clear();
        for region in &self.regions {
            for alias in &region.alias {
                self.aliases
                    .entry(alias.clone())
                    .or_insert_with(|| region.id.clone());
            }
        }
    }
}

impl FromIterator<Region> for RegionIndex {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut index = RegionIndex::default();
        for region in iter {
            index.insert(region);
        }
        index.rebuild_aliases();
        index
    }
}

/// Communes grouped by `region_id`, each group in source row order
///
/// Groups are created on first append, so a present key is never empty.
/// Communes whose region is unknown are kept and stay queryable.
#[derive(Debug, Clone, Default)]
pub struct CommuneIndex {
    by_region: HashMap<String, Vec<Commune>>,
}

impl CommuneIndex {
    pub fn push(&mut self, commune: Commune) {
        self.by_region
            .entry(commune.region_id.clone())
            .or_default()
            .push(commune);
    }

    pub fn get(&self, region_id: &str) -> Option<&[Commune]> {
        self.by_region.get(region_id).map(Vec::as_slice)
    }

    /// Number of distinct region keys
    pub fn region_count(&self) -> usize {
        self.by_region.len()
    }

    /// Total communes across all groups
    pub fn commune_count(&self) -> usize {
        self.by_region.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.by_region.keys().map(String::as_str)
    }
}

impl FromIterator<Commune> for CommuneIndex {
    fn from_iter<I: IntoIterator<Item = Commune>>(iter: I) -> Self {
        let mut index = CommuneIndex::default();
        for commune in iter {
            index.push(commune);
        }
        index
    }
}

/// Both indices, built together and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct GeoData {
    pub regions: RegionIndex,
    pub communes: CommuneIndex,
}

impl GeoData {
    pub fn new(regions: RegionIndex, communes: CommuneIndex) -> Self {
        Self { regions, communes }
    }

    /// Empty indices, served when a failed load is tolerated
    pub fn empty() -> Self {
        Self::default()
    }

    /// All regions in load order
    pub fn all_regions(&self) -> &[Region] {
        self.regions.as_slice()
    }

    /// Region denoted by a numeric id or alias
    pub fn region_by_identifier(&self, identifier: &str) -> Option<&Region> {
        let id = resolve_region_id(&self.regions, identifier)?;
        self.regions.get(&id)
    }

    /// Communes of the region denoted by a numeric id or alias
    pub fn communes_by_identifier(&self, identifier: &str) -> Option<&[Commune]> {
        let id = resolve_region_id(&self.regions, identifier)?;
        self.communes.get(&id)
    }

    /// Communes whose `region_id` has no matching region
    pub fn orphaned_region_ids(&self) -> Vec<&str> {
        let mut orphans: Vec<&str> = self
            .communes
            .region_ids()
            .filter(|id| !self.regions.contains(id))
            .collect();
        orphans.sort_unstable();
        orphans
    }
}
