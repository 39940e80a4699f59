//! CSV loading for regions and communes
//!
//! Sources carry a header row:
//! - regions: `id,name,alias,capital,climate,coordinates`
//! - communes: `region_id,commune_id,commune_name,postal_code,coordinates`
//!
//! Columns other than the keys may be absent, either from the header or from
//! the tail of a short row; they load as empty strings.

use georef_common::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{Commune, CommuneIndex, GeoData, Region, RegionIndex};

/// Raw regions row before alias normalization
#[derive(Debug, Deserialize)]
struct RegionRow {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    alias: String,
    #[serde(default)]
    capital: String,
    #[serde(default)]
    climate: String,
    #[serde(default)]
    coordinates: String,
}

impl From<RegionRow> for Region {
    fn from(row: RegionRow) -> Self {
        Region {
            alias: split_aliases(&row.alias),
            id: row.id,
            name: row.name,
            capital: row.capital,
            climate: row.climate,
            coordinates: row.coordinates,
        }
    }
}

/// Normalize a raw alias field: split on ',', trim, lower-case, drop empties
pub fn split_aliases(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|piece| piece.trim().to_lowercase())
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

/// Parse a regions source
pub fn read_regions<R: Read>(reader: R) -> Result<RegionIndex> {
    csv_reader(reader)
        .deserialize::<RegionRow>()
        .map(|row| row.map(Region::from).map_err(Error::from))
        .collect()
}

/// Parse a communes source
pub fn read_communes<R: Read>(reader: R) -> Result<CommuneIndex> {
    csv_reader(reader)
        .deserialize::<Commune>()
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Load the regions file into a [`RegionIndex`]
pub fn load_regions(path: &Path) -> Result<RegionIndex> {
    let index = File::open(path)
        .map_err(Error::from)
        .and_then(read_regions)
        .map_err(|e| {
            error!("Failed to load regions from {}: {}", path.display(), e);
            e
        })?;

    info!("Loaded {} regions from {}", index.len(), path.display());
    Ok(index)
}

/// Load the communes file into a [`CommuneIndex`]
pub fn load_communes(path: &Path) -> Result<CommuneIndex> {
    let index = File::open(path)
        .map_err(Error::from)
        .and_then(read_communes)
        .map_err(|e| {
            error!("Failed to load communes from {}: {}", path.display(), e);
            e
        })?;

    info!(
        "Loaded {} communes in {} groups from {}",
        index.commune_count(),
        index.region_count(),
        path.display()
    );
    Ok(index)
}

/// Load both sources concurrently
///
/// Each file is parsed on its own blocking task; the load succeeds only when
/// both do. Whether a failure aborts startup is left to the caller.
pub async fn load(regions_path: &Path, communes_path: &Path) -> Result<GeoData> {
    let regions_path: PathBuf = regions_path.to_path_buf();
    let communes_path: PathBuf = communes_path.to_path_buf();

    let regions_task = tokio::task::spawn_blocking(move || load_regions(&regions_path));
    let communes_task = tokio::task::spawn_blocking(move || load_communes(&communes_path));

    let (regions, communes) = tokio::try_join!(join(regions_task), join(communes_task))?;

    let data = GeoData::new(regions, communes);
    let orphans = data.orphaned_region_ids();
    if !orphans.is_empty() {
        info!(
            "{} commune group(s) reference unknown regions: {:?}",
            orphans.len(),
            orphans
        );
    }

    Ok(data)
}

async fn join<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    handle
        .await
        .map_err(|e| Error::Internal(format!("Load task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REGIONS_CSV: &str = "\
id,name,alias,capital,climate,coordinates
1,Metropolitana de Santiago,\"rm, Metropolitana ,,\",Santiago,Mediterraneo,\"-33.45,-70.66\"
5,Valparaiso,,Valparaiso,Mediterraneo,\"-33.04,-71.62\"
";

    const COMMUNES_CSV: &str = "\
region_id,commune_id,commune_name,postal_code,coordinates
1,13101,Santiago,8320000,\"-33.45,-70.66\"
5,5101,Valparaiso,2340000,\"-33.04,-71.62\"
1,13114,Las Condes,7550000,\"-33.41,-70.58\"
";

    #[test]
    fn test_split_aliases_normalizes() {
        assert_eq!(
            split_aliases(" RM, Metropolitana ,, santiago "),
            vec!["rm", "metropolitana", "santiago"]
        );
        assert!(split_aliases("").is_empty());
        assert!(split_aliases(" , ,").is_empty());
    }

    #[test]
    fn test_read_regions() {
        let index = read_regions(REGIONS_CSV.as_bytes()).unwrap();

        assert_eq!(index.len(), 2);
        let rm = index.get("1").unwrap();
        assert_eq!(rm.name, "Metropolitana de Santiago");
        assert_eq!(rm.alias, vec!["rm", "metropolitana"]);
        assert_eq!(rm.coordinates, "-33.45,-70.66");
        assert!(index.get("5").unwrap().alias.is_empty());
    }

    #[test]
    fn test_read_regions_without_alias_column() {
        let csv = "id,name\n3,Atacama\n";
        let index = read_regions(csv.as_bytes()).unwrap();

        let region = index.get("3").unwrap();
        assert!(region.alias.is_empty());
        assert_eq!(region.capital, "");
    }

    #[test]
    fn test_read_regions_keeps_leading_zeros() {
        let csv = "id,name,alias\n01,Tarapaca,tpca\n1,Other,\n";
        let index = read_regions(csv.as_bytes()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("01").unwrap().name, "Tarapaca");
        assert_eq!(index.get("1").unwrap().name, "Other");
    }

    #[test]
    fn test_read_communes_groups_in_row_order() {
        let index = read_communes(COMMUNES_CSV.as_bytes()).unwrap();

        let names: Vec<&str> = index
            .get("1")
            .unwrap()
            .iter()
            .map(|c| c.commune_name.as_str())
            .collect();
        assert_eq!(names, vec!["Santiago", "Las Condes"]);
        assert_eq!(index.get("5").unwrap()[0].postal_code, "2340000");
    }

    #[test]
    fn test_short_region_row_loads_with_empty_fields() {
        let csv = "\
id,name,alias,capital,climate,coordinates
1,Tarapaca,\"tarapaca,i\",Iquique,D,\"-20,-70\"
7,Maule
";
        let index = read_regions(csv.as_bytes()).unwrap();

        assert_eq!(index.len(), 2);
        let maule = index.get("7").unwrap();
        assert_eq!(maule.name, "Maule");
        assert!(maule.alias.is_empty());
        assert_eq!(maule.capital, "");
        assert_eq!(maule.coordinates, "");
        assert_eq!(index.get("1").unwrap().alias, vec!["tarapaca", "i"]);
    }

    #[test]
    fn test_short_commune_row_loads_with_empty_fields() {
        let csv = "\
region_id,commune_id,commune_name,postal_code,coordinates
7,07101,Talca
7,07102,Constitucion,3560000,\"-35.33,-72.41\"
";
        let index = read_communes(csv.as_bytes()).unwrap();

        let group = index.get("7").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].commune_name, "Talca");
        assert_eq!(group[0].postal_code, "");
        assert_eq!(group[0].coordinates, "");
        assert_eq!(group[1].postal_code, "3560000");
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let result = read_regions(&b"id,name\n1,\xff\xfe\n"[..]);

        match result {
            Err(e @ Error::Csv(_)) => {
                assert!(e.to_string().starts_with("Malformed source: "));
                assert!(!e.to_string().contains("CSV error: CSV error"));
            }
            other => panic!("expected parse error, got {:?}", other.map(|i| i.len())),
        }
    }

    #[test]
    fn test_missing_key_column_is_parse_error() {
        let csv = "commune_id,commune_name\n13101,Santiago\n";
        let result = read_communes(csv.as_bytes());

        assert!(matches!(result, Err(Error::Csv(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_regions(&dir.path().join("missing.csv"));

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_load_both_sources() {
        let dir = tempfile::tempdir().unwrap();
        let regions_path = dir.path().join("regions.csv");
        let communes_path = dir.path().join("communes.csv");
        File::create(&regions_path)
            .unwrap()
            .write_all(REGIONS_CSV.as_bytes())
            .unwrap();
        File::create(&communes_path)
            .unwrap()
            .write_all(COMMUNES_CSV.as_bytes())
            .unwrap();

        let data = load(&regions_path, &communes_path).await.unwrap();

        assert_eq!(data.all_regions().len(), 2);
        assert_eq!(data.communes_by_identifier("RM").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_fails_if_either_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let regions_path = dir.path().join("regions.csv");
        std::fs::write(&regions_path, REGIONS_CSV).unwrap();

        let result = load(&regions_path, &dir.path().join("communes.csv")).await;

        assert!(matches!(result, Err(Error::Io(_))));
    }
}
