//! Administrative area → pricing region catalog.

use std::collections::HashMap;

use super::region::RegionId;

/// PADD sub-district membership for the 50 US states and DC.
const USA_STATES: &[(&str, RegionId)] = &[
    ("Connecticut", RegionId::NewEngland),
    ("Maine", RegionId::NewEngland),
    ("Massachusetts", RegionId::NewEngland),
    ("New Hampshire", RegionId::NewEngland),
    ("Rhode Island", RegionId::NewEngland),
    ("Vermont", RegionId::NewEngland),
    ("Delaware", RegionId::CentralAtlantic),
    ("District of Columbia", RegionId::CentralAtlantic),
    ("Maryland", RegionId::CentralAtlantic),
    ("New Jersey", RegionId::CentralAtlantic),
    ("New York", RegionId::CentralAtlantic),
    ("Pennsylvania", RegionId::CentralAtlantic),
    ("Florida", RegionId::LowerAtlantic),
    ("Georgia", RegionId::LowerAtlantic),
    ("North Carolina", RegionId::LowerAtlantic),
    ("South Carolina", RegionId::LowerAtlantic),
    ("Virginia", RegionId::LowerAtlantic),
    ("West Virginia", RegionId::LowerAtlantic),
    ("Illinois", RegionId::Midwest),
    ("Indiana", RegionId::Midwest),
    ("Iowa", RegionId::Midwest),
    ("Kansas", RegionId::Midwest),
    ("Kentucky", RegionId::Midwest),
    ("Michigan", RegionId::Midwest),
    ("Minnesota", RegionId::Midwest),
    ("Missouri", RegionId::Midwest),
    ("Nebraska", RegionId::Midwest),
    ("North Dakota", RegionId::Midwest),
    ("Ohio", RegionId::Midwest),
    ("Oklahoma", RegionId::Midwest),
    ("South Dakota", RegionId::Midwest),
    ("Tennessee", RegionId::Midwest),
    ("Wisconsin", RegionId::Midwest),
    ("Alabama", RegionId::GulfCoast),
    ("Arkansas", RegionId::GulfCoast),
    ("Louisiana", RegionId::GulfCoast),
    ("Mississippi", RegionId::GulfCoast),
    ("New Mexico", RegionId::GulfCoast),
    ("Texas", RegionId::GulfCoast),
    ("Colorado", RegionId::RockyMountain),
    ("Idaho", RegionId::RockyMountain),
    ("Montana", RegionId::RockyMountain),
    ("Utah", RegionId::RockyMountain),
    ("Wyoming", RegionId::RockyMountain),
    ("Alaska", RegionId::WestCoast),
    ("Arizona", RegionId::WestCoast),
    ("California", RegionId::WestCoast),
    ("Hawaii", RegionId::WestCoast),
    ("Nevada", RegionId::WestCoast),
    ("Oregon", RegionId::WestCoast),
    ("Washington", RegionId::WestCoast),
];

/// Read-only mapping from administrative area name to pricing region.
///
/// Built once at startup and shared by reference. Lookups are
/// case-insensitive and ignore surrounding whitespace.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    by_area: HashMap<String, RegionId>,
}

impl RegionCatalog {
    /// Build a catalog from (area name, region) pairs.
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, RegionId)>) -> Self {
        let by_area = entries
            .into_iter()
            .map(|(name, region)| (normalize(name), region))
            .collect();
        Self { by_area }
    }

    /// The US state catalog.
    pub fn usa() -> Self {
        Self::new(USA_STATES.iter().copied())
    }

    /// Look up an area name, returning `Unresolved` when it is not catalogued.
    pub fn lookup(&self, area: &str) -> RegionId {
        self.by_area
            .get(&normalize(area))
            .copied()
            .unwrap_or(RegionId::Unresolved)
    }

    pub fn len(&self) -> usize {
        self.by_area.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_area.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
