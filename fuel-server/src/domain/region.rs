//! Pricing region identifiers.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;

/// A fuel-pricing region (PADD sub-district).
///
/// Regions form a closed set. `Unresolved` is the sentinel used when a
/// coordinate could not be mapped to any region; it behaves like any other
/// region when segmenting a route.
///
/// # Examples
///
/// ```
/// use fuel_server::domain::RegionId;
///
/// let west = RegionId::parse("5").unwrap();
/// assert_eq!(west, RegionId::WestCoast);
/// assert_eq!(west.code(), "5");
///
/// assert!(RegionId::parse("unresolved").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RegionId {
    #[serde(rename = "1a")]
    NewEngland,
    #[serde(rename = "1b")]
    CentralAtlantic,
    #[serde(rename = "1c")]
    LowerAtlantic,
    #[serde(rename = "2")]
    Midwest,
    #[serde(rename = "3")]
    GulfCoast,
    #[serde(rename = "4")]
    RockyMountain,
    #[serde(rename = "5")]
    WestCoast,
    #[serde(rename = "unresolved")]
    Unresolved,
}

impl RegionId {
    /// Every priceable region, in code order.
    pub const PRICED: [RegionId; 7] = [
        RegionId::NewEngland,
        RegionId::CentralAtlantic,
        RegionId::LowerAtlantic,
        RegionId::Midwest,
        RegionId::GulfCoast,
        RegionId::RockyMountain,
        RegionId::WestCoast,
    ];

    /// Parse a priceable region code (`"1a"`, `"2"`, ...).
    ///
    /// The sentinel is never produced by parsing.
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        Self::PRICED
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| DomainError::UnknownRegionCode(code.to_string()))
    }

    /// Short region code.
    pub fn code(&self) -> &'static str {
        match self {
            RegionId::NewEngland => "1a",
            RegionId::CentralAtlantic => "1b",
            RegionId::LowerAtlantic => "1c",
            RegionId::Midwest => "2",
            RegionId::GulfCoast => "3",
            RegionId::RockyMountain => "4",
            RegionId::WestCoast => "5",
            RegionId::Unresolved => "unresolved",
        }
    }

    /// Human-readable region name.
    pub fn name(&self) -> &'static str {
        match self {
            RegionId::NewEngland => "New England",
            RegionId::CentralAtlantic => "Central Atlantic",
            RegionId::LowerAtlantic => "Lower Atlantic",
            RegionId::Midwest => "Midwest",
            RegionId::GulfCoast => "Gulf Coast",
            RegionId::RockyMountain => "Rocky Mountain",
            RegionId::WestCoast => "West Coast",
            RegionId::Unresolved => "Unresolved",
        }
    }

    pub fn is_resolved(&self) -> bool {
        *self != RegionId::Unresolved
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
