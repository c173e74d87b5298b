//! Static site catalog
//!
//! The catalog is reference data: a fixed list of waste-handling sites that
//! feeds both the map pins and the collector's site picker. It is loaded
//! once at startup and shared read-only.

use crate::geo::{GeoBounds, LatLng};
use crate::markers::{MapMarker, MarkerId};
use crate::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_SITES: &str = include_str!("../data/sites.json");

/// Site classification, drives the marker styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Formal,
    Informal,
    Processing,
    Plastic,
}

impl SiteKind {
    /// Marker fill colour
    pub fn colour(&self) -> &'static str {
        match self {
            SiteKind::Formal => "#006400",
            SiteKind::Informal => "#e74c3c",
            SiteKind::Processing => "#3498db",
            SiteKind::Plastic => "#f39c12",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SiteKind::Formal => "Formal receptacle",
            SiteKind::Informal => "Informal dumping",
            SiteKind::Processing => "Processing facility",
            SiteKind::Plastic => "Plastic collection",
        }
    }
}

/// A fixed physical waste-handling location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    pub id: MarkerId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: SiteKind,
    pub category: String,
    pub description: String,
    pub status: String,
    pub challenges: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl SiteLocation {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Marker for this site; site pins carry no collection aggregate
    pub fn marker(&self) -> MapMarker {
        MapMarker {
            id: self.id.clone(),
            lat: self.latitude,
            lng: self.longitude,
            site_name: self.name.clone(),
            waste_type: None,
            volume: Decimal::ZERO,
            date: None,
        }
    }
}

/// Immutable collection of sites
#[derive(Debug, Clone, PartialEq)]
pub struct SiteCatalog {
    sites: Vec<SiteLocation>,
}

impl SiteCatalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(BUILTIN_SITES)
    }

    /// Load from a JSON file, or fall back to the built-in catalog
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                tracing::info!("Loading site catalog from {}", path.display());
                Self::from_json(&json)
            }
            None => Self::builtin(),
        }
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        let sites: Vec<SiteLocation> = serde_json::from_str(json)?;
        Self::new(sites)
    }

    pub fn new(sites: Vec<SiteLocation>) -> CoreResult<Self> {
        if sites.is_empty() {
            return Err(CoreError::Catalog("catalog has no sites".to_string()));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for site in &sites {
            if !ids.insert(site.id.clone()) {
                return Err(CoreError::Catalog(format!("duplicate site id {}", site.id)));
            }
            if !names.insert(site.name.as_str()) {
                return Err(CoreError::Catalog(format!("duplicate site name {}", site.name)));
            }
            if !site.position().is_valid() {
                return Err(CoreError::Catalog(format!(
                    "site {} has invalid coordinates ({}, {})",
                    site.name, site.latitude, site.longitude
                )));
            }
        }

        Ok(Self { sites })
    }

    pub fn sites(&self) -> &[SiteLocation] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// First site, used as the collector form default
    pub fn first(&self) -> &SiteLocation {
        &self.sites[0]
    }

    pub fn get(&self, id: &MarkerId) -> Option<&SiteLocation> {
        self.sites.iter().find(|s| &s.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&SiteLocation> {
        self.sites.iter().find(|s| s.name == name)
    }

    pub fn markers(&self) -> Vec<MapMarker> {
        self.sites.iter().map(SiteLocation::marker).collect()
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.sites.iter().map(SiteLocation::position))
    }
}
