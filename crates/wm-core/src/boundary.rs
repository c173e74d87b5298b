//! Administrative boundary overlay
//!
//! A GeoJSON outline drawn under the site markers. It is decoration only:
//! when it cannot be fetched or parsed the map renders without it.

use crate::geo::{GeoBounds, LatLng};
use crate::{CoreError, CoreResult};
use serde_json::Value;

/// Outline rings in `LatLng` order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundary {
    pub rings: Vec<Vec<LatLng>>,
}

impl Boundary {
    /// Accepts a FeatureCollection, a Feature, or a bare Polygon or
    /// MultiPolygon geometry. GeoJSON positions are `[lon, lat]`.
    pub fn from_geojson(json: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let mut boundary = Boundary::default();
        collect(&value, &mut boundary.rings)?;

        if boundary.rings.is_empty() {
            return Err(CoreError::Parse("GeoJSON contains no polygon rings".to_string()));
        }
        Ok(boundary)
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.rings.iter().flatten().copied())
    }
}

fn collect(value: &Value, rings: &mut Vec<Vec<LatLng>>) -> CoreResult<()> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            for feature in value
                .get("features")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect(feature, rings)?;
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                collect(geometry, rings)?;
            }
        }
        Some("Polygon") => {
            let coordinates = coordinates(value)?;
            push_polygon(coordinates, rings)?;
        }
        Some("MultiPolygon") => {
            let polygons = coordinates(value)?.as_array().ok_or_else(|| {
                CoreError::Parse("MultiPolygon coordinates are not an array".to_string())
            })?;
            for polygon in polygons {
                push_polygon(polygon, rings)?;
            }
        }
        // Points and lines add nothing to an outline
        Some(_) => {}
        None => return Err(CoreError::Parse("GeoJSON object without a type".to_string())),
    }
    Ok(())
}

fn coordinates(value: &Value) -> CoreResult<&Value> {
    value
        .get("coordinates")
        .ok_or_else(|| CoreError::Parse("geometry without coordinates".to_string()))
}

fn push_polygon(polygon: &Value, rings: &mut Vec<Vec<LatLng>>) -> CoreResult<()> {
    let polygon = polygon
        .as_array()
        .ok_or_else(|| CoreError::Parse("polygon is not an array of rings".to_string()))?;

    for ring in polygon {
        let ring = ring
            .as_array()
            .ok_or_else(|| CoreError::Parse("ring is not an array of positions".to_string()))?;

        let mut points = Vec::with_capacity(ring.len());
        for position in ring {
            let lng = position.get(0).and_then(Value::as_f64);
            let lat = position.get(1).and_then(Value::as_f64);
            match (lat, lng) {
                (Some(lat), Some(lng)) => points.push(LatLng::new(lat, lng)),
                _ => return Err(CoreError::Parse(format!("bad position {position}"))),
            }
        }
        rings.push(points);
    }
    Ok(())
}

/// Fetch and parse the outline once. Failures are logged and yield `None`.
#[cfg(feature = "http")]
pub async fn fetch(client: &reqwest::Client, url: &str) -> Option<Boundary> {
    let response = match client.get(url).send().await.and_then(|r| r.error_for_status()) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to fetch boundary from {}: {}", url, e);
            return None;
        }
    };

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to read boundary body from {}: {}", url, e);
            return None;
        }
    };

    match Boundary::from_geojson(&body) {
        Ok(boundary) => {
            tracing::debug!("Loaded boundary with {} rings", boundary.rings.len());
            Some(boundary)
        }
        Err(e) => {
            tracing::warn!("Ignoring unusable boundary from {}: {}", url, e);
            None
        }
    }
}
