//! Coordinates and bounding boxes

use serde::{Deserialize, Serialize};

/// A point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest box containing every point, `None` for no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = GeoBounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    /// Grow each side by `ratio` of the span, with a floor so single-point
    /// boxes still have an area
    pub fn padded(&self, ratio: f64) -> Self {
        let lat_pad = ((self.north - self.south) * ratio).max(0.001);
        let lng_pad = ((self.east - self.west) * ratio).max(0.001);
        GeoBounds {
            south: self.south - lat_pad,
            west: self.west - lng_pad,
            north: self.north + lat_pad,
            east: self.east + lng_pad,
        }
    }

    pub fn contains(&self, point: LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }

    /// Project a point into the unit square, x growing east and y growing south
    pub fn project(&self, point: LatLng) -> (f64, f64) {
        let width = (self.east - self.west).max(f64::EPSILON);
        let height = (self.north - self.south).max(f64::EPSILON);
        ((point.lng - self.west) / width, (self.north - point.lat) / height)
    }
}
