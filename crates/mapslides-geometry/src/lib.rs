//! Geographic primitives for mapslides.
//!
//! The map widget owns projection and rendering. This crate only carries the
//! coordinate types that pass through the core untouched, plus the
//! [`DistanceMeasure`] boundary the core uses to cache real-world metrics.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters (IUGG)
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A geographic point. Serialized as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for (f64, f64) {
    fn from(p: LatLng) -> Self {
        (p.lat, p.lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Two opposite corners of a rectangle, in the order they were drawn.
/// Serialized as `[[lat, lng], [lat, lng]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(LatLng, LatLng)", into = "(LatLng, LatLng)")]
pub struct LatLngBounds {
    pub origin: LatLng,
    pub corner: LatLng,
}

impl LatLngBounds {
    pub fn new(origin: LatLng, corner: LatLng) -> Self {
        Self { origin, corner }
    }

    /// The corner sharing the origin's latitude
    pub fn same_lat_corner(&self) -> LatLng {
        LatLng::new(self.origin.lat, self.corner.lng)
    }

    /// The corner sharing the origin's longitude
    pub fn same_lng_corner(&self) -> LatLng {
        LatLng::new(self.corner.lat, self.origin.lng)
    }
}

impl From<(LatLng, LatLng)> for LatLngBounds {
    fn from((origin, corner): (LatLng, LatLng)) -> Self {
        Self { origin, corner }
    }
}

impl From<LatLngBounds> for (LatLng, LatLng) {
    fn from(b: LatLngBounds) -> Self {
        (b.origin, b.corner)
    }
}

/// Map camera: center point and zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: LatLng::new(21.03, 105.804),
            zoom: 16.0,
        }
    }
}

/// Distance between two points in meters, as computed by the map collaborator.
pub trait DistanceMeasure {
    fn distance(&self, a: LatLng, b: LatLng) -> f64;
}

impl<F> DistanceMeasure for F
where
    F: Fn(LatLng, LatLng) -> f64,
{
    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        self(a, b)
    }
}

/// Great-circle distance on a spherical earth
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMeasure for Haversine {
    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (b.lng - a.lng).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
    }
}

/// Area of a lat/lng-aligned rectangle: width along the origin's parallel
/// times height along the origin's meridian.
pub fn rectangle_area(bounds: &LatLngBounds, measure: &impl DistanceMeasure) -> f64 {
    measure.distance(bounds.origin, bounds.same_lat_corner())
        * measure.distance(bounds.origin, bounds.same_lng_corner())
}

/// Area of a circle with the given radius in meters
pub fn circle_area(radius: f64) -> f64 {
    PI * radius * radius
}
