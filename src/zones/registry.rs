use tracing::{info, warn};

use super::{Zone, ZoneKind};
use crate::geometry::{Point, Rect, overlap_ratio};

/// Zones narrower or shorter than this are reported by [`ZoneRegistry::validate`].
pub const DEFAULT_MIN_ZONE_SIZE: f32 = 50.0;

/// Ordered set of zones with unique ids.
///
/// Insertion order is preserved: when several zones contain a point, the
/// first one added wins wherever a single zone is needed.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    min_zone_size: f32,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self {
            zones: Vec::new(),
            min_zone_size: DEFAULT_MIN_ZONE_SIZE,
        }
    }

    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> Self {
        let mut registry = Self::new();
        for zone in zones {
            registry.add_zone(zone);
        }
        registry
    }

    /// Registry holding the default protein container used when no
    /// configuration is available.
    pub fn with_defaults() -> Self {
        let zone = Zone::new(
            "roi_1",
            "Protein Container",
            Rect::from_tlbr(200.0, 150.0, 440.0, 350.0),
            ZoneKind::ProteinContainer,
        );
        info!("Loaded default zone: {}", zone.name);
        Self::from_zones([zone])
    }

    pub fn with_min_zone_size(mut self, min_zone_size: f32) -> Self {
        self.min_zone_size = min_zone_size;
        self
    }

    /// Add a zone, replacing any zone with the same id in place.
    pub fn add_zone(&mut self, zone: Zone) {
        info!("Added zone: {} - {}", zone.id, zone.name);
        match self.zones.iter_mut().find(|z| z.id == zone.id) {
            Some(existing) => *existing = zone,
            None => self.zones.push(zone),
        }
    }

    /// Remove a zone by id. No-op when absent.
    pub fn remove_zone(&mut self, id: &str) -> Option<Zone> {
        let idx = self.zones.iter().position(|z| z.id == id)?;
        info!("Removed zone: {}", id);
        Some(self.zones.remove(idx))
    }

    /// Apply `f` to the zone with the given id. Returns false when absent.
    pub fn update_zone(&mut self, id: &str, f: impl FnOnce(&mut Zone)) -> bool {
        match self.zones.iter_mut().find(|z| z.id == id) {
            Some(zone) => {
                f(zone);
                info!("Updated zone: {}", id);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn active_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|z| z.active)
    }

    /// All active zones containing the point, edges inclusive.
    pub fn zones_containing(&self, point: &Point) -> Vec<&Zone> {
        self.active_zones()
            .filter(|z| z.contains_point(point))
            .collect()
    }

    /// Active zones containing the centre of `bbox`.
    pub fn zones_containing_bbox(&self, bbox: &Rect) -> Vec<&Zone> {
        self.zones_containing(&bbox.center())
    }

    /// First active container zone containing the point.
    pub fn first_container_containing(&self, point: &Point) -> Option<&Zone> {
        self.active_zones()
            .find(|z| z.kind.is_container() && z.contains_point(point))
    }

    /// Fraction of `bbox` that lies inside the zone.
    pub fn overlap_ratio(&self, bbox: &Rect, zone: &Zone) -> f32 {
        overlap_ratio(bbox, &zone.rect)
    }

    /// Scale every zone from the reference frame size to the observed one,
    /// independently per axis.
    pub fn rescale(
        &mut self,
        observed_width: u32,
        observed_height: u32,
        reference_width: u32,
        reference_height: u32,
    ) {
        if reference_width == 0 || reference_height == 0 {
            warn!("Ignoring zone rescale against zero reference dimensions");
            return;
        }
        let sx = observed_width as f32 / reference_width as f32;
        let sy = observed_height as f32 / reference_height as f32;
        for zone in &mut self.zones {
            zone.rect = zone.rect.scale(sx, sy);
        }
        info!(
            "Rescaled {} zones from {}x{} to {}x{}",
            self.zones.len(),
            reference_width,
            reference_height,
            observed_width,
            observed_height
        );
    }

    /// Advisory placement checks. Zones are kept and used as-is regardless.
    pub fn validate(&self, frame_width: u32, frame_height: u32) -> Vec<String> {
        let mut warnings = Vec::new();
        let (fw, fh) = (frame_width as f32, frame_height as f32);

        for zone in &self.zones {
            let [x1, y1, x2, y2] = zone.rect.to_tlbr();
            if x1 < 0.0 || y1 < 0.0 {
                warnings.push(format!("Zone {} has negative coordinates", zone.id));
            }
            if x2 > fw || y2 > fh {
                warnings.push(format!("Zone {} extends beyond frame boundaries", zone.id));
            }
            if x1 >= x2 || y1 >= y2 {
                warnings.push(format!("Zone {} has invalid dimensions", zone.id));
            } else if x2 - x1 < self.min_zone_size || y2 - y1 < self.min_zone_size {
                warnings.push(format!(
                    "Zone {} is smaller than {}x{}",
                    zone.id, self.min_zone_size, self.min_zone_size
                ));
            }
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        warnings
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}
