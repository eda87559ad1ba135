//! JSON zone configuration: `{"frame_width", "frame_height", "rois": [...]}`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Zone, ZoneKind, ZoneRegistry};
use crate::error::Result;
use crate::geometry::Rect;

/// One zone as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub id: String,
    pub name: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(rename = "type", default)]
    pub kind: ZoneKind,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<ZoneEntry> for Zone {
    fn from(entry: ZoneEntry) -> Self {
        Zone {
            id: entry.id,
            name: entry.name,
            rect: Rect::from_tlbr(entry.x1, entry.y1, entry.x2, entry.y2),
            kind: entry.kind,
            active: entry.active,
        }
    }
}

impl From<&Zone> for ZoneEntry {
    fn from(zone: &Zone) -> Self {
        let [x1, y1, x2, y2] = zone.rect.to_tlbr();
        ZoneEntry {
            id: zone.id.clone(),
            name: zone.name.clone(),
            x1,
            y1,
            x2,
            y2,
            kind: zone.kind,
            active: zone.active,
        }
    }
}

/// Zone configuration document.
///
/// `frame_width`/`frame_height`, when present, are the reference dimensions
/// the coordinates were drawn against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<u32>,
    #[serde(default)]
    pub rois: Vec<ZoneEntry>,
}

impl ZoneConfigFile {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&raw)?;
        info!("Loaded {} zones from {}", cfg.rois.len(), path.display());
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        info!("Saved zone config to {}", path.display());
        Ok(())
    }

    pub fn from_registry(registry: &ZoneRegistry) -> Self {
        Self {
            frame_width: None,
            frame_height: None,
            rois: registry.zones().iter().map(ZoneEntry::from).collect(),
        }
    }

    pub fn zones(&self) -> Vec<Zone> {
        self.rois.iter().cloned().map(Zone::from).collect()
    }

    /// Reference dimensions declared by the file, if both are present.
    pub fn reference_size(&self) -> Option<(u32, u32)> {
        self.frame_width.zip(self.frame_height)
    }
}
