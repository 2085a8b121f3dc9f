//! Strike zone and plate coverage indicator (PCI)

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::settings::{ContactConfig, FieldConfig};

/// Axis-aligned strike zone box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeZone {
    pub center: Vec3,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl StrikeZone {
    pub fn new(center: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self {
            center,
            width,
            height,
            depth,
        }
    }

    pub fn from_field(field: &FieldConfig) -> Self {
        Self::new(
            field.zone_center,
            field.zone_width,
            field.zone_height,
            field.zone_depth,
        )
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Distance from the zone center to a corner in the zone plane
    pub fn half_diagonal(&self) -> f32 {
        self.half_extents().length()
    }

    /// World z of the plane timing is measured against
    #[inline]
    pub fn plane_z(&self) -> f32 {
        self.center.z
    }

    /// Clamp a zone-plane offset to the half-extents
    pub fn clamp_offset(&self, offset: Vec2) -> Vec2 {
        let half = self.half_extents();
        offset.clamp(-half, half)
    }

    /// Zone-plane offset to world position
    pub fn to_world(&self, offset: Vec2) -> Vec3 {
        self.center + Vec3::new(offset.x, offset.y, 0.0)
    }
}

/// Proximity tier used for PCI color feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PciTier {
    /// No pitch in flight or ball well away from the PCI
    Far,
    /// Within the outer contact bound
    Near,
    /// Within the good threshold
    Close,
    /// Within the perfect threshold
    Locked,
}

/// Plate coverage indicator: where the batter aims, as a zone-plane offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pci {
    offset: Vec2,
}

impl Pci {
    pub fn new(zone: &StrikeZone, offset: Vec2) -> Self {
        Self {
            offset: zone.clamp_offset(offset),
        }
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Move by a delta (already in meters), staying inside the zone
    pub fn nudge(&mut self, zone: &StrikeZone, delta: Vec2) {
        self.offset = zone.clamp_offset(self.offset + delta);
    }

    /// Anchor at an absolute offset (cursor raycast onto the zone plane)
    pub fn set(&mut self, zone: &StrikeZone, offset: Vec2) {
        self.offset = zone.clamp_offset(offset);
    }

    /// Re-apply the clamp after the zone geometry changes
    pub fn reclamp(&mut self, zone: &StrikeZone) {
        self.offset = zone.clamp_offset(self.offset);
    }

    pub fn world(&self, zone: &StrikeZone) -> Vec3 {
        zone.to_world(self.offset)
    }

    /// Offset scaled to [-1, 1] on each axis
    pub fn normalized(&self, zone: &StrikeZone) -> Vec2 {
        let half = zone.half_extents();
        (self.offset / half).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }

    /// Planar (x/y) distance from a world point to the PCI
    pub fn planar_distance(&self, zone: &StrikeZone, point: Vec3) -> f32 {
        let pci = self.world(zone);
        Vec2::new(point.x - pci.x, point.y - pci.y).length()
    }

    /// Color tier for a ball at `ball_pos`
    pub fn tier(&self, zone: &StrikeZone, ball_pos: Vec3, contact: &ContactConfig) -> PciTier {
        let d = self.planar_distance(zone, ball_pos);
        if d <= contact.perfect_pci {
            PciTier::Locked
        } else if d <= contact.good_pci {
            PciTier::Close
        } else if d <= contact.pci_outer {
            PciTier::Near
        } else {
            PciTier::Far
        }
    }
}
