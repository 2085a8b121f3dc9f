//! Contact resolution
//!
//! Decides, once per eligible tick, whether the bat met the ball and how
//! well. Grading is tiered: a better grade needs aim, timing (and bat
//! position, when a bat is modeled) to all be inside the tighter band.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::settings::ContactConfig;

/// Contact grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactQuality {
    Miss,
    Weak,
    Good,
    Perfect,
}

impl ContactQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactQuality::Miss => "MISS",
            ContactQuality::Weak => "WEAK",
            ContactQuality::Good => "GOOD",
            ContactQuality::Perfect => "PERFECT",
        }
    }
}

/// Everything the resolver samples on one tick
#[derive(Debug, Clone, Copy)]
pub struct ContactSample {
    pub ball: Vec3,
    pub pci_world: Vec3,
    /// Zone plane the timing distance is measured against
    pub zone_z: f32,
    /// Bat sweet spot, when a bat is modeled
    pub sweet_spot: Option<Vec3>,
}

/// A resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub quality: ContactQuality,
    pub timing_distance: f32,
    pub pci_distance: f32,
    pub bat_distance: Option<f32>,
    /// 1.0 at perfect timing, 0.0 at the edge of the tolerance
    pub timing_precision: f32,
}

/// Try to resolve contact for one tick; `None` means keep polling
pub fn resolve_contact(sample: &ContactSample, config: &ContactConfig) -> Option<Contact> {
    // The ball travels toward +z; past the plane by more than epsilon is too late
    if sample.ball.z > sample.zone_z + config.pass_epsilon {
        return None;
    }
    let timing_distance = (sample.ball.z - sample.zone_z).abs();
    if timing_distance > config.timing_tolerance {
        return None;
    }

    let dx = sample.ball.x - sample.pci_world.x;
    let dy = sample.ball.y - sample.pci_world.y;
    let pci_distance = (dx * dx + dy * dy).sqrt();
    if pci_distance > config.pci_outer {
        return None;
    }

    let bat_distance = sample.sweet_spot.map(|spot| spot.distance(sample.ball));
    if bat_distance.is_some_and(|d| d > config.bat_outer) {
        return None;
    }

    let within = |pci: f32, timing: f32, bat: f32| {
        pci_distance <= pci && timing_distance <= timing && bat_distance.is_none_or(|d| d <= bat)
    };
    let quality = if within(config.perfect_pci, config.perfect_timing, config.perfect_bat) {
        ContactQuality::Perfect
    } else if within(config.good_pci, config.good_timing, config.good_bat) {
        ContactQuality::Good
    } else {
        ContactQuality::Weak
    };

    Some(Contact {
        quality,
        timing_distance,
        pci_distance,
        bat_distance,
        timing_precision: timing_precision(timing_distance, config.timing_tolerance),
    })
}

/// `1 - clamp(timing / tolerance, 0, 1)`
#[inline]
pub fn timing_precision(timing_distance: f32, tolerance: f32) -> f32 {
    if tolerance <= 0.0 {
        return 0.0;
    }
    1.0 - (timing_distance / tolerance).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::zone::{Pci, StrikeZone};
    use glam::Vec2;
    use proptest::prelude::*;

    fn zone() -> StrikeZone {
        StrikeZone::new(Vec3::new(0.0, 1.3, -2.0), 1.2, 1.5, 0.4)
    }

    fn sample(ball: Vec3, pci_offset: Vec2) -> ContactSample {
        let z = zone();
        ContactSample {
            ball,
            pci_world: Pci::new(&z, pci_offset).world(&z),
            zone_z: z.plane_z(),
            sweet_spot: None,
        }
    }

    #[test]
    fn test_perfect_on_center_with_tight_timing() {
        // Ball 0.05 short of the plane, dead on the PCI
        let s = sample(Vec3::new(0.0, 1.3, -2.05), Vec2::ZERO);
        let contact = resolve_contact(&s, &ContactConfig::default()).unwrap();
        assert_eq!(contact.quality, ContactQuality::Perfect);
        assert!((contact.timing_distance - 0.05).abs() < 1e-5);
        assert_eq!(contact.pci_distance, 0.0);
    }

    #[test]
    fn test_timing_beyond_tolerance_never_resolves() {
        let s = sample(Vec3::new(0.0, 1.3, -2.5), Vec2::ZERO);
        assert!(resolve_contact(&s, &ContactConfig::default()).is_none());
    }

    #[test]
    fn test_passed_plate_rejected() {
        let config = ContactConfig::default();
        let just_past = sample(Vec3::new(0.0, 1.3, -2.0 + config.pass_epsilon * 0.5), Vec2::ZERO);
        assert!(resolve_contact(&just_past, &config).is_some());
        let too_late = sample(Vec3::new(0.0, 1.3, -2.0 + config.pass_epsilon * 1.5), Vec2::ZERO);
        assert!(resolve_contact(&too_late, &config).is_none());
    }

    #[test]
    fn test_grades_by_tightest_band() {
        let config = ContactConfig::default();
        // Good aim, perfect timing -> good
        let s = sample(Vec3::new(0.25, 1.3, -2.0), Vec2::ZERO);
        assert_eq!(resolve_contact(&s, &config).unwrap().quality, ContactQuality::Good);
        // Perfect aim, weak timing -> weak
        let s = sample(Vec3::new(0.0, 1.3, -2.4), Vec2::ZERO);
        assert_eq!(resolve_contact(&s, &config).unwrap().quality, ContactQuality::Weak);
        // Aim outside the outer bound -> no contact
        let s = sample(Vec3::new(0.0, 1.3, -2.0), Vec2::new(0.6, 0.75));
        assert!(resolve_contact(&s, &config).is_none());
    }

    #[test]
    fn test_bat_distance_gates_and_grades() {
        let config = ContactConfig::default();
        let mut s = sample(Vec3::new(0.0, 1.3, -2.0), Vec2::ZERO);
        s.sweet_spot = Some(Vec3::new(0.0, 1.3, -2.0));
        assert_eq!(resolve_contact(&s, &config).unwrap().quality, ContactQuality::Perfect);

        s.sweet_spot = Some(Vec3::new(0.0, 1.3, -1.75));
        assert_eq!(resolve_contact(&s, &config).unwrap().quality, ContactQuality::Good);

        s.sweet_spot = Some(Vec3::new(0.0, 1.3, -1.0));
        assert!(resolve_contact(&s, &config).is_none());
    }

    #[test]
    fn test_timing_precision_bounds() {
        assert_eq!(timing_precision(0.0, 0.45), 1.0);
        assert_eq!(timing_precision(0.45, 0.45), 0.0);
        assert_eq!(timing_precision(2.0, 0.45), 0.0);
        assert_eq!(timing_precision(0.1, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_quality_implies_thresholds(
            bx in -1.0f32..1.0,
            by in 0.3f32..2.3,
            bz in -2.6f32..-1.8,
            px in -0.6f32..0.6,
            py in -0.75f32..0.75,
            bat in proptest::option::of((-0.6f32..0.6, -0.6f32..0.6, -0.6f32..0.6)),
        ) {
            let config = ContactConfig::default();
            let mut s = sample(Vec3::new(bx, by, bz), Vec2::new(px, py));
            s.sweet_spot = bat.map(|(x, y, z)| s.ball + Vec3::new(x, y, z));

            if let Some(c) = resolve_contact(&s, &config) {
                prop_assert!(c.pci_distance <= config.pci_outer);
                prop_assert!(c.timing_distance <= config.timing_tolerance);
                prop_assert!((0.0..=1.0).contains(&c.timing_precision));
                match c.quality {
                    ContactQuality::Perfect => {
                        prop_assert!(c.pci_distance <= config.perfect_pci);
                        prop_assert!(c.timing_distance <= config.perfect_timing);
                        prop_assert!(c.bat_distance.is_none_or(|d| d <= config.perfect_bat));
                    }
                    ContactQuality::Good => {
                        prop_assert!(c.pci_distance <= config.good_pci);
                        prop_assert!(c.timing_distance <= config.good_timing);
                        prop_assert!(c.bat_distance.is_none_or(|d| d <= config.good_bat));
                    }
                    ContactQuality::Weak => {}
                    ContactQuality::Miss => prop_assert!(false, "resolver never grades a miss"),
                }
            }
        }
    }
}
