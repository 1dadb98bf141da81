//! On-demand reads and writes against the world.
//!
//! - [`nearest_available_bin`] answers "where can I throw this away?"
//! - [`submit_report`] records a citizen hotspot report and pays the
//!   eco-point reward.
//!
//! Both run synchronously inside the caller's critical section; the
//! [`LiveWorld`](crate::live::LiveWorld) handle takes care of locking and
//! of broadcasting the resulting events.

use chrono::{DateTime, Utc};
use cleantrack_types::{Hotspot, HotspotId, NearestBin, Severity};
use validator::Validate;

use crate::world::WorldState;

/// Category used when a report does not name one.
pub const DEFAULT_REPORT_TYPE: &str = "overflow";

/// Description used when a report does not carry one.
pub const DEFAULT_REPORT_DESCRIPTION: &str = "Reported issue";

/// Errors raised while validating a citizen report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A coordinate was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite {
        /// `lat` or `lng`.
        field: &'static str,
    },

    /// A field failed a range or length check.
    #[error("invalid report: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// A validated citizen report, ready to become a [`Hotspot`].
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct Report {
    /// Latitude in degrees.
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    /// Longitude in degrees.
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    /// Issue category; blank means [`DEFAULT_REPORT_TYPE`].
    #[validate(length(max = 64))]
    pub kind: Option<String>,
    /// Free text; blank means [`DEFAULT_REPORT_DESCRIPTION`].
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl Report {
    /// Validate raw report fields.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NonFinite`] for NaN or infinite coordinates
    /// and [`ReportError::Invalid`] for out-of-range values or oversized
    /// text.
    pub fn new(
        lat: f64,
        lng: f64,
        kind: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ReportError> {
        if !lat.is_finite() {
            return Err(ReportError::NonFinite { field: "lat" });
        }
        if !lng.is_finite() {
            return Err(ReportError::NonFinite { field: "lng" });
        }
        let report = Self {
            lat,
            lng,
            kind: non_blank(kind),
            description: non_blank(description),
        };
        report.validate()?;
        Ok(report)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Find the closest bin that still has room.
///
/// Bins with `fill_level >= available_threshold` are ignored. Distance is
/// plain Euclidean distance in degree space, which is accurate enough at
/// city scale. On a tie the bin that comes first in registry order wins.
/// Returns `None` when no bin qualifies or the query point is not finite.
pub fn nearest_available_bin(world: &WorldState, lat: f64, lng: f64) -> Option<NearestBin> {
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    let threshold = world.rules().available_threshold;

    let mut best: Option<(f64, usize)> = None;
    for (index, bin) in world.bins().iter().enumerate() {
        if bin.fill_level >= threshold {
            continue;
        }
        let d_lat = bin.lat - lat;
        let d_lng = bin.lng - lng;
        let squared = d_lat.mul_add(d_lat, d_lng * d_lng);
        match best {
            Some((best_squared, _)) if squared >= best_squared => {}
            _ => best = Some((squared, index)),
        }
    }

    let (squared, index) = best?;
    world.bins().get(index).map(|bin| NearestBin {
        bin: bin.clone(),
        distance: squared.sqrt(),
    })
}

/// Record a citizen report as a new hotspot.
///
/// Appends the hotspot, adds the configured reward to `eco_points`, and
/// recomputes stats. Every call creates a new hotspot; retries are not
/// deduplicated.
pub fn submit_report(world: &mut WorldState, report: Report, now: DateTime<Utc>) -> Hotspot {
    let hotspot = Hotspot {
        id: HotspotId::new(),
        lat: report.lat,
        lng: report.lng,
        kind: report
            .kind
            .unwrap_or_else(|| DEFAULT_REPORT_TYPE.to_owned()),
        severity: Severity::default(),
        reported_by: format!("citizen_{}", now.timestamp_millis()),
        description: Some(
            report
                .description
                .unwrap_or_else(|| DEFAULT_REPORT_DESCRIPTION.to_owned()),
        ),
        reported_at: now,
    };

    let reward = world.rules().report_reward;
    world.push_hotspot(hotspot.clone());
    world.award_eco_points(reward);
    world.recompute_stats();
    hotspot
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use cleantrack_types::{Bin, BinId, BinType};

    use super::*;
    use crate::config::WorldRules;
    use crate::seed;

    fn bin(id: u32, lat: f64, lng: f64, fill_level: u8) -> Bin {
        Bin {
            id: BinId(id),
            lat,
            lng,
            fill_level,
            kind: BinType::Dustbin,
            name: format!("bin-{id}"),
        }
    }

    fn world_with(bins: Vec<Bin>) -> WorldState {
        WorldState::new(bins, Vec::new(), Vec::new(), WorldRules::default())
    }

    #[test]
    fn nearest_picks_available_bin_at_query_point() {
        let world = world_with(vec![bin(1, 0.0, 0.0, 10), bin(2, 10.0, 10.0, 95)]);
        let nearest = nearest_available_bin(&world, 0.0, 0.0).unwrap();
        assert_eq!(nearest.bin.id, BinId(1));
        assert!(nearest.distance.abs() < f64::EPSILON);
    }

    #[test]
    fn nearest_skips_full_bin_even_when_closer() {
        let world = world_with(vec![bin(1, 0.0, 0.0, 10), bin(2, 10.0, 10.0, 95)]);
        let nearest = nearest_available_bin(&world, 10.0, 10.0).unwrap();
        assert_eq!(nearest.bin.id, BinId(1));
    }

    #[test]
    fn threshold_is_exclusive() {
        let world = world_with(vec![bin(1, 0.0, 0.0, 90), bin(2, 5.0, 5.0, 89)]);
        let nearest = nearest_available_bin(&world, 0.0, 0.0).unwrap();
        assert_eq!(nearest.bin.id, BinId(2));
    }

    #[test]
    fn all_full_bins_yield_none() {
        let world = world_with(vec![bin(1, 0.0, 0.0, 90), bin(2, 1.0, 1.0, 100)]);
        assert!(nearest_available_bin(&world, 0.0, 0.0).is_none());
    }

    #[test]
    fn empty_registry_yields_none() {
        let world = world_with(Vec::new());
        assert!(nearest_available_bin(&world, 0.0, 0.0).is_none());
    }

    #[test]
    fn ties_go_to_registry_order() {
        let world = world_with(vec![
            bin(1, 1.0, 0.0, 10),
            bin(2, -1.0, 0.0, 10),
            bin(3, 0.0, 1.0, 10),
        ]);
        let nearest = nearest_available_bin(&world, 0.0, 0.0).unwrap();
        assert_eq!(nearest.bin.id, BinId(1));
    }

    #[test]
    fn nan_query_yields_none() {
        let world = world_with(vec![bin(1, 0.0, 0.0, 10)]);
        assert!(nearest_available_bin(&world, f64::NAN, 0.0).is_none());
    }

    #[test]
    fn submit_adds_one_hotspot_and_fifty_points() {
        let mut world = seed::create_seed_world(WorldRules::default());
        let before = world.stats();
        let report = Report::new(12.97, 77.59, Some(String::from("litter")), None).unwrap();

        let hotspot = submit_report(&mut world, report, Utc::now());

        let after = world.stats();
        assert_eq!(world.hotspots().len(), 3);
        assert_eq!(after.total_hotspots, before.total_hotspots + 1);
        assert_eq!(after.eco_points, before.eco_points + 50);
        assert_eq!(hotspot.kind, "litter");
        assert_eq!(hotspot.severity, Severity::Medium);
        assert_eq!(hotspot.description.as_deref(), Some(DEFAULT_REPORT_DESCRIPTION));
        assert!(hotspot.reported_by.starts_with("citizen_"));
        assert_eq!(world.hotspots().last(), Some(&hotspot));
    }

    #[test]
    fn blank_type_defaults_to_overflow() {
        let report = Report::new(1.0, 2.0, Some(String::from("   ")), None).unwrap();
        let mut world = world_with(Vec::new());
        let hotspot = submit_report(&mut world, report, Utc::now());
        assert_eq!(hotspot.kind, DEFAULT_REPORT_TYPE);
    }

    #[test]
    fn back_to_back_reports_get_distinct_ids() {
        let mut world = world_with(Vec::new());
        let now = Utc::now();
        let ids: BTreeSet<HotspotId> = (0..500)
            .map(|_| {
                let report = Report::new(1.0, 2.0, None, None).unwrap();
                submit_report(&mut world, report, now).id
            })
            .collect();
        assert_eq!(ids.len(), 500);
        assert_eq!(world.stats().eco_points, 1250 + 500 * 50);
    }

    #[test]
    fn report_rejects_bad_coordinates() {
        assert!(matches!(
            Report::new(f64::NAN, 0.0, None, None),
            Err(ReportError::NonFinite { field: "lat" })
        ));
        assert!(matches!(
            Report::new(0.0, f64::INFINITY, None, None),
            Err(ReportError::NonFinite { field: "lng" })
        ));
        assert!(matches!(
            Report::new(91.0, 0.0, None, None),
            Err(ReportError::Invalid(_))
        ));
        assert!(matches!(
            Report::new(0.0, -180.5, None, None),
            Err(ReportError::Invalid(_))
        ));
    }

    #[test]
    fn report_rejects_oversized_description() {
        let long = "x".repeat(501);
        assert!(Report::new(0.0, 0.0, None, Some(long)).is_err());
    }
}
