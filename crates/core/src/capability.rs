//! Drive capability model.
//!
//! Pure computation over a drive snapshot: per-tier availability accounting
//! (with capability inheritance) and the deterministic "best available drive"
//! selection used for rip-by-type requests.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{DriveSnapshot, Tier};

/// Installed and biddable drive counts for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierAvailability {
    pub tier: Tier,
    pub total: usize,
    pub available: usize,
}

/// Result of [`classify`]. Always recomputed from a whole snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySummary<'a> {
    pub availability: BTreeMap<Tier, TierAvailability>,
    /// Blacklisted drives, in snapshot order. They still count toward `total`.
    pub blacklisted: Vec<&'a DriveSnapshot>,
}

impl CapabilitySummary<'_> {
    pub fn get(&self, tier: Tier) -> TierAvailability {
        self.availability.get(&tier).copied().unwrap_or(TierAvailability {
            tier,
            total: 0,
            available: 0,
        })
    }
}

/// Tiers a drive covers for availability accounting: every tier at or below
/// any of its native tiers. Unknown capability labels cover nothing.
pub fn expand(drive: &DriveSnapshot) -> BTreeSet<Tier> {
    drive
        .native_tiers()
        .flat_map(|native| Tier::ALL.into_iter().filter(move |t| native.serves(*t)))
        .collect()
}

/// Compute per-tier availability and the blacklisted drive list.
pub fn classify(drives: &[DriveSnapshot]) -> CapabilitySummary<'_> {
    let mut availability: BTreeMap<Tier, TierAvailability> = Tier::ALL
        .into_iter()
        .map(|tier| {
            (
                tier,
                TierAvailability {
                    tier,
                    total: 0,
                    available: 0,
                },
            )
        })
        .collect();
    let mut blacklisted = Vec::new();

    for drive in drives {
        if drive.blacklisted {
            blacklisted.push(drive);
        }
        for tier in expand(drive) {
            let entry = availability
                .entry(tier)
                .or_insert(TierAvailability {
                    tier,
                    total: 0,
                    available: 0,
                });
            entry.total += 1;
            if drive.is_available() {
                entry.available += 1;
            }
        }
    }

    CapabilitySummary {
        availability,
        blacklisted,
    }
}

/// Pick the drive to eject for a rip of `tier`.
///
/// Candidates are idle, non-blacklisted drives whose *native* capability list
/// contains `tier` literally; inheritance is not applied here. Among them the
/// drive with the lowest minimum native tier wins, ties keep snapshot order.
pub fn select_for_type(drives: &[DriveSnapshot], tier: Tier) -> Option<&DriveSnapshot> {
    drives
        .iter()
        .filter(|d| d.is_available() && d.has_native(tier))
        // min_by_key returns the first minimum, which keeps the ordering stable.
        .min_by_key(|d| d.native_tiers().map(Tier::rank).min().unwrap_or(tier.rank()))
}
