use proptest::prelude::*;
use ripdash_core::{DiscKind, DriveSnapshot, Tier, classify, select_for_type};

fn arb_tier() -> impl Strategy<Value = Tier> {
    prop_oneof![Just(Tier::Cd), Just(Tier::Dvd), Just(Tier::Bluray)]
}

fn arb_drive() -> impl Strategy<Value = DriveSnapshot> {
    (
        prop::collection::vec(arb_tier(), 0..4),
        any::<bool>(),
        any::<bool>(),
        "[a-z]{1,6}",
    )
        .prop_map(|(caps, busy, blacklisted, name)| DriveSnapshot {
            path: format!("/dev/{name}"),
            model: name,
            capability: caps.into_iter().map(DiscKind::from).collect(),
            job_id: busy.then(|| "job".to_string()),
            blacklisted,
            disc_label: None,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn available_never_exceeds_total(drives in prop::collection::vec(arb_drive(), 0..12)) {
        let summary = classify(&drives);
        for tier in Tier::ALL {
            let a = summary.get(tier);
            prop_assert!(a.available <= a.total);
            prop_assert!(a.total <= drives.len());
        }
    }

    #[test]
    fn weaker_tiers_have_at_least_as_much_capacity(
        drives in prop::collection::vec(arb_drive(), 0..12)
    ) {
        let summary = classify(&drives);
        prop_assert!(summary.get(Tier::Cd).total >= summary.get(Tier::Dvd).total);
        prop_assert!(summary.get(Tier::Dvd).total >= summary.get(Tier::Bluray).total);
    }

    #[test]
    fn selection_only_returns_idle_native_drives(
        drives in prop::collection::vec(arb_drive(), 0..12),
        tier in arb_tier(),
    ) {
        if let Some(chosen) = select_for_type(&drives, tier) {
            prop_assert!(chosen.job_id.is_none());
            prop_assert!(!chosen.blacklisted);
            prop_assert!(chosen.has_native(tier));
        }
    }

    #[test]
    fn selection_is_deterministic(
        drives in prop::collection::vec(arb_drive(), 0..12),
        tier in arb_tier(),
    ) {
        let first = select_for_type(&drives, tier).map(|d| d as *const DriveSnapshot);
        let second = select_for_type(&drives, tier).map(|d| d as *const DriveSnapshot);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn selection_exists_iff_some_idle_drive_lists_the_tier(
        drives in prop::collection::vec(arb_drive(), 0..12),
        tier in arb_tier(),
    ) {
        let expected = drives.iter().any(|d| d.is_available() && d.has_native(tier));
        prop_assert_eq!(select_for_type(&drives, tier).is_some(), expected);
    }
}

#[test]
fn scenario_multi_capability_drive_wins_bluray_request() {
    let drives = vec![
        DriveSnapshot {
            path: "/d1".into(),
            model: "Combo".into(),
            capability: vec![Tier::Cd.into(), Tier::Dvd.into(), Tier::Bluray.into()],
            job_id: None,
            blacklisted: false,
            disc_label: None,
        },
        DriveSnapshot {
            path: "/d2".into(),
            model: "BD only".into(),
            capability: vec![Tier::Bluray.into()],
            job_id: None,
            blacklisted: false,
            disc_label: None,
        },
    ];
    assert_eq!(select_for_type(&drives, Tier::Bluray).unwrap().path, "/d1");
    assert_eq!(classify(&drives).get(Tier::Bluray).available, 2);
}
