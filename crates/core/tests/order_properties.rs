//! Property-based integration tests for order validation and the marker
//! registry, using `proptest` for random test case generation.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use livemap_core::dashboard::{Marker, MarkerRegistry};
use livemap_core::orders::{OloTimestamp, Order, PlatformTimeZone, WebhookPayload};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeSet;

const REQUIRED: [&str; 5] = ["storeNumber", "latitude", "longitude", "timePlaced", "timeReady"];

fn order(id: i64, time_ready: String) -> Order {
    Order {
        id,
        store_number: "1042".to_string(),
        store_name: None,
        latitude: 40.7128,
        longitude: -74.006,
        time_placed: "20240315 14:05".to_string(),
        time_ready,
    }
}

// =============================================================================
// Generators
// =============================================================================

fn arb_timestamp_text() -> impl Strategy<Value = String> {
    (2000i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, mo, d, h, mi)| {
        format!("{y:04}{mo:02}{d:02} {h:02}:{mi:02}")
    })
}

#[derive(Debug, Clone)]
enum RegistryOp {
    Insert(i64),
    Remove(i64),
}

fn arb_registry_op() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        (0i64..16).prop_map(RegistryOp::Insert),
        (0i64..16).prop_map(RegistryOp::Remove),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn well_formed_timestamps_parse(text in arb_timestamp_text()) {
        let parsed: OloTimestamp = text.parse().unwrap();
        prop_assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn arbitrary_text_never_panics(text in ".{0,20}") {
        let _ = text.parse::<OloTimestamp>();
    }

    #[test]
    fn active_exactly_until_ready(offset_minutes in -720i64..720) {
        let zone = PlatformTimeZone::Named(chrono_tz::UTC);
        let now = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(14, 0, 0).unwrap(),
        );
        let ready = OloTimestamp::from_instant(now + Duration::minutes(offset_minutes), &zone);
        let active = order(1, ready.to_string()).is_active(now, &zone).unwrap();
        prop_assert_eq!(active, offset_minutes > 0);
    }

    #[test]
    fn every_removed_field_is_reported(mask in 0u8..32) {
        let mut body = json!({
            "storeNumber": "1042",
            "latitude": 40.7128,
            "longitude": -74.006,
            "timePlaced": "20240315 14:05",
            "timeReady": "20240315 14:30"
        });
        let removed: Vec<&str> = REQUIRED
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, name)| *name)
            .collect();
        for name in &removed {
            body.as_object_mut().unwrap().insert(name.to_string(), Value::Null);
        }

        let payload: WebhookPayload = serde_json::from_value(body).unwrap();
        prop_assert_eq!(payload.missing_fields(), removed.clone());
        prop_assert_eq!(payload.into_new_order().is_ok(), removed.is_empty());
    }

    #[test]
    fn registry_tracks_like_a_set(ops in prop::collection::vec(arb_registry_op(), 0..64)) {
        let mut registry = MarkerRegistry::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                RegistryOp::Insert(id) => {
                    let marker = Marker::for_order(&order(id, "20240315 14:30".to_string()));
                    prop_assert_eq!(registry.insert(marker), model.insert(id));
                }
                RegistryOp::Remove(id) => {
                    prop_assert_eq!(registry.remove(id).is_some(), model.remove(&id));
                }
            }
        }

        prop_assert_eq!(registry.len(), model.len());
        prop_assert_eq!(registry.ids(), model.into_iter().collect::<Vec<_>>());
    }
}
