//! Property-based tests for DashboardSettings serialization round-trip.
//!
//! These tests verify that DashboardSettings can be serialized to JSON
//! and deserialized back without data loss for arbitrary valid inputs.

use cassandra_leaves::types::settings::{
    ApiSettings, AppearanceSettings, DashboardSettings, DetailSettings, SyncSettings,
    ViewSettings,
};
use proptest::prelude::*;

// --- Arbitrary strategies for all settings sub-types ---

fn arb_api_settings() -> impl Strategy<Value = ApiSettings> {
    ("https://[a-z0-9.-]{3,30}/api:[a-zA-Z0-9]{4,10}", 1u64..120).prop_map(
        |(base_url, timeout_secs)| ApiSettings {
            base_url,
            timeout_secs,
        },
    )
}

fn arb_sync_settings() -> impl Strategy<Value = SyncSettings> {
    (0u64..10_000, 0u32..10, 0u64..10_000).prop_map(
        |(inter_page_delay_ms, max_rate_limit_retries, initial_backoff_ms)| SyncSettings {
            inter_page_delay_ms,
            max_rate_limit_retries,
            initial_backoff_ms,
        },
    )
}

fn arb_detail_settings() -> impl Strategy<Value = DetailSettings> {
    (1u32..10, 0u64..10_000).prop_map(|(max_attempts, backoff_step_ms)| DetailSettings {
        max_attempts,
        backoff_step_ms,
    })
}

fn arb_dashboard_settings() -> impl Strategy<Value = DashboardSettings> {
    (
        arb_api_settings(),
        arb_sync_settings(),
        arb_detail_settings(),
        1usize..100,
        any::<bool>(),
    )
        .prop_map(|(api, sync, detail, page_size, dark_mode)| DashboardSettings {
            api,
            sync,
            detail,
            view: ViewSettings { page_size },
            appearance: AppearanceSettings { dark_mode },
        })
}

// **Settings serialization round-trip**
//
// *For any* valid DashboardSettings object, serializing to JSON then
// deserializing SHALL produce an equivalent object.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn settings_serialization_roundtrip(settings in arb_dashboard_settings()) {
        let json = serde_json::to_string(&settings)
            .expect("DashboardSettings should serialize to JSON");
        let deserialized: DashboardSettings = serde_json::from_str(&json)
            .expect("JSON should deserialize back to DashboardSettings");
        prop_assert_eq!(&settings, &deserialized);
    }

    #[test]
    fn settings_pretty_json_roundtrip(settings in arb_dashboard_settings()) {
        let json = serde_json::to_string_pretty(&settings)
            .expect("DashboardSettings should serialize to pretty JSON");
        let deserialized: DashboardSettings = serde_json::from_str(&json)
            .expect("Pretty JSON should deserialize back to DashboardSettings");
        prop_assert_eq!(&settings, &deserialized);
    }
}
