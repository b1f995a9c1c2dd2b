//! Integration tests for core snapshot types.

use quotabar_core::{
    AggregateSnapshot, ColorTier, NormalizedMetric, PeakReading, ProviderId, RawProviderResult,
    RawResults, SnapshotStatus,
};

#[test]
fn test_snapshot_serialization_roundtrip() {
    let snapshot = AggregateSnapshot::failed(vec![ProviderId::Codex], "timed out");
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: AggregateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.status, SnapshotStatus::Failed("timed out".into()));
    assert_eq!(parsed.enabled, vec![ProviderId::Codex]);
}

#[test]
fn test_combined_peak_is_prioritized_provider() {
    let mut snapshot = AggregateSnapshot::failed(
        vec![ProviderId::Claude, ProviderId::Gemini],
        "placeholder",
    );
    snapshot.status = SnapshotStatus::Ready;

    let mut claude = NormalizedMetric::new(ProviderId::Claude);
    claude.primary_percent = Some(30.0);
    let mut gemini = NormalizedMetric::new(ProviderId::Gemini);
    gemini.primary_percent = Some(95.0);

    snapshot.peaks.insert(ProviderId::Claude, PeakReading::from_metric(&claude));
    snapshot.peaks.insert(ProviderId::Gemini, PeakReading::from_metric(&gemini));
    snapshot.prioritized = Some(ProviderId::Claude);

    // No cross-provider blending: Gemini's 95% does not leak into the combined tier.
    assert_eq!(snapshot.combined_peak().unwrap().primary, Some(30.0));
    assert_eq!(snapshot.combined_tier(), ColorTier::Normal);
    assert_eq!(snapshot.peak(ProviderId::Gemini).unwrap().tier, ColorTier::Critical);
}

#[test]
fn test_raw_results_lookup() {
    let results = RawResults::new()
        .with_payload(ProviderId::OpenRouter, serde_json::json!({"balance_usd": 3.0}))
        .with_error(ProviderId::Codex, "401");

    assert_eq!(results.len(), 2);
    assert!(results.get(ProviderId::Codex).unwrap().is_error());
    assert!(results.get(ProviderId::OpenRouter).unwrap().payload().is_some());
    assert!(results.get(ProviderId::Claude).is_none());
    assert_eq!(
        results.get(ProviderId::Codex),
        Some(&RawProviderResult::Error("401".into()))
    );
}
