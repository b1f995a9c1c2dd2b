//! CLI output formatting tests.
//!
//! Snapshots are built through the real aggregator and render sink so the
//! formatters see the same data a usage run would.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::{TimeZone, Utc};
    use quotabar_app::RenderSink;
    use quotabar_core::{AggregateSnapshot, DisplayMode, ProviderId, RawResults};
    use quotabar_providers::{ProviderRegistry, aggregate_at};
    use serde_json::json;

    fn snapshot(enabled: &[ProviderId], results: &RawResults) -> AggregateSnapshot {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        aggregate_at(enabled, results, now)
    }

    #[test]
    fn test_format_snapshot_claude() {
        let formatter = TextFormatter::new(false);
        let results = RawResults::new().with_payload(
            ProviderId::Claude,
            json!({"five_hour": {"used": "42%"}, "seven_day": {"used": "10%"}}),
        );

        let output = formatter.format_snapshot(&snapshot(&[ProviderId::Claude], &results));

        assert!(output.starts_with("Claude: 42% (5h) | 10% (7d)"));
        assert!(output.contains("5h:"));
        assert!(output.contains("42% used"));
        assert!(output.contains("7d:"));
        assert!(output.contains("10% used"));
    }

    #[test]
    fn test_format_snapshot_gemini_details() {
        let formatter = TextFormatter::new(false);
        let results = RawResults::new().with_payload(
            ProviderId::Gemini,
            json!({"models": {"pro": {"used": "95%"}, "flash": {"used": "12%"}}}),
        );

        let output = formatter.format_snapshot(&snapshot(&[ProviderId::Gemini], &results));

        assert!(output.contains("Gemini: 95% (max across models)"));
        assert!(output.contains("* pro: 95%"));
        assert!(output.contains("* flash: 12%"));
    }

    #[test]
    fn test_format_snapshot_lists_unavailable() {
        let formatter = TextFormatter::new(false);
        let results = RawResults::new()
            .with_payload(ProviderId::OpenRouter, json!({"balance_usd": 12.5}))
            .with_error(ProviderId::Codex, "not logged in");

        let output = formatter.format_snapshot(&snapshot(
            &[ProviderId::Codex, ProviderId::Zai, ProviderId::OpenRouter],
            &results,
        ));

        assert!(output.contains("Codex: Error - not logged in"));
        assert!(output.contains("Z.AI: no data"));
        assert!(output.contains("$12.50"));
        let codex = output.find("Codex").unwrap();
        let openrouter = output.find("OpenRouter").unwrap();
        assert!(codex < openrouter);
    }

    #[test]
    fn test_format_snapshot_disabled_and_failed() {
        let formatter = TextFormatter::new(false);

        let output = formatter.format_snapshot(&AggregateSnapshot::disabled());
        assert_eq!(output, "All providers disabled.");

        let output = formatter.format_snapshot(&AggregateSnapshot::failed(
            vec![ProviderId::Claude],
            "timed out",
        ));
        assert_eq!(output, "Fetch: Error - timed out");
    }

    #[test]
    fn test_format_indicator_uses_status_text() {
        let formatter = TextFormatter::new(false);
        let results = RawResults::new().with_payload(
            ProviderId::Zai,
            json!({"token_quota": {"percentage": 37.5}}),
        );
        let mut sink = RenderSink::new(DisplayMode::Single);
        sink.render(&snapshot(&[ProviderId::Zai], &results));

        let visible = sink.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(formatter.format_indicator(visible[0].1), "$(pulse) AI: 37.5%");
    }

    #[test]
    fn test_critical_metric_is_red() {
        let formatter = TextFormatter::new(true);
        let results = RawResults::new().with_payload(
            ProviderId::Claude,
            json!({"five_hour": {"used": "95%"}, "seven_day": {"used": "10%"}}),
        );

        let output = formatter.format_snapshot(&snapshot(&[ProviderId::Claude], &results));
        let header = output.lines().next().unwrap();
        assert!(header.contains("\x1b[31m"));
    }

    #[test]
    fn test_provider_line() {
        let formatter = TextFormatter::new(false);
        let desc = ProviderRegistry::get(ProviderId::Zai).unwrap();

        let line = formatter.format_provider_line(desc, true);

        assert!(line.starts_with("Z.AI"));
        assert!(line.contains("zai"));
        assert!(line.contains('✓'));
        assert!(line.contains(desc.description));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use quotabar_app::RenderSink;
    use quotabar_core::{DisplayMode, ProviderId, RawResults};
    use quotabar_providers::{ProviderRegistry, aggregate};
    use serde_json::{Value, json};

    #[test]
    fn test_format_usage_json() {
        let formatter = JsonFormatter::new(true);
        let results = RawResults::new()
            .with_payload(
                ProviderId::Claude,
                json!({"five_hour": {"used": "42%"}, "seven_day": {"used": "10%"}}),
            )
            .with_error(ProviderId::Codex, "expired");
        let snapshot = aggregate(&[ProviderId::Claude, ProviderId::Codex], &results);
        let mut sink = RenderSink::new(DisplayMode::Single);
        sink.render(&snapshot);

        let output = formatter.format_usage(&snapshot, &sink.visible()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["status"]["state"], "ready");
        assert_eq!(parsed["prioritized"], "claude");
        assert_eq!(parsed["combinedTier"], "normal");

        let providers = parsed["providers"].as_array().unwrap();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0]["provider"], "claude");
        assert_eq!(providers[0]["primaryPercent"], 42.0);
        assert_eq!(providers[1]["available"], false);
        assert_eq!(providers[1]["error"], "expired");

        let indicators = parsed["indicators"].as_array().unwrap();
        assert_eq!(indicators.len(), 1);
        assert_eq!(indicators[0]["slot"], "combined");
        assert_eq!(indicators[0]["text"], "42%|10%");
        assert_eq!(indicators[0]["statusText"], "$(pulse) AI: 42%|10%");
    }

    #[test]
    fn test_theme_color_for_warning() {
        let formatter = JsonFormatter::new(false);
        let results = RawResults::new().with_payload(
            ProviderId::Codex,
            json!({"primary_window": {"used": "75%"}, "secondary_window": {"used": "5%"}}),
        );
        let snapshot = aggregate(&[ProviderId::Codex], &results);
        let mut sink = RenderSink::new(DisplayMode::PerProvider);
        sink.render(&snapshot);

        let output = formatter.format_usage(&snapshot, &sink.visible()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["indicators"][0]["slot"], "codex");
        assert_eq!(
            parsed["indicators"][0]["themeColor"],
            "statusBarItem.warningForeground"
        );
    }

    #[test]
    fn test_format_providers_json() {
        let formatter = JsonFormatter::new(false);

        let output = formatter
            .format_providers(ProviderRegistry::all(), &[ProviderId::Gemini])
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        let list = parsed.as_array().unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0]["cliName"], "claude");
        assert_eq!(list[0]["enabled"], false);
        assert_eq!(list[2]["cliName"], "gemini");
        assert_eq!(list[2]["enabled"], true);
    }
}
