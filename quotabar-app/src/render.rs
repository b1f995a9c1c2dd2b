//! Render sink.
//!
//! Maps an [`AggregateSnapshot`] onto indicator state: text, tooltip, color
//! tier, icon and visibility. The sink owns every indicator it may show,
//! keyed by [`IndicatorSlot`]. Provider indicators are hidden rather than
//! removed when their provider has no data, so the same slots are reused
//! across cycles.
//!
//! After every render exactly one of these holds:
//! - the combined indicator is visible (single mode), or
//! - at least one provider indicator is visible, or
//! - the fallback indicator is visible.

use quotabar_core::{
    AggregateSnapshot, ColorTier, DisplayMode, PeakReading, ProviderId, SnapshotStatus,
    format_percent, format_usd,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::watch;
use tracing::debug;

/// Label of the combined and fallback indicators.
pub const COMBINED_LABEL: &str = "AI";

/// First tooltip line of every data-bearing indicator.
pub const TOOLTIP_HEADER: &str = "AI Usage Details";

/// Tooltip shown when no provider is enabled.
pub const DISABLED_TOOLTIP: &str = "All providers disabled.";

// ============================================================================
// Indicator
// ============================================================================

/// Icon state of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorIcon {
    /// Live data.
    #[default]
    Pulse,
    /// The fetch failed or no provider produced data.
    Error,
    /// No provider is enabled.
    Disabled,
}

impl IndicatorIcon {
    /// Host icon reference (`$(name)` syntax).
    pub fn codicon(self) -> &'static str {
        match self {
            Self::Pulse => "$(pulse)",
            Self::Error => "$(error)",
            Self::Disabled => "$(circle-slash)",
        }
    }
}

/// Addresses one indicator owned by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "slot", content = "provider")]
pub enum IndicatorSlot {
    /// The single combined indicator.
    Combined,
    /// A per-provider indicator.
    Provider(ProviderId),
    /// The per-provider mode fallback.
    Fallback,
}

impl fmt::Display for IndicatorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combined => f.write_str("combined"),
            Self::Provider(id) => write!(f, "{id}"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// State of one indicator, as handed to the host UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    /// Short label (`AI`, or the provider's display name).
    pub label: String,
    /// Value text (`42%|10%`, `$12.50`, `Off`, `Err`, `N/A`).
    pub text: String,
    /// Multi-line tooltip.
    pub tooltip: String,
    /// Color tier.
    pub tier: ColorTier,
    /// Icon state.
    pub icon: IndicatorIcon,
    /// Whether the host should show it.
    pub visible: bool,
}

impl Indicator {
    /// A hidden, empty indicator.
    pub fn hidden(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: String::new(),
            tooltip: String::new(),
            tier: ColorTier::Normal,
            icon: IndicatorIcon::Pulse,
            visible: false,
        }
    }

    fn fallback(text: &str, tooltip: String, icon: IndicatorIcon) -> Self {
        Self {
            label: COMBINED_LABEL.to_string(),
            text: text.to_string(),
            tooltip,
            tier: ColorTier::Normal,
            icon,
            visible: true,
        }
    }

    /// Status-bar text: `$(pulse) AI: 42%|10%`.
    pub fn status_text(&self) -> String {
        format!("{} {}: {}", self.icon.codicon(), self.label, self.text)
    }

    /// Host theme color key for the tier.
    pub fn theme_color(&self) -> Option<&'static str> {
        self.tier.theme_color()
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

/// Value text for a reading: `42%|10%` (secondary omitted when 0) or `$12.50`.
pub fn reading_text(peak: &PeakReading) -> String {
    match (peak.primary, peak.balance_usd) {
        (Some(primary), _) => {
            let mut text = format_percent(primary);
            if let Some(secondary) = peak.secondary.filter(|s| *s > 0.0) {
                text.push('|');
                text.push_str(&format_percent(secondary));
            }
            text
        }
        (None, Some(balance)) => format_usd(balance),
        (None, None) => "n/a".to_string(),
    }
}

// ============================================================================
// Render Sink
// ============================================================================

/// Owns all indicators and applies snapshots to them.
pub struct RenderSink {
    mode: DisplayMode,
    combined: Indicator,
    providers: BTreeMap<ProviderId, Indicator>,
    fallback: Indicator,
    last: Option<AggregateSnapshot>,
    notify: watch::Sender<u64>,
    renders: u64,
}

impl RenderSink {
    /// Creates a sink with every indicator hidden.
    pub fn new(mode: DisplayMode) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            mode,
            combined: Indicator::hidden(COMBINED_LABEL),
            providers: ProviderId::all()
                .iter()
                .map(|id| (*id, Indicator::hidden(id.display_name())))
                .collect(),
            fallback: Indicator::hidden(COMBINED_LABEL),
            last: None,
            notify,
            renders: 0,
        }
    }

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switches the display mode, re-rendering the last snapshot if any.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if let Some(snapshot) = self.last.take() {
            self.render(&snapshot);
        }
    }

    /// Renders a snapshot in a given mode.
    pub fn render_as(&mut self, mode: DisplayMode, snapshot: &AggregateSnapshot) {
        self.mode = mode;
        self.render(snapshot);
    }

    /// Renders a snapshot in the current mode. Every slot is rewritten.
    pub fn render(&mut self, snapshot: &AggregateSnapshot) {
        match self.mode {
            DisplayMode::Single => self.render_single(snapshot),
            DisplayMode::PerProvider => self.render_per_provider(snapshot),
        }

        self.last = Some(snapshot.clone());
        self.renders += 1;
        let _ = self.notify.send(self.renders);

        debug!(
            mode = %self.mode,
            status = ?snapshot.status,
            visible = self.visible().len(),
            "Rendered snapshot"
        );
    }

    fn render_single(&mut self, snapshot: &AggregateSnapshot) {
        for indicator in self.providers.values_mut() {
            indicator.hide();
        }
        self.fallback.hide();

        self.combined = match snapshot.combined_peak() {
            Some(peak) if snapshot.status.is_ready() => Indicator {
                label: COMBINED_LABEL.to_string(),
                text: reading_text(peak),
                tooltip: data_tooltip(snapshot.tooltip_lines()),
                tier: peak.tier,
                icon: IndicatorIcon::Pulse,
                visible: true,
            },
            _ => fallback_for(snapshot),
        };
    }

    fn render_per_provider(&mut self, snapshot: &AggregateSnapshot) {
        self.combined.hide();

        let mut any_visible = false;
        for (id, indicator) in &mut self.providers {
            let reading = snapshot
                .metrics
                .get(id)
                .zip(snapshot.peak(*id))
                .filter(|_| snapshot.enabled.contains(id));

            *indicator = match reading {
                Some((metric, peak)) => {
                    any_visible = true;
                    Indicator {
                        label: id.display_name().to_string(),
                        text: reading_text(peak),
                        tooltip: data_tooltip(metric.tooltip_lines.iter().map(String::as_str)),
                        tier: peak.tier,
                        icon: IndicatorIcon::Pulse,
                        visible: true,
                    }
                }
                None => Indicator::hidden(id.display_name()),
            };
        }

        self.fallback = if any_visible {
            Indicator::hidden(COMBINED_LABEL)
        } else {
            fallback_for(snapshot)
        };
    }

    /// Visible indicators in display order (combined, providers by priority, fallback).
    pub fn visible(&self) -> Vec<(IndicatorSlot, &Indicator)> {
        self.slots()
            .into_iter()
            .filter(|(_, indicator)| indicator.visible)
            .collect()
    }

    /// Every indicator in display order, hidden ones included.
    pub fn slots(&self) -> Vec<(IndicatorSlot, &Indicator)> {
        let mut slots = Vec::with_capacity(self.providers.len() + 2);
        slots.push((IndicatorSlot::Combined, &self.combined));
        slots.extend(
            self.providers
                .iter()
                .map(|(id, indicator)| (IndicatorSlot::Provider(*id), indicator)),
        );
        slots.push((IndicatorSlot::Fallback, &self.fallback));
        slots
    }

    /// Gets one indicator.
    pub fn indicator(&self, slot: IndicatorSlot) -> Option<&Indicator> {
        match slot {
            IndicatorSlot::Combined => Some(&self.combined),
            IndicatorSlot::Provider(id) => self.providers.get(&id),
            IndicatorSlot::Fallback => Some(&self.fallback),
        }
    }

    /// The last rendered snapshot.
    pub fn last_snapshot(&self) -> Option<&AggregateSnapshot> {
        self.last.as_ref()
    }

    /// Number of completed renders.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Subscribes to renders; the value is the render count.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }
}

fn data_tooltip<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    std::iter::once(TOOLTIP_HEADER)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The indicator shown when there is nothing to display.
fn fallback_for(snapshot: &AggregateSnapshot) -> Indicator {
    match &snapshot.status {
        SnapshotStatus::Disabled => {
            Indicator::fallback("Off", DISABLED_TOOLTIP.to_string(), IndicatorIcon::Disabled)
        }
        SnapshotStatus::Failed(message) => Indicator::fallback(
            "Err",
            format!("{TOOLTIP_HEADER}\nFetch failed: {message}"),
            IndicatorIcon::Error,
        ),
        SnapshotStatus::NoData | SnapshotStatus::Ready => {
            let reasons: Vec<String> = snapshot
                .unavailable
                .iter()
                .map(|(id, reason)| format!("- {}: {}", id.display_name(), reason.describe()))
                .collect();
            Indicator::fallback(
                "N/A",
                data_tooltip(reasons.iter().map(String::as_str)),
                IndicatorIcon::Error,
            )
        }
    }
}
