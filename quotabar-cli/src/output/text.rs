//! Text output formatting with progress bars and tier colors.

use quotabar_app::Indicator;
use quotabar_app::render::DISABLED_TOOLTIP;
use quotabar_core::{
    AggregateSnapshot, ColorTier, NormalizedMetric, ProviderId, SnapshotStatus, Unavailable,
    format_percent, format_usd,
};
use quotabar_providers::{ProviderDescriptor, ProviderRegistry};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Formats every enabled provider of a snapshot, in priority order.
    pub fn format_snapshot(&self, snapshot: &AggregateSnapshot) -> String {
        match &snapshot.status {
            SnapshotStatus::Disabled => return self.dim(DISABLED_TOOLTIP),
            SnapshotStatus::Failed(message) => return self.format_error("Fetch", message),
            SnapshotStatus::NoData | SnapshotStatus::Ready => {}
        }

        snapshot
            .enabled
            .iter()
            .map(|id| match (snapshot.metrics.get(id), snapshot.unavailable.get(id)) {
                (Some(metric), _) => self.format_metric(metric, ProviderRegistry::get(*id)),
                (None, Some(reason)) => self.format_unavailable(*id, reason),
                (None, None) => self.format_unavailable(*id, &Unavailable::Missing),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Formats one provider's metric.
    ///
    /// The first tooltip line is the header; percentages get a bar each;
    /// remaining tooltip lines (per-model details) follow dimmed.
    pub fn format_metric(&self, metric: &NormalizedMetric, desc: Option<&ProviderDescriptor>) -> String {
        let mut lines = Vec::new();

        let tier = ColorTier::from_peak(metric.peak_percent());
        let header = metric
            .tooltip_lines
            .first()
            .map_or(metric.provider.display_name(), |l| l.trim_start_matches("- "));
        lines.push(self.bold(&self.color_for_tier(tier, header)));

        let primary_label = desc.map_or("Primary", |d| d.primary_label);
        let secondary_label = desc.and_then(|d| d.secondary_label).unwrap_or("Secondary");

        if let Some(primary) = metric.primary_percent {
            lines.push(self.format_window(primary, primary_label));
        }
        if let Some(secondary) = metric.secondary_percent {
            lines.push(self.format_window(secondary, secondary_label));
        }
        if let Some(balance) = metric.balance_usd {
            lines.push(format!("  {:<8} {}", "Balance:", self.green(&format_usd(balance))));
        }

        for detail in metric.tooltip_lines.iter().skip(1) {
            lines.push(self.dim(detail));
        }

        lines.join("\n")
    }

    /// Formats a usage percentage with a progress bar.
    fn format_window(&self, percent: f64, label: &str) -> String {
        let bar = self.progress_bar(percent);
        let pct = self.color_for_tier(
            ColorTier::from_percent(percent),
            &format!("{} used", format_percent(percent)),
        );
        format!("  {:<8} {} {}", format!("{label}:"), bar, pct)
    }

    /// Formats a progress bar filled to the used percentage.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn progress_bar(&self, percent_used: f64) -> String {
        let ratio = (percent_used / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_tier(ColorTier::from_percent(percent_used), &bar)
    }

    /// Formats a provider without data.
    pub fn format_unavailable(&self, provider: ProviderId, reason: &Unavailable) -> String {
        match reason {
            Unavailable::Missing => format!(
                "{}: {}",
                self.bold(provider.display_name()),
                self.dim("no data")
            ),
            Unavailable::Error(_) => self.format_error(provider.display_name(), &reason.describe()),
        }
    }

    /// Formats an indicator as it would appear in a status bar.
    pub fn format_indicator(&self, indicator: &Indicator) -> String {
        self.color_for_tier(indicator.tier, &indicator.status_text())
    }

    /// Formats provider list header.
    pub fn format_providers_header(&self) -> String {
        format!(
            "{:<12} {:<12} {:<8} {}",
            self.bold("Provider"),
            self.bold("CLI"),
            self.bold("Enabled"),
            self.bold("Description")
        )
    }

    /// Formats a single provider line.
    pub fn format_provider_line(&self, desc: &ProviderDescriptor, enabled: bool) -> String {
        let enabled_str = if enabled {
            self.green("✓")
        } else {
            self.dim("−")
        };

        format!(
            "{:<12} {:<12} {:<8} {}",
            desc.display_name(),
            desc.cli_name(),
            enabled_str,
            desc.description
        )
    }

    /// Formats an error message.
    pub fn format_error(&self, what: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(what), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_tier(&self, tier: ColorTier, text: &str) -> String {
        match tier {
            ColorTier::Normal => self.green(text),
            ColorTier::Warning => self.yellow(text),
            ColorTier::Critical => self.red(text),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

// ============================================================================
// Tests
// ============================================================================
