use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use egui::{Context, RichText, TopBottomPanel};

use aw_core::Resource;
use aw_data::SnapshotCache;

use crate::theme;

/// Request raised from the menu bar, handled by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    RefreshNow,
    ResetLayout,
    ToggleTheme,
    Quit,
}

/// How recent the last snapshot of a resource is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing received yet
    Pending,
    Fresh,
    /// Older than three poll periods
    Stale,
}

pub fn freshness(last: Option<DateTime<Utc>>, now: DateTime<Utc>, poll_interval: Duration) -> Freshness {
    let Some(last) = last else {
        return Freshness::Pending;
    };
    let age = (now - last).to_std().unwrap_or(Duration::ZERO);
    if age > poll_interval * 3 {
        Freshness::Stale
    } else {
        Freshness::Fresh
    }
}

/// What the status bar shows
pub struct StatusInfo<'a> {
    pub source_name: &'a str,
    pub poll_interval: Duration,
    pub cache: &'a SnapshotCache,
}

/// Render the main menu bar
pub fn menu_bar(ctx: &Context, dark_mode: bool) -> Option<ShellAction> {
    let mut action = None;

    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("Dashboard", |ui| {
                if ui.button("Refresh now").clicked() {
                    action = Some(ShellAction::RefreshNow);
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Quit").clicked() {
                    action = Some(ShellAction::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset layout").clicked() {
                    action = Some(ShellAction::ResetLayout);
                    ui.close_menu();
                }

                let label = if dark_mode { "Light theme" } else { "Dark theme" };
                if ui.button(label).clicked() {
                    action = Some(ShellAction::ToggleTheme);
                    ui.close_menu();
                }
            });
        });
    });

    action
}

/// Render the status bar with per-resource update times
pub fn status_bar(ctx: &Context, info: &StatusInfo<'_>) {
    let now = Utc::now();

    TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Source: {}", info.source_name));
            ui.separator();
            ui.label(format!("Every {}", humantime::format_duration(info.poll_interval)));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for resource in Resource::ALL.iter().rev() {
                    let last = info.cache.last_updated(*resource);
                    let (text, color) = match freshness(last, now, info.poll_interval) {
                        Freshness::Pending => (format!("{}: waiting", resource), theme::pending_color()),
                        state => {
                            let time = last
                                .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                                .unwrap_or_default();
                            let color = if state == Freshness::Stale {
                                theme::stale_color()
                            } else {
                                theme::fresh_color()
                            };
                            (format!("{}: {}", resource, time), color)
                        }
                    };
                    ui.label(RichText::new(text).small().color(color));
                    ui.separator();
                }
            });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_freshness() {
        let interval = Duration::from_secs(5);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 30).unwrap();

        assert_eq!(freshness(None, now, interval), Freshness::Pending);

        let recent = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 26).unwrap();
        assert_eq!(freshness(Some(recent), now, interval), Freshness::Fresh);

        let old = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(freshness(Some(old), now, interval), Freshness::Stale);

        // Clock skew puts the snapshot in the future
        let ahead = Utc.with_ymd_and_hms(2024, 5, 1, 10, 1, 0).unwrap();
        assert_eq!(freshness(Some(ahead), now, interval), Freshness::Fresh);
    }
}
