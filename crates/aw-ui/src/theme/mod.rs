use egui::{Context, Visuals, Style, Color32, Rounding, Stroke, FontId, FontFamily, TextStyle};
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Operations Dark".to_string(),
            dark_mode: true,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Operations Light".to_string(),
            dark_mode: false,
        }
    }

    /// The other variant
    pub fn toggled(&self) -> Self {
        if self.dark_mode {
            Self::light()
        } else {
            Self::dark()
        }
    }
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    if theme.dark_mode {
        let panel_bg = Color32::from_rgb(24, 27, 33);
        let widget_bg = Color32::from_rgb(36, 40, 48);
        let text_color = Color32::from_rgb(222, 226, 232);

        visuals.window_fill = panel_bg;
        visuals.panel_fill = panel_bg;
        visuals.extreme_bg_color = Color32::from_rgb(16, 18, 22);
        visuals.faint_bg_color = widget_bg;

        visuals.widgets.noninteractive.bg_fill = widget_bg;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.inactive.bg_fill = widget_bg;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(48, 54, 64);
        visuals.widgets.active.bg_fill = Color32::from_rgb(58, 64, 76);
        visuals.code_bg_color = Color32::from_rgb(32, 35, 42);
    }

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());

    // Selection and links
    visuals.selection.bg_fill = accent_color().linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = accent_color();

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);

    // Font sizes
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
    tracing::debug!("Applied theme '{}'", theme.name);
}

/// Accent used for links and selection
pub fn accent_color() -> Color32 {
    Color32::from_rgb(59, 130, 246)
}

/// Resource updated within the expected window
pub fn fresh_color() -> Color32 {
    Color32::from_rgb(80, 200, 120)
}

/// Resource overdue
pub fn stale_color() -> Color32 {
    Color32::from_rgb(230, 180, 80)
}

/// Resource never received
pub fn pending_color() -> Color32 {
    Color32::from_rgb(150, 150, 150)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_mode() {
        let theme = Theme::default();
        assert!(theme.dark_mode);
        assert!(!theme.toggled().dark_mode);
        assert_eq!(theme.toggled().toggled(), theme);
    }
}
