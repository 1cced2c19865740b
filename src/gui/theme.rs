//! Theme and styling for the GUI
//!
//! Provides the AppTheme struct with colors, spacing, and styled widget factories.

use eframe::egui;

#[derive(Clone, Copy)]
pub struct AppTheme {
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub surface_hover: egui::Color32,
    pub surface_active: egui::Color32,
    pub panel_fill: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    pub primary: egui::Color32,
    pub secondary: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,
    pub link: egui::Color32,

    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,

    pub button_medium: egui::Vec2,
    pub button_hold: egui::Vec2,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // Dark terminal palette with amber accents
            background: egui::Color32::from_rgb(10, 10, 12),
            surface: egui::Color32::from_rgb(18, 18, 22),
            surface_hover: egui::Color32::from_rgb(28, 28, 34),
            surface_active: egui::Color32::from_rgb(40, 40, 48),
            panel_fill: egui::Color32::from_rgb(14, 14, 17),
            text_primary: egui::Color32::from_rgb(255, 184, 64),
            text_secondary: egui::Color32::from_rgb(160, 160, 160),

            primary: egui::Color32::from_rgb(255, 184, 64),
            secondary: egui::Color32::from_rgb(70, 70, 78),
            success: egui::Color32::from_rgb(0, 221, 119),
            warning: egui::Color32::from_rgb(255, 214, 10),
            error: egui::Color32::from_rgb(255, 85, 85),
            link: egui::Color32::from_rgb(0, 190, 210),

            spacing_xs: 4.0,
            spacing_sm: 10.0,
            spacing_md: 18.0,
            spacing_lg: 26.0,

            button_medium: egui::vec2(140.0, 34.0),
            button_hold: egui::vec2(320.0, 64.0),
        }
    }
}

impl AppTheme {
    pub fn button_primary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary).strong())
            .fill(self.surface)
            .stroke(egui::Stroke::new(2.0, self.primary))
            .min_size(self.button_medium)
    }

    /// Large press-and-hold button; senses drags so the press survives pointer motion
    pub fn button_hold(&self, text: &str, holding: bool) -> egui::Button<'_> {
        let (fill, stroke) = if holding {
            (self.surface_active, self.success)
        } else {
            (self.surface, self.primary)
        };
        egui::Button::new(egui::RichText::new(text).size(18.0).color(self.text_primary).strong())
            .fill(fill)
            .stroke(egui::Stroke::new(3.0, stroke))
            .min_size(self.button_hold)
            .sense(egui::Sense::click_and_drag())
    }

    pub fn frame_panel(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.panel_fill)
            .rounding(2.0)
            .inner_margin(self.spacing_md)
            .stroke(egui::Stroke::new(1.0, self.primary))
    }

    pub fn frame_error(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(egui::Color32::from_rgb(40, 12, 12))
            .rounding(2.0)
            .inner_margin(self.spacing_sm)
            .stroke(egui::Stroke::new(2.0, self.error))
    }

    /// Section header with ASCII styling
    pub fn section_header_text(&self, icon: &str, title: &str) -> String {
        format!("  {} {}", icon, title)
    }
}

/// Configure the egui context style with the given theme
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = theme.background;
    visuals.panel_fill = theme.panel_fill;
    visuals.override_text_color = Some(theme.text_primary);

    visuals.widgets.noninteractive.bg_fill = theme.surface;
    visuals.widgets.inactive.bg_fill = theme.surface;
    visuals.widgets.hovered.bg_fill = theme.surface_hover;
    visuals.widgets.active.bg_fill = theme.surface_active;

    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, theme.secondary);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(2.0, theme.primary);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(2.0, theme.primary);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);

    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::new(20.0, egui::FontFamily::Monospace),
    );
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::new(14.0, egui::FontFamily::Monospace),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::new(14.0, egui::FontFamily::Monospace),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        egui::FontId::new(12.0, egui::FontFamily::Monospace),
    );

    ctx.set_style(style);
}
