//! Transfer form and the hold-to-send button

use crate::form::RECIPIENT_COUNT;
use crate::gui::app::GuiApp;
use crate::gui::helpers::{hold_button_label, hold_disabled_reason};
use eframe::egui::{self, RichText};

impl GuiApp {
    pub(crate) fn view_transfer(&mut self, ui: &mut egui::Ui) {
        let holding = self.hold.is_holding();
        let editable = self.session.is_some() && !holding;
        let theme = self.theme;

        theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new(theme.section_header_text("[$]", "TRANSFER")).size(16.0).strong());
            ui.add_space(theme.spacing_xs);

            egui::Grid::new("transfer_form")
                .num_columns(2)
                .spacing([theme.spacing_md, theme.spacing_sm])
                .show(ui, |ui| {
                    for index in 0..RECIPIENT_COUNT {
                        ui.label(RichText::new(format!("Recipient {}:", index + 1)).color(theme.text_secondary));
                        if let Some(slot) = self.form.recipient_mut(index) {
                            ui.add_enabled(
                                editable,
                                egui::TextEdit::singleline(slot)
                                    .hint_text("0x...")
                                    .desired_width(420.0),
                            );
                        }
                        ui.end_row();
                    }

                    ui.label(RichText::new("Token contract:").color(theme.text_secondary));
                    ui.add_enabled(
                        editable,
                        egui::TextEdit::singleline(&mut self.form.token_address)
                            .hint_text("0x... (ERC20)")
                            .desired_width(420.0),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Amount:").color(theme.text_secondary));
                    ui.add_enabled(
                        editable,
                        egui::TextEdit::singleline(&mut self.form.amount)
                            .hint_text("per recipient, e.g. 1.5")
                            .desired_width(160.0),
                    );
                    ui.end_row();
                });

            ui.add_space(theme.spacing_md);
            ui.vertical_centered(|ui| self.render_hold_button(ui));
            ui.add_space(theme.spacing_xs);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!(
                        "Sends to every valid recipient now and every {} ms while held",
                        self.config.hold_interval_ms
                    ))
                    .size(11.0)
                    .color(theme.text_secondary),
                );
            });
        });
    }

    /// Press on pointer-down over the button; release on pointer-up or when the pointer leaves it
    fn render_hold_button(&mut self, ui: &mut egui::Ui) {
        let holding = self.hold.is_holding();
        let enabled = holding || self.can_hold();

        let mut response = ui.add_enabled(enabled, self.theme.button_hold(hold_button_label(holding), holding));
        if let Some(reason) = hold_disabled_reason(self.session.is_some(), self.form.is_submittable()) {
            response = response.on_disabled_hover_text(reason);
        }

        let pointer_down = response.is_pointer_button_down_on();
        let inside = ui.rect_contains_pointer(response.rect);

        if pointer_down && !self.hold_pointer_down && inside && !holding && self.can_hold() {
            self.start_hold();
        } else if holding && (!pointer_down || !inside) {
            self.stop_hold();
        }
        self.hold_pointer_down = pointer_down;
    }
}
