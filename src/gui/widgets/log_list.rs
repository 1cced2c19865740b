//! Scrollable list of transfer log entries

use crate::gui::helpers::{format_timestamp, status_color, status_glyph};
use crate::gui::theme::AppTheme;
use crate::log_store::{LogEntry, LogStore};
use crate::utils;
use eframe::egui::{self, RichText};
use tracing::warn;

/// Renders a `LogStore` newest first, with a per-status summary line
pub struct LogList<'a> {
    store: &'a LogStore,
    theme: &'a AppTheme,
}

impl<'a> LogList<'a> {
    pub fn new(store: &'a LogStore, theme: &'a AppTheme) -> Self {
        Self { store, theme }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let stats = self.store.statistics();
        ui.label(RichText::new(stats.summary()).size(12.0).color(self.theme.text_secondary));
        ui.add_space(self.theme.spacing_xs);

        egui::ScrollArea::vertical()
            .id_source("transfer_log")
            .auto_shrink([false, true])
            .max_height(360.0)
            .show(ui, |ui| {
                if self.store.is_empty() {
                    ui.label(
                        RichText::new("No transfers yet. Hold the button to start sending.")
                            .color(self.theme.text_secondary),
                    );
                    return;
                }
                for entry in self.store.iter() {
                    self.render_entry(ui, entry);
                    ui.add_space(self.theme.spacing_xs);
                }
            });
    }

    fn render_entry(&self, ui: &mut egui::Ui, entry: &LogEntry) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(status_glyph(entry.status))
                        .color(status_color(entry.status, self.theme))
                        .strong(),
                );
                ui.label(RichText::new(entry.id.to_string()).size(11.0).color(self.theme.text_secondary));
                ui.label(utils::short_address(&entry.recipient));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format_timestamp(&entry.timestamp))
                            .size(11.0)
                            .color(self.theme.text_secondary),
                    );
                    if let Some(tx_hash) = &entry.tx_hash {
                        let url = utils::tx_explorer_url(tx_hash);
                        if ui
                            .link(RichText::new("[View on Etherscan]").color(self.theme.link))
                            .on_hover_text(&url)
                            .clicked()
                        {
                            if let Err(e) = open::that(&url) {
                                warn!("Failed to open {}: {}", url, e);
                            }
                        }
                    }
                });
            });
            ui.label(
                RichText::new(&entry.message)
                    .size(12.0)
                    .color(status_color(entry.status, self.theme)),
            );
        });
    }
}
