//! Wallet connection panel

use crate::gui::app::GuiApp;
use crate::utils;
use eframe::egui::{self, RichText};

impl GuiApp {
    pub(crate) fn view_connection(&mut self, ui: &mut egui::Ui) {
        let mut connect_clicked = false;

        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new(self.theme.section_header_text("[W]", "WALLET")).size(16.0).strong());
            ui.add_space(self.theme.spacing_xs);

            egui::Grid::new("wallet_grid")
                .num_columns(2)
                .spacing([self.theme.spacing_md, self.theme.spacing_xs])
                .show(ui, |ui| {
                    ui.label(RichText::new("Backend:").color(self.theme.text_secondary));
                    ui.label(self.wallet.label());
                    ui.end_row();

                    ui.label(RichText::new("RPC:").color(self.theme.text_secondary));
                    ui.label(RichText::new(&self.config.rpc_url).small());
                    ui.end_row();

                    if let Some(session) = &self.session {
                        ui.label(RichText::new("Account:").color(self.theme.text_secondary));
                        let full = ethers::utils::to_checksum(&session.account, None);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(utils::short_address(&session.account)).color(self.theme.success));
                            if ui.small_button("[C]").on_hover_text("Copy full address").clicked() {
                                ui.output_mut(|o| o.copied_text = full.clone());
                            }
                        });
                        ui.end_row();

                        ui.label(RichText::new("Chain ID:").color(self.theme.text_secondary));
                        ui.label(session.chain_id.to_string());
                        ui.end_row();
                    }
                });

            if self.session.is_none() {
                ui.add_space(self.theme.spacing_sm);
                ui.horizontal(|ui| {
                    let connecting = self.is_connecting();
                    let label = if connecting { "Connecting..." } else { "Connect Wallet" };
                    if ui
                        .add_enabled(!connecting, self.theme.button_primary(label))
                        .clicked()
                    {
                        connect_clicked = true;
                    }
                    if connecting {
                        ui.spinner();
                    }
                });
            }
        });

        if connect_clicked {
            self.start_connect();
        }
    }
}
