//! Main GUI application module
//!
//! Owns all mutable state on the GUI thread. Background work runs on the
//! app's tokio runtime and reports back through channels drained each frame.

use crate::{
    config::Config,
    dispatcher::{DispatchEvent, Dispatcher},
    form::FormState,
    hold::HoldController,
    log_store::LogStore,
    wallet::{self, Session, WalletProvider},
};
use anyhow::{anyhow, Context, Result};
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use super::async_job::AsyncJob;
use super::helpers::connection_label;
use super::notifications::NotificationEntry;
use super::theme::{configure_style, AppTheme};
use super::widgets::LogList;

pub struct GuiApp {
    pub(crate) config: Config,
    pub(crate) theme: AppTheme,
    pub(crate) wallet: Arc<dyn WalletProvider>,
    pub(crate) session: Option<Session>,
    pub(crate) connect_job: Option<AsyncJob<Session>>,
    pub(crate) existing_session_job: Option<AsyncJob<Option<Session>>>,
    pub(crate) form: FormState,
    // Declared before the runtime so the timer is aborted while the runtime is alive
    pub(crate) hold: HoldController,
    pub(crate) hold_pointer_down: bool,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) events: UnboundedReceiver<DispatchEvent>,
    pub(crate) logs: LogStore,
    pub(crate) error: Option<NotificationEntry>,
    pub(crate) runtime: Runtime,
}

impl GuiApp {
    fn new(config: Config, wallet: Arc<dyn WalletProvider>, runtime: Runtime, ctx: &egui::Context) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        let form = FormState::new(
            config.recipients.clone(),
            config.token_address.clone(),
            config.amount.clone(),
        );
        let hold = HoldController::new(Duration::from_millis(config.hold_interval_ms));
        let (dispatcher, events) = Dispatcher::new();

        let mut app = Self {
            config,
            theme,
            wallet,
            session: None,
            connect_job: None,
            existing_session_job: None,
            form,
            hold,
            hold_pointer_down: false,
            dispatcher,
            events,
            logs: LogStore::new(),
            error: None,
            runtime,
        };
        app.check_existing_connection();
        app
    }

    pub(crate) fn spawn_job<T, Fut>(&self, fut: Fut) -> AsyncJob<T>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        AsyncJob::spawn(self.runtime.handle(), fut)
    }

    /// Silent startup check for an already authorized account
    fn check_existing_connection(&mut self) {
        let wallet = self.wallet.clone();
        self.existing_session_job = Some(self.spawn_job(async move { wallet.authorized_session().await }));
    }

    /// User-initiated connect; may prompt on the wallet
    pub(crate) fn start_connect(&mut self) {
        if self.connect_job.is_some() {
            return;
        }
        self.error = None;
        let wallet = self.wallet.clone();
        info!("Requesting accounts from {} wallet", wallet.label());
        self.connect_job = Some(self.spawn_job(async move { wallet.request_accounts().await }));
    }

    pub(crate) fn is_connecting(&self) -> bool {
        self.connect_job.as_ref().is_some_and(AsyncJob::is_running)
            || self.existing_session_job.as_ref().is_some_and(AsyncJob::is_running)
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(NotificationEntry::new(message));
    }

    pub(crate) fn can_hold(&self) -> bool {
        self.session.is_some() && self.form.is_submittable()
    }

    /// Start repeating dispatches. The first tick runs immediately.
    pub(crate) fn start_hold(&mut self) {
        self.error = None;

        // Inputs are locked while holding, so the press-time snapshot stays current
        let dispatcher = self.dispatcher.clone();
        let session = self.session.clone();
        let form = self.form.clone();
        let handle = self.runtime.handle().clone();
        let tick_handle = handle.clone();

        info!("Hold pressed, dispatching every {:?}", self.hold.period());
        self.hold.press(&handle, move || {
            let dispatcher = dispatcher.clone();
            let session = session.clone();
            let form = form.clone();
            tick_handle.spawn(async move {
                // Failures also reach the GUI as DispatchEvent::Error
                if let Err(e) = dispatcher.dispatch(session.as_ref(), &form).await {
                    debug!("Tick skipped: {}", e);
                }
            });
        });
    }

    pub(crate) fn stop_hold(&mut self) {
        if self.hold.is_holding() {
            info!("Hold released");
        }
        self.hold.release();
    }

    fn poll_jobs(&mut self) {
        if let Some(job) = &mut self.existing_session_job {
            if let Some(res) = job.poll() {
                self.existing_session_job = None;
                match res {
                    Ok(Some(session)) => {
                        if self.session.is_none() {
                            info!("Found authorized account {:?}", session.account);
                            self.session = Some(session);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Existing connection check failed: {}", e),
                }
            }
        }

        if let Some(job) = &mut self.connect_job {
            if let Some(res) = job.poll() {
                self.connect_job = None;
                match res {
                    Ok(session) => {
                        info!("Connected {:?} on chain {}", session.account, session.chain_id);
                        self.session = Some(session);
                    }
                    Err(e) => {
                        warn!("Wallet connection failed: {}", e);
                        self.set_error(format!("Failed to connect wallet: {}", e));
                    }
                }
            }
        }

        while let Ok(event) = self.events.try_recv() {
            match event {
                DispatchEvent::Started(entry) => self.logs.push(entry),
                DispatchEvent::Updated { id, update } => {
                    self.logs.apply(id, update);
                }
                DispatchEvent::Error(message) => self.set_error(message),
            }
        }
    }

    fn render_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(error) = &self.error else {
            return;
        };
        let mut dismiss = false;
        self.theme.frame_error().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("[!!]").color(self.theme.error).strong());
                ui.label(RichText::new(&error.message).color(self.theme.error));
                ui.label(
                    RichText::new(format!("({})", error.time_ago()))
                        .size(11.0)
                        .color(self.theme.text_secondary),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("[X]").on_hover_text("Dismiss").clicked() {
                        dismiss = true;
                    }
                });
            });
        });
        if dismiss {
            self.error = None;
        }
        ui.add_space(self.theme.spacing_sm);
    }

    fn render_logs(&self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Transaction Log").size(16.0).strong());
            ui.add_space(self.theme.spacing_xs);
            LogList::new(&self.logs, &self.theme).show(ui);
        });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_jobs();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Holdsend").strong());
                ui.label(
                    RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(12.0)
                        .color(self.theme.text_secondary),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let account = self.session.as_ref().map(|s| &s.account);
                    let chain_id = self.session.as_ref().map(|s| s.chain_id);
                    let color = if account.is_some() {
                        self.theme.success
                    } else {
                        self.theme.text_secondary
                    };
                    ui.label(RichText::new(connection_label(account, chain_id)).color(color));
                });
            });
            ui.add_space(8.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(self.theme.spacing_sm);
                self.render_error_banner(ui);
                self.view_connection(ui);
                ui.add_space(self.theme.spacing_md);
                self.view_transfer(ui);
                ui.add_space(self.theme.spacing_md);
                self.render_logs(ui);
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Build the runtime and wallet backend, then run the native window until it closes
pub fn launch(config: Config) -> Result<()> {
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .thread_name("holdsend-worker")
        .build()
        .context("Failed to create async runtime")?;
    let wallet = wallet::from_config(&config)?;

    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(GuiApp::new(config, wallet, runtime, &cc.egui_ctx)) as Box<dyn App>
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([760.0, 820.0])
        .with_min_inner_size([520.0, 480.0]);

    let native_options = NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Holdsend - Hold-to-Send ERC20 Transfers",
        native_options,
        Box::new(app_creator),
    )
    .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}
