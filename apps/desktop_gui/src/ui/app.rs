use std::time::Duration;

use client_core::LookupError;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::protocol::LookupData;
use uuid::Uuid;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::StartupConfig;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::{LookupForm, SettleOutcome},
};
use crate::ui::map::{tiles::TileProvider, BoundaryMap};
use crate::ui::result_card;

const CONTENT_MAX_WIDTH: f32 = 720.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct LookupApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    form: LookupForm,
    map: BoundaryMap,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl LookupApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: &StartupConfig,
    ) -> Self {
        let provider = TileProvider::new(
            startup.tile_url_template.clone(),
            startup.tile_attribution.clone(),
        );
        Self {
            cmd_tx,
            ui_rx,
            form: LookupForm::default(),
            map: BoundaryMap::new(provider),
            status: "Starting...".to_string(),
            status_banner: None,
        }
    }

    fn submit(&mut self) {
        self.map.release();
        let Some(ticket) = self.form.submit() else {
            return;
        };

        tracing::info!(request_id = %ticket.request_id, "submitting address lookup");
        let request_id = ticket.request_id;
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Lookup {
                request_id,
                address: ticket.address,
            },
            &mut self.status,
        );
        if !queued {
            // Nothing will answer this request, so settle it here.
            let detail = self.status.clone();
            self.raise_error(UiError::from_message(UiErrorContext::General, detail.clone()));
            self.apply_settle(request_id, Err(LookupError::transport(detail)));
        }
    }

    fn raise_error(&mut self, err: UiError) {
        self.status = err.banner_text();
        self.status_banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message: self.status.clone(),
        });
    }

    fn clear(&mut self) {
        self.form.clear();
        self.map.release();
    }

    fn apply_settle(&mut self, request_id: Uuid, outcome: Result<LookupData, LookupError>) {
        match self.form.settle(request_id, outcome) {
            SettleOutcome::Applied => {
                let geometry = self
                    .form
                    .result()
                    .and_then(|data| data.district.geometry.as_ref());
                self.map.set_geometry(geometry);
            }
            SettleOutcome::Stale => {
                tracing::debug!(%request_id, "dropping superseded lookup result");
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(
                        context = ?err.context(),
                        category = ?err.category(),
                        "{}",
                        err.message()
                    );
                    self.raise_error(err);
                }
                UiEvent::LookupSettled {
                    request_id,
                    outcome,
                } => self.apply_settle(request_id, outcome),
                UiEvent::TileLoaded { key, image } => self.map.accept_tile(key, image),
                UiEvent::TileFailed { key, reason } => {
                    tracing::warn!(?key, "basemap tile unavailable: {reason}");
                    self.map.reject_tile(key);
                }
            }
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let mut submit_requested = false;
        let mut clear_requested = false;

        ui.horizontal(|ui| {
            let input_width = (ui.available_width() - 170.0).max(160.0);
            let loading = self.form.is_loading();
            let input = ui.add_enabled(
                !loading,
                egui::TextEdit::singleline(self.form.address_mut())
                    .hint_text("Enter your Seattle street address")
                    .desired_width(input_width),
            );
            if input.lost_focus() && ui.input(|state| state.key_pressed(egui::Key::Enter)) {
                submit_requested = !self.form.is_loading();
            }

            let submit = ui.add_enabled(self.form.can_submit(), egui::Button::new("Look up"));
            if submit.clicked() {
                submit_requested = true;
            }

            if self.form.is_loading() {
                ui.spinner();
            }
            if self.form.shows_clear() && ui.button("Clear").clicked() {
                clear_requested = true;
            }
        });

        if submit_requested {
            self.submit();
        } else if clear_requested {
            self.clear();
        }
    }

    fn show_error(&self, ui: &mut egui::Ui) {
        let Some(err) = self.form.error() else {
            return;
        };

        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(253, 236, 234))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(229, 115, 115)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(err.to_string()).color(egui::Color32::from_rgb(140, 29, 24)),
                );
            });
    }

    fn show_result(&mut self, ui: &mut egui::Ui) {
        let Some(data) = self.form.result() else {
            return;
        };
        result_card::show(ui, data);

        if self.map.is_mounted() {
            ui.add_space(10.0);
            let mut dispatch_status = String::new();
            for request in self.map.show(ui) {
                let key = request.key;
                let queued = dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::FetchTile {
                        key,
                        url: request.url,
                    },
                    &mut dispatch_status,
                );
                if !queued {
                    self.map.reject_tile(key);
                }
            }
        }
    }
}

impl eframe::App for LookupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(self.status.as_str());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(CONTENT_MAX_WIDTH);
                    ui.add_space(16.0);
                    ui.heading("Find Your Council Member");
                    ui.weak("Enter an address to see its council district and representatives.");
                    ui.add_space(12.0);
                });

                ui.vertical(|ui| {
                    ui.set_max_width(CONTENT_MAX_WIDTH);
                    self.show_status_banner(ui);
                    self.show_form(ui);
                    ui.add_space(10.0);
                    self.show_error(ui);
                    self.show_result(ui);
                });
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
