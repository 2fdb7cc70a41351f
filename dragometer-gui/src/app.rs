use crate::plotter::rendering::render_plot;
use crate::screenshot::export_screenshots;
use crate::GuiConfig;
use dragometer_core::{DispatchPump, PlotRegistry};
use eframe::egui;

pub(crate) struct DashboardApp {
    registry: PlotRegistry,
    pump: DispatchPump,
    config: GuiConfig,
    status: String,
    producer_finished: bool,
    failed_dispatches: usize,
}

impl DashboardApp {
    pub(crate) fn new(config: GuiConfig, pump: DispatchPump) -> Self {
        Self {
            registry: PlotRegistry::with_padding(config.padding),
            pump,
            config,
            status: "Waiting for the producer".to_string(),
            producer_finished: false,
            failed_dispatches: 0,
        }
    }

    /// Applies queued dispatches; returns true when the per-frame limit was hit.
    fn pump_dispatches(&mut self) -> bool {
        let limit = self.config.max_dispatches_per_frame;
        let report = self.pump.drain(&mut self.registry, limit);
        self.failed_dispatches += report.failed;
        if report.producer_gone && !self.producer_finished {
            self.producer_finished = true;
            self.status = "Producer finished".to_string();
        }
        report.applied + report.failed >= limit
    }

    fn take_screenshots(&mut self) {
        let dir = &self.config.screenshot_dir;
        let report = export_screenshots(&self.registry, dir, self.config.screenshot_size);
        self.status = report.summary(dir);
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let button = ui.add_enabled(
                !self.registry.is_empty(),
                egui::Button::new("Save screenshots"),
            );
            if button.clicked() {
                self.take_screenshots();
            }
            ui.separator();
            ui.label(format!("{} plot(s)", self.registry.len()));
            if self.failed_dispatches > 0 {
                ui.separator();
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    format!("{} failed update(s), see log", self.failed_dispatches),
                );
            }
            let dropped = self.pump.dropped_count();
            if dropped > 0 {
                ui.separator();
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    format!("{dropped} update(s) dropped"),
                );
            }
            ui.separator();
            ui.label(&self.status);
        });
    }

    fn plots(&self, ui: &mut egui::Ui) {
        if self.registry.is_empty() {
            ui.label("No plots yet.");
            return;
        }
        for plot in self.registry.iter() {
            ui.push_id(plot.id(), |ui| {
                render_plot(ui, plot, self.config.plot_width, self.config.plot_height);
            });
            ui.add_space(12.0);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let backlog = self.pump_dispatches();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.plots(ui));
        });

        if backlog {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.config.repaint);
        }
    }
}
