use crossbeam_channel::Receiver;
use quakemap::{
    runtime::{spawn_load, LoadHandle},
    HttpFeedSource, OverlayEvent, QuakeMap, QuakeMapConfig, QuakeMapWidget,
};
use std::time::Duration;

/// Standalone earthquake map viewer
fn main() -> anyhow::Result<()> {
    quakemap::init_logging();

    let config = QuakeMapConfig::from_env()?;
    log::info!("loading {}", config.earthquake_feed_url());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquakes"),
        ..Default::default()
    };

    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(move |_cc| Box::new(QuakeMapApp::new(config))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

struct QuakeMapApp {
    config: QuakeMapConfig,
    widget: QuakeMapWidget,
    events: Receiver<OverlayEvent>,
    loading: Option<LoadHandle>,
    map: Option<QuakeMap>,
}

impl QuakeMapApp {
    fn new(config: QuakeMapConfig) -> Self {
        let widget = QuakeMapWidget::new(&config);
        let events = widget.events();
        let loading = Some(spawn_load(
            HttpFeedSource::from_config(&config),
            config.clone(),
        ));

        Self {
            config,
            widget,
            events,
            loading,
            map: None,
        }
    }

    fn poll_load(&mut self, ctx: &egui::Context) {
        let Some(result) = self.loading.as_ref().and_then(LoadHandle::try_take) else {
            if self.loading.is_some() {
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            return;
        };
        self.loading = None;

        match result {
            Ok(mut map) => {
                map.mount(&mut self.widget);
                self.map = Some(map);
            }
            Err(e) => QuakeMap::mount_error(&mut self.widget, &self.config.tile_layer(), &e),
        }
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match &self.map {
                Some(map) => {
                    let [min, _, max] = map.scale().domain();
                    ui.label(format!(
                        "{} events, magnitude {:.1} to {:.1}",
                        map.registry()
                            .get(quakemap::constants::EARTHQUAKES_OVERLAY)
                            .map_or(0, |layer| layer.len()),
                        min,
                        max
                    ));
                }
                None if self.loading.is_some() => {
                    ui.spinner();
                    ui.label("Loading earthquake feed...");
                }
                None => {
                    ui.label("No data");
                }
            }

            if ui.button("Fit to data").clicked() {
                self.widget.fit_visible();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let viewport = self.widget.viewport();
                ui.label(format!(
                    "Center: {:.4}, {:.4} | Zoom: {:.2}",
                    viewport.center.lat, viewport.center.lng, viewport.zoom
                ));
            });
        });
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.add(&mut self.widget);
            });

        if let Some(map) = &mut self.map {
            // Legend changes from this frame's clicks need another frame to show
            if map.drain_events(&mut self.events, &mut self.widget) > 0 {
                ctx.request_repaint();
            }
        }
    }
}
