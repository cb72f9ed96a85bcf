use crate::gate::{GateHandle, GateState};

use eframe::egui;
use tokio::sync::watch;

/// Runs the gate screen on the UI thread until the gate finishes or the
/// window is closed. Blocking.
pub fn run_screen(handle: GateHandle) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(320.0, 160.0)),
        resizable: false,
        ..Default::default()
    };
    let _ = eframe::run_native(
        "Connectivity Gate",
        options,
        Box::new(move |_cc| Box::new(GateScreen::new(handle))),
    );
    Ok(())
}

struct GateScreen {
    handle: GateHandle,
    state_rx: watch::Receiver<GateState>,
}

impl GateScreen {
    fn new(handle: GateHandle) -> Self {
        let state_rx = handle.state();
        GateScreen { handle, state_rx }
    }
}

impl eframe::App for GateScreen {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let state = *self.state_rx.borrow_and_update();

        // White while checking, red on failure.
        let (background, text_color, message) = match state {
            GateState::Checking => (
                egui::Color32::WHITE,
                egui::Color32::BLACK,
                "Checking connection...",
            ),
            GateState::Failed => (
                egui::Color32::RED,
                egui::Color32::WHITE,
                "No connection, retrying soon",
            ),
            GateState::Succeeded => (egui::Color32::WHITE, egui::Color32::BLACK, "Connected"),
        };

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(background))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(text_color, message);
                });
            });

        // The driver exits right after hand-off; close the screen with it.
        if self.handle.is_finished() {
            frame.close();
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }

    fn on_close_event(&mut self) -> bool {
        self.handle.teardown();
        true
    }
}
