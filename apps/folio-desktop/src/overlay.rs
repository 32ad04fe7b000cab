use folio_scene::{OverlayRenderer, ProjectedLabel, Viewport};

/// Keeps the labels resolved by the frame loop and paints them with egui.
#[derive(Debug, Default)]
pub struct LabelOverlay {
    labels: Vec<ProjectedLabel>,
}

impl OverlayRenderer for LabelOverlay {
    type Output = usize;

    fn render_labels(&mut self, labels: &[ProjectedLabel], _viewport: Viewport) -> usize {
        self.labels.clear();
        self.labels.extend_from_slice(labels);
        self.labels.len()
    }
}

impl LabelOverlay {
    /// One non-interactive card per label, centred on its anchor.
    pub fn paint(&self, ctx: &egui::Context) {
        let ppp = ctx.pixels_per_point();
        for (i, label) in self.labels.iter().enumerate() {
            let pos = egui::pos2(label.screen.x / ppp, label.screen.y / ppp);
            egui::Area::new(egui::Id::new(("exhibit_label", i)))
                .fixed_pos(pos)
                .pivot(egui::Align2::CENTER_CENTER)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(260.0);
                        ui.strong(&label.title);
                        ui.label(&label.body);
                    });
                });
        }
    }
}
