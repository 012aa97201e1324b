use crate::config::Config;
use crate::device_camera::interface::FrameSource;
use crate::device_orientation::impl_fake::OrientationSensorFake;
use crate::device_orientation::interface::{DeviceOrientation, OrientationSensor};
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::scene::anchor::{Anchor, FontWeight, TextAlignment};
use crate::scene::impl_memory::Scene;
use crate::scene::interface::RenderSurface;
use crate::tap_coordinator::main::TapCoordinator;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Scene units are meters; this maps them onto screen points.
const POINTS_PER_METER: f32 = 1200.0;

/// Where a horizontal plane sits in the view, as a fraction of the height.
const PLANE_HEIGHT_FRACTION: f32 = 0.66;

struct ArView {
    scene: Rc<RefCell<Scene>>,
    coordinator: TapCoordinator,
    frame_source: Arc<dyn FrameSource + Send + Sync>,
    orientation_sensor: Arc<OrientationSensorFake>,
    texture: Option<egui::TextureHandle>,
    shown_frame: Option<u64>,
    repaint_interval: Duration,
}

impl ArView {
    fn update_texture(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.frame_source.current_frame() else {
            return;
        };
        if self.shown_frame == Some(frame.id) && self.texture.is_some() {
            return;
        }

        let rgba = frame.image.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::default()),
            None => {
                self.texture = Some(ctx.load_texture(
                    "camera-feed",
                    image,
                    egui::TextureOptions::default(),
                ))
            }
        }
        self.shown_frame = Some(frame.id);
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut orientation = self.orientation_sensor.orientation();
            egui::ComboBox::from_label("Device orientation")
                .selected_text(orientation.display_name())
                .show_ui(ui, |ui| {
                    for option in DeviceOrientation::ALL {
                        ui.selectable_value(&mut orientation, option, option.display_name());
                    }
                });
            self.orientation_sensor.set(orientation);

            ui.separator();
            let state = self.coordinator.state();
            ui.label(format!("{:?}", state.phase));
            if state.in_flight > 0 {
                ui.spinner();
            }
        });
    }

    fn feed(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click());
        let painter = ui.painter_at(rect);

        match &self.texture {
            Some(texture) => {
                let image_rect = fit_rect(texture.size_vec2(), rect);
                painter.rect_filled(rect, 0.0, egui::Color32::BLACK);
                painter.image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(rect, 0.0, egui::Color32::from_gray(20));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Waiting for tracking...",
                    egui::FontId::proportional(18.0),
                    egui::Color32::GRAY,
                );
            }
        }

        for anchor in self.scene.borrow().anchors() {
            draw_anchor(&painter, rect, anchor);
        }

        if response.clicked() {
            self.coordinator.on_tap();
        }
    }
}

fn fit_rect(image_size: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    egui::Rect::from_center_size(bounds.center(), image_size * scale)
}

fn text_anchor(alignment: TextAlignment) -> egui::Align2 {
    match alignment {
        TextAlignment::Center => egui::Align2::CENTER_CENTER,
    }
}

fn draw_anchor(painter: &egui::Painter, rect: egui::Rect, anchor: &Anchor) {
    let plane = egui::pos2(
        rect.center().x,
        rect.top() + rect.height() * PLANE_HEIGHT_FRACTION,
    );

    for child in &anchor.children {
        let [x, y, z] = child.position;
        // Negative z is toward the viewer, which is down the screen
        let position = plane + egui::vec2(x, -y - z) * POINTS_PER_METER;
        let size = child.mesh.font_size * POINTS_PER_METER;
        let font = egui::FontId::proportional(size);
        let align = text_anchor(child.mesh.alignment);
        let color = {
            let [r, g, b] = child.material.color;
            egui::Color32::from_rgb(r, g, b)
        };

        let extrusion = (child.mesh.extrusion_depth * POINTS_PER_METER).max(1.0);
        painter.text(
            position + egui::vec2(extrusion, extrusion),
            align,
            &child.mesh.text,
            font.clone(),
            egui::Color32::from_black_alpha(160),
        );
        match child.mesh.font_weight {
            // Second pass half a point over thickens the strokes
            FontWeight::Bold => {
                painter.text(
                    position + egui::vec2(0.5, 0.0),
                    align,
                    &child.mesh.text,
                    font.clone(),
                    color,
                );
            }
        }
        painter.text(position, align, &child.mesh.text, font, color);
    }
}

impl eframe::App for ArView {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.coordinator.pump();
        self.update_texture(ctx);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.feed(ui));

        ctx.request_repaint_after(self.repaint_interval);
    }
}

/// Opens the window and blocks until it is closed. Must run on the main thread.
pub fn run(
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    frame_source: Arc<dyn FrameSource + Send + Sync>,
    orientation_sensor: Arc<OrientationSensorFake>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let scene = Rc::new(RefCell::new(Scene::new()));
    let surface: Rc<RefCell<dyn RenderSurface>> = scene.clone();

    let coordinator = TapCoordinator::new(
        config.clone(),
        logger.clone(),
        Rc::downgrade(&surface),
        frame_source.clone(),
        orientation_sensor.clone(),
        image_classifier,
    )?;

    let view = ArView {
        scene,
        coordinator,
        frame_source,
        orientation_sensor,
        texture: None,
        shown_frame: None,
        repaint_interval: config.repaint_interval,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 640.0]),
        ..Default::default()
    };

    logger.info("Opening AR view")?;
    eframe::run_native("Classify Items AR", options, Box::new(|_cc| Box::new(view)))
        .map_err(|e| e.to_string())?;

    Ok(())
}
