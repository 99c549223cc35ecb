use std::path::PathBuf;

use eframe::egui;
use image::RgbaImage;

use crate::canvas::ViewTransform;
use crate::error::Result;
use crate::export::{self, ClipboardSink};
use crate::geometry::{vector, Rect};
use crate::paint::{self, from_egui_rect, from_pos2, to_egui_rect};
use crate::raster::Rasterizer;
use crate::session::{DrawingSession, EditorRequest, KeyChord, Modifiers, PointerDown};
use crate::shape::{Color4, Tool};

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotatorApp {
    image_path: PathBuf,
    base: RgbaImage,
    texture: Option<egui::TextureHandle>,

    session: DrawingSession,
    rasterizer: Rasterizer,
    clipboard: ClipboardSink,

    // text prompt state
    text_input_buf: String,
    focus_text_input: bool,

    // pan & zoom
    view: ViewTransform,
    fitted: bool,

    status: Option<String>,
}

impl AnnotatorApp {
    pub fn new(image_path: PathBuf, base: RgbaImage, rasterizer: Rasterizer) -> Self {
        let image_size = (base.width() as f32, base.height() as f32);
        Self {
            image_path,
            base,
            texture: None,
            session: DrawingSession::new(),
            rasterizer,
            clipboard: ClipboardSink::default(),
            text_input_buf: String::new(),
            focus_text_input: false,
            view: ViewTransform::new(image_size),
            fitted: false,
            status: None,
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        let size = [self.base.width() as usize, self.base.height() as usize];
        let pixels = self.base.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        self.texture = Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
    }

    fn make_image_for_export(&self) -> Result<RgbaImage> {
        self.rasterizer.flatten(&self.base, self.session.shapes())
    }

    fn handle_request(&mut self, request: EditorRequest) {
        match request {
            EditorRequest::SaveToFile => self.save_image(),
            EditorRequest::CopyToClipboard => self.copy_image(),
        }
    }

    fn save_image(&mut self) {
        let suggested = self
            .image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|stem| format!("{stem}_annotated.png"))
            .unwrap_or_else(|| "annotated.png".to_owned());
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save Image")
            .add_filter("Images", export::SAVE_EXTENSIONS)
            .set_file_name(suggested)
            .save_file()
        else {
            tracing::debug!("save dialog cancelled");
            return;
        };

        let result = self
            .make_image_for_export()
            .and_then(|img| export::save_to_file(&img, &path));
        self.status = Some(match result {
            Ok(written) => format!("Saved {}", written.display()),
            Err(e) => {
                tracing::error!(error = %e, "save failed");
                format!("Save failed: {e}")
            }
        });
    }

    fn copy_image(&mut self) {
        let result = self
            .make_image_for_export()
            .and_then(|img| self.clipboard.copy_image(&img));
        self.status = Some(match result {
            Ok(()) => "Copied to clipboard".to_owned(),
            Err(e) => {
                tracing::error!(error = %e, "copy failed");
                format!("Copy failed: {e}")
            }
        });
    }

    /// Key chords from this frame, in arrival order.
    fn key_chords(ctx: &egui::Context) -> Vec<KeyChord> {
        ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| chord_from_event(event, i.modifiers))
                .collect()
        })
    }

    /// Feeds primary-button presses, moves and releases to the session in scene space.
    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, viewport: Rect) {
        let events: Vec<egui::Event> = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    ..
                } if response.contains_pointer() && viewport.contains(from_pos2(pos)) => {
                    let at = self.view.to_scene(viewport, from_pos2(pos));
                    if let PointerDown::PromptText(_) = self.session.on_pointer_down(at) {
                        self.text_input_buf.clear();
                        self.focus_text_input = true;
                    }
                }
                egui::Event::PointerMoved(pos) if self.session.is_dragging() => {
                    let at = self.view.to_scene(viewport, from_pos2(pos));
                    self.session.on_pointer_move(at);
                }
                egui::Event::PointerButton {
                    button: egui::PointerButton::Primary,
                    pressed: false,
                    ..
                } if self.session.is_dragging() => {
                    self.session.on_pointer_up();
                }
                _ => {}
            }
        }
    }

    fn show_text_prompt(&mut self, ctx: &egui::Context) {
        if self.session.pending_text().is_none() {
            return;
        }
        // Escape cancels; clicks outside the prompt do not.
        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        let mut outcome: Option<Option<String>> = escape.then_some(None);
        egui::Modal::new(egui::Id::new("text_prompt")).show(ctx, |ui| {
            ui.heading("Enter Text");
            ui.label("Text:");
            let te = ui.text_edit_singleline(&mut self.text_input_buf);
            if self.focus_text_input {
                te.request_focus();
                self.focus_text_input = false;
            }
            let entered = te.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() || entered {
                    outcome = Some(Some(self.text_input_buf.clone()));
                }
                if ui.button("Cancel").clicked() {
                    outcome = Some(None);
                }
            });
        });
        if let Some(text) = outcome {
            self.session.resolve_text(text);
            self.text_input_buf.clear();
        }
    }
}

fn modifiers_from_egui(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.command,
        shift: modifiers.shift,
        alt: modifiers.alt,
    }
}

/// The chord behind a raw input event. egui reports Ctrl+C as a bare copy event, so that one
/// takes the modifiers currently held.
fn chord_from_event(event: &egui::Event, held: egui::Modifiers) -> Option<KeyChord> {
    match event {
        egui::Event::Copy => Some(KeyChord::new('C', modifiers_from_egui(held))),
        egui::Event::Key {
            key,
            pressed: true,
            modifiers,
            ..
        } => {
            let key = key.symbol_or_name().chars().next()?;
            Some(KeyChord::new(key, modifiers_from_egui(*modifiers)))
        }
        _ => None,
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        // Keyboard shortcuts; the text prompt owns the keyboard while open
        if self.session.pending_text().is_none() {
            for chord in Self::key_chords(ctx) {
                if let Some(request) = self.session.on_key_chord(chord) {
                    self.handle_request(request);
                }
            }
        }

        // Bottom toolbar
        egui::TopBottomPanel::bottom("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut tool = self.session.tool();
                for t in Tool::ALL {
                    ui.radio_value(&mut tool, t, t.label());
                }
                self.session.select_tool(tool);

                ui.separator();
                let mut rgba = self.session.color().to_array();
                if ui
                    .color_edit_button_rgba_unmultiplied(&mut rgba)
                    .on_hover_text("Select Color")
                    .changed()
                {
                    self.session.choose_color(Some(Color4::from_array(rgba)));
                }
                ui.separator();
                if ui.button("Save").clicked() {
                    self.handle_request(EditorRequest::SaveToFile);
                }
                if ui.button("Copy").clicked() {
                    self.handle_request(EditorRequest::CopyToClipboard);
                }
                if ui.button("Undo").clicked() {
                    self.session.undo_last();
                }
                ui.separator();
                ui.label(format!("Zoom: {:.0}%", self.view.zoom * 100.0));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        // Canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let viewport = from_egui_rect(response.rect);

            if !self.fitted {
                self.view.fit(viewport);
                self.fitted = true;
            }

            painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(40));

            if let Some(ref tex) = self.texture {
                painter.image(
                    tex.id(),
                    to_egui_rect(self.view.image_rect_on_screen(viewport)),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            // Pan with the middle button
            let middle_down = ctx.input(|i| i.pointer.middle_down());
            if middle_down && response.contains_pointer() {
                let delta = ctx.input(|i| i.pointer.delta());
                self.view.pan_by(vector(delta.x, delta.y));
            }

            // Zoom about the cursor
            let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 && response.hovered() {
                if let Some(cursor) = response.hover_pos() {
                    let factor = 1.0 + scroll_delta * 0.002;
                    self.view.zoom_about(viewport, from_pos2(cursor), factor);
                }
            }

            if self.session.pending_text().is_none() {
                self.handle_pointer(ctx, &response, viewport);
            }

            for shape in self.session.shapes() {
                paint::paint_shape(&painter, &self.view, viewport, shape);
            }
            if let Some(preview) = self.session.preview() {
                paint::paint_shape(&painter, &self.view, viewport, preview);
            }
        });

        self.show_text_prompt(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::KeyCommand;

    fn command_for(event: egui::Event, held: egui::Modifiers) -> Option<KeyCommand> {
        chord_from_event(&event, held).and_then(KeyCommand::from_chord)
    }

    #[test]
    fn copy_event_with_plain_command_copies() {
        assert_eq!(
            command_for(egui::Event::Copy, egui::Modifiers::COMMAND),
            Some(KeyCommand::CopyToClipboard)
        );
    }

    #[test]
    fn copy_event_with_extra_modifiers_is_not_a_command() {
        let ctrl_shift = egui::Modifiers::COMMAND | egui::Modifiers::SHIFT;
        let ctrl_alt = egui::Modifiers::COMMAND | egui::Modifiers::ALT;
        assert_eq!(command_for(egui::Event::Copy, ctrl_shift), None);
        assert_eq!(command_for(egui::Event::Copy, ctrl_alt), None);
    }

    #[test]
    fn key_events_carry_their_own_modifiers() {
        let key = |key, modifiers| egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        };
        assert_eq!(
            command_for(key(egui::Key::Z, egui::Modifiers::COMMAND), egui::Modifiers::NONE),
            Some(KeyCommand::Undo)
        );
        assert_eq!(
            command_for(key(egui::Key::S, egui::Modifiers::NONE), egui::Modifiers::COMMAND),
            None
        );
        let released = egui::Event::Key {
            key: egui::Key::S,
            physical_key: None,
            pressed: false,
            repeat: false,
            modifiers: egui::Modifiers::COMMAND,
        };
        assert_eq!(chord_from_event(&released, egui::Modifiers::COMMAND), None);
    }
}
