//! egui desktop chrome: wallpaper, icons, file windows, letter form and
//! the pet's stats panel.

use winit::window::Window;

use crate::desktop::filesystem::FileSystemItem;
use crate::desktop::letters::unix_millis;
use crate::desktop::wallpaper::Wallpaper;
use crate::desktop::{DesktopShell, OpenView};
use crate::input::{CommandBus, PetCommand};
use crate::pet::pose::{mood_badge, pose_for};
use crate::render::GpuState;
use crate::sim::PetView;

/// Icon cell size in points.
const ICON_SIZE: egui::Vec2 = egui::vec2(90.0, 90.0);
/// Speech bubble and badge height above the pet's feet, in points.
const BUBBLE_LIFT: f32 = 86.0;

const PINK: egui::Color32 = egui::Color32::from_rgb(255, 105, 180);
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(40, 20, 55, 235);

/// UV rectangle that scales `image` to cover `screen` without stretching.
pub fn cover_uv(screen: egui::Vec2, image: egui::Vec2) -> egui::Rect {
    if image.x <= 0.0 || image.y <= 0.0 || screen.x <= 0.0 || screen.y <= 0.0 {
        return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }
    let scale = (screen.x / image.x).max(screen.y / image.y);
    let span = egui::vec2(screen.x / (image.x * scale), screen.y / (image.y * scale));
    let min = egui::pos2((1.0 - span.x) * 0.5, (1.0 - span.y) * 0.5);
    egui::Rect::from_min_size(min, span)
}

/// egui context, winit glue and wgpu renderer for the desktop layer.
pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    wallpaper: Option<egui::TextureHandle>,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            wallpaper: None,
        }
    }

    /// Forward a winit event to egui.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        let _response = self.egui_state.on_window_event(window, event);
    }

    /// Whether the pointer is over a window or wants to type, so the
    /// desktop (and the pet) should not see the press.
    pub fn pointer_over_ui(&self) -> bool {
        self.egui_ctx.is_pointer_over_area() || self.egui_ctx.wants_pointer_input()
    }

    pub fn set_wallpaper(&mut self, wp: Wallpaper) {
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [wp.width as usize, wp.height as usize],
            &wp.rgba,
        );
        match &mut self.wallpaper {
            Some(handle) => handle.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.wallpaper = Some(self.egui_ctx.load_texture(
                    "wallpaper",
                    image,
                    egui::TextureOptions::LINEAR,
                ))
            }
        }
    }

    /// Run the egui frame and produce paint output.
    pub fn run_frame(
        &mut self,
        window: &Window,
        screen_w: u32,
        screen_h: u32,
        shell: &mut DesktopShell,
        pet: Option<&PetView>,
        bus: &mut CommandBus,
    ) -> (
        Vec<egui::epaint::ClippedPrimitive>,
        egui::TexturesDelta,
        egui_wgpu::ScreenDescriptor,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let wallpaper = self
            .wallpaper
            .as_ref()
            .map(|h| (h.id(), h.size_vec2()));
        let ppp = window.scale_factor() as f32;
        let screen = egui::vec2(screen_w as f32, screen_h as f32) / ppp;

        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            draw_desktop(ctx, screen, wallpaper, shell);
            draw_windows(ctx, shell);
            if let Some(pet) = pet {
                draw_pet_chrome(ctx, pet, shell, bus);
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let clipped_primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_w, screen_h],
            pixels_per_point,
        };

        (clipped_primitives, full_output.textures_delta, screen_descriptor)
    }

    /// Upload egui textures and buffers. Call before the desktop render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::epaint::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor)
    }

    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::epaint::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, textures_delta: &egui::TexturesDelta) {
        for &id in &textures_delta.free {
            self.egui_renderer.free_texture(&id);
        }
    }
}

// ---------------------------------------------------------------------------
// Free-function drawing (keeps egui_ctx and the shell borrows apart)
// ---------------------------------------------------------------------------

fn icon_rect(pos: egui::Pos2) -> egui::Rect {
    egui::Rect::from_min_size(pos, ICON_SIZE)
}

/// Wallpaper and icons on the background layer. Icons are hit-tested by hand
/// so they never count as a UI area for the pet.
fn draw_desktop(
    ctx: &egui::Context,
    screen: egui::Vec2,
    wallpaper: Option<(egui::TextureId, egui::Vec2)>,
    shell: &mut DesktopShell,
) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let screen_rect = egui::Rect::from_min_size(egui::Pos2::ZERO, screen);

    if let Some((tex, size)) = wallpaper {
        painter.image(tex, screen_rect, cover_uv(screen, size), egui::Color32::WHITE);
    }

    let (hover, clicked) = ctx.input(|i| (i.pointer.hover_pos(), i.pointer.primary_clicked()));
    let over_window = ctx.is_pointer_over_area();
    let mut activated = None;

    for icon in shell.icons() {
        let rect = icon_rect(egui::pos2(icon.position.x, icon.position.y));
        let hovered = !over_window && hover.is_some_and(|p| rect.contains(p));
        if hovered {
            painter.rect_filled(
                rect,
                8.0,
                egui::Color32::from_rgba_unmultiplied(255, 255, 255, 40),
            );
            if clicked {
                activated = Some(icon.action.clone());
            }
        }
        painter.text(
            rect.center_top() + egui::vec2(0.0, 30.0),
            egui::Align2::CENTER_CENTER,
            &icon.icon,
            egui::FontId::proportional(36.0),
            egui::Color32::WHITE,
        );
        painter.text(
            rect.center_bottom() - egui::vec2(0.0, 16.0),
            egui::Align2::CENTER_CENTER,
            &icon.name,
            egui::FontId::proportional(13.0),
            egui::Color32::WHITE,
        );
    }

    if let Some(action) = activated {
        shell.activate(&action);
    }
}

fn panel_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(PANEL_FILL)
        .corner_radius(8.0)
        .inner_margin(10.0)
        .stroke(egui::Stroke::new(1.0, PINK))
}

fn draw_windows(ctx: &egui::Context, shell: &mut DesktopShell) {
    let views: Vec<(OpenView, Option<FileSystemItem>)> = shell
        .open_views()
        .iter()
        .map(|v| (v.clone(), shell.item(v.id()).cloned()))
        .collect();

    for (i, (view, item)) in views.into_iter().enumerate() {
        let Some(item) = item else {
            shell.close(view.id());
            continue;
        };
        let mut open = true;
        let mut clicked_child = None;
        let offset = 24.0 * i as f32;

        egui::Window::new(format!("{} {}", item.icon, item.name))
            .id(egui::Id::new(("view", view.id().to_string())))
            .open(&mut open)
            .default_pos([380.0 + offset, 80.0 + offset])
            .default_width(420.0)
            .frame(panel_frame())
            .show(ctx, |ui| {
                ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(235));
                match &view {
                    OpenView::File(_) => {
                        egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                            ui.label(item.content().unwrap_or_default());
                        });
                    }
                    OpenView::Folder(_) => {
                        if item.children().is_empty() {
                            ui.weak("(gol)");
                        }
                        for child in item.children() {
                            if ui.button(format!("{} {}", child.icon, child.name)).clicked() {
                                clicked_child = Some(child.id.clone());
                            }
                        }
                    }
                }
            });

        if let Some(child) = clicked_child {
            shell.open_item(&child);
        }
        if !open {
            shell.close(view.id());
        }
    }

    if let Some(message) = shell.popup.clone() {
        if message_box(ctx, "popup", "💕", &message) {
            shell.popup = None;
        }
    }

    if shell.letter_form_open {
        draw_letter_form(ctx, shell);
    }

    if let Some(alert) = shell.alert.clone() {
        if message_box(ctx, "alert", "⚠", &alert) {
            shell.alert = None;
        }
    }
}

/// Centered message with an OK button. Returns true when dismissed.
fn message_box(ctx: &egui::Context, id: &str, title: &str, message: &str) -> bool {
    let mut dismissed = false;
    egui::Window::new(title)
        .id(egui::Id::new(("message", id)))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::WHITE);
            ui.label(message);
            ui.add_space(6.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    dismissed
}

fn draw_letter_form(ctx: &egui::Context, shell: &mut DesktopShell) {
    let mut open = true;
    let mut submit = false;
    let mut cancel = false;
    let success = shell.success_visible();

    egui::Window::new("✉ Scrisori")
        .id(egui::Id::new("letter_form"))
        .open(&mut open)
        .default_pos([420.0, 120.0])
        .default_width(440.0)
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(235));
            let form = &mut shell.form;
            egui::Grid::new("letter_fields")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Titlu:");
                    ui.text_edit_singleline(&mut form.title);
                    ui.end_row();
                    ui.label("Către:");
                    ui.text_edit_singleline(&mut form.to);
                    ui.end_row();
                    ui.label("De la:");
                    ui.text_edit_singleline(&mut form.from);
                    ui.end_row();
                });
            ui.label("Conținut:");
            ui.add(
                egui::TextEdit::multiline(&mut form.content)
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                submit = ui.button("💌 Creează scrisoarea").clicked();
                cancel = ui.button("Anulează").clicked();
            });
            if success {
                ui.colored_label(
                    egui::Color32::from_rgb(140, 240, 160),
                    "✅ Scrisoarea a fost creată!",
                );
            }
        });

    if submit {
        // Failures raise the shell's alert.
        let _ = shell.submit_letter(unix_millis());
    }
    if cancel {
        shell.form.clear();
    }
    if !open || cancel {
        shell.letter_form_open = false;
    }
}

fn stat_bar(ui: &mut egui::Ui, label: &str, value: f32, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(format!("{label:<9}")).monospace());
        ui.add(
            egui::ProgressBar::new(value / 100.0)
                .desired_width(160.0)
                .fill(color)
                .text(format!("{value:.0}")),
        );
    });
}

fn draw_pet_chrome(
    ctx: &egui::Context,
    pet: &PetView,
    shell: &mut DesktopShell,
    bus: &mut CommandBus,
) {
    // Speech bubble and mood badge, anchored over the pet's head.
    let ppp = ctx.pixels_per_point();
    let head = egui::pos2(pet.anchor.x / ppp, pet.anchor.y / ppp - BUBBLE_LIFT);
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("pet_chrome"),
    ));

    if let Some(text) = &pet.speech {
        let galley = painter.layout_no_wrap(
            text.clone(),
            egui::FontId::proportional(15.0),
            egui::Color32::from_rgb(90, 30, 80),
        );
        let rect = egui::Rect::from_center_size(head, galley.size() + egui::vec2(18.0, 10.0));
        painter.rect_filled(rect, 10.0, egui::Color32::WHITE);
        painter.rect_stroke(
            rect,
            10.0,
            egui::Stroke::new(1.5, PINK),
            egui::StrokeKind::Outside,
        );
        painter.galley(rect.min + egui::vec2(9.0, 5.0), galley, egui::Color32::BLACK);
    } else if let Some(badge) = mood_badge(pet.action, pet.stats.hunger) {
        painter.text(
            head + egui::vec2(28.0, 10.0),
            egui::Align2::CENTER_CENTER,
            badge,
            egui::FontId::proportional(22.0),
            egui::Color32::WHITE,
        );
    }

    egui::Area::new(egui::Id::new("pet_toggle"))
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
        .show(ctx, |ui| {
            if ui
                .add(egui::Button::new(
                    egui::RichText::new(format!("🐱 {}", pet.name)).size(16.0),
                ))
                .clicked()
            {
                shell.stats_open = !shell.stats_open;
            }
        });

    if !shell.stats_open {
        return;
    }

    let mut open = true;
    egui::Window::new(format!("🐱 {}", pet.name))
        .id(egui::Id::new("pet_stats"))
        .open(&mut open)
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 56.0])
        .resizable(false)
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(235));
            ui.label(egui::RichText::new(pose_for(pet.action).label).strong());
            ui.add_space(4.0);
            stat_bar(ui, "🍗 Foame", pet.stats.hunger, egui::Color32::from_rgb(230, 140, 60));
            stat_bar(ui, "💕 Fericire", pet.stats.happiness, PINK);
            stat_bar(ui, "⚡ Energie", pet.stats.energy, egui::Color32::from_rgb(120, 200, 255));
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("🍗 Hrănește").clicked() {
                    bus.push(PetCommand::Feed);
                }
                if ui.button("🥣 Pune mâncare").clicked() {
                    bus.push(PetCommand::PourFood);
                }
                if ui.button("⚽ Minge").clicked() {
                    bus.push(PetCommand::KickBall);
                }
            });
        });
    if !open {
        shell.stats_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: egui::Rect, b: egui::Rect) -> bool {
        (a.min - b.min).length() < 1e-4 && (a.max - b.max).length() < 1e-4
    }

    #[test]
    fn cover_crops_the_long_side() {
        // 2:1 image on a square screen keeps the middle half horizontally.
        let uv = cover_uv(egui::vec2(100.0, 100.0), egui::vec2(200.0, 100.0));
        assert!(close(
            uv,
            egui::Rect::from_min_max(egui::pos2(0.25, 0.0), egui::pos2(0.75, 1.0))
        ));
    }

    #[test]
    fn matching_aspect_uses_whole_image() {
        let uv = cover_uv(egui::vec2(1920.0, 1080.0), egui::vec2(960.0, 540.0));
        assert!(close(
            uv,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
        ));
    }

    #[test]
    fn degenerate_sizes_fall_back_to_full_uv() {
        let uv = cover_uv(egui::vec2(0.0, 100.0), egui::vec2(10.0, 10.0));
        assert_eq!(uv.max, egui::pos2(1.0, 1.0));
    }
}
