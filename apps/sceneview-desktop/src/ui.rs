use egui::{Context, Slider, Ui, Vec2};
use sceneview_common::{AssetId, Color, PanelLayout, ScreenRect};
use sceneview_scene::{Object, Scene, ViewerState};
use sceneview_tools::ConsoleHistory;

/// A texture the properties panel can assign to the edited object.
pub struct TextureChoice {
    pub label: String,
    pub id: AssetId,
}

/// Lay out both panels for this frame.
pub fn draw(
    ctx: &Context,
    layout: &PanelLayout,
    console: &ConsoleHistory,
    scene: &mut Scene,
    state: &mut ViewerState,
    textures: &[TextureChoice; 2],
) {
    console_window(ctx, layout.console, console);
    properties_window(ctx, layout.properties, scene, state, textures);
}

pub const CONSOLE_TITLE: &str = "Output console";
pub const PROPERTIES_TITLE: &str = "Properties";

/// Fixed panel window whose outer frame fills a rectangle given in physical
/// pixels.
fn panel(ctx: &Context, title: &str, rect: ScreenRect) -> egui::Window<'static> {
    let ppp = ctx.pixels_per_point();
    egui::Window::new(title.to_owned())
        .fixed_pos(egui::pos2(rect.x as f32 / ppp, rect.y as f32 / ppp))
        .fixed_size(content_size(rect, ppp, window_chrome(ctx)))
        .resizable(false)
        .movable(false)
        .collapsible(false)
}

/// Points a window spends outside its content area: title bar, inner
/// margins and stroke. Errs on the large side.
fn window_chrome(ctx: &Context) -> Vec2 {
    let style = ctx.style();
    let title_font = egui::TextStyle::Heading.resolve(&style);
    let title = ctx
        .fonts(|fonts| fonts.row_height(&title_font))
        .max(style.spacing.interact_size.y);
    let margin = style.spacing.window_margin.sum();
    let stroke = 2.0 * style.visuals.window_stroke.width;
    egui::vec2(
        margin.x + stroke,
        title + 2.0 * margin.y + style.spacing.item_spacing.y + stroke,
    )
}

/// Content size in points for a window of `chrome` around it to cover `rect`.
fn content_size(rect: ScreenRect, ppp: f32, chrome: Vec2) -> Vec2 {
    let outer = egui::vec2(rect.width as f32 / ppp, rect.height as f32 / ppp);
    (outer - chrome).max(Vec2::ZERO)
}

fn console_window(ctx: &Context, rect: ScreenRect, console: &ConsoleHistory) {
    panel(ctx, CONSOLE_TITLE, rect).show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in console.entries() {
                    ui.label(entry);
                }
            });
    });
}

fn properties_window(
    ctx: &Context,
    rect: ScreenRect,
    scene: &mut Scene,
    state: &mut ViewerState,
    textures: &[TextureChoice; 2],
) {
    panel(ctx, PROPERTIES_TITLE, rect).show(ctx, |ui| {
        let Some(object) = scene.objects_mut().first_mut() else {
            ui.label("No objects in the scene.");
            return;
        };
        transform_controls(ui, object);
        ui.separator();

        ui.horizontal(|ui| {
            for choice in textures {
                if ui.button(choice.label.as_str()).clicked() {
                    object.set_texture(choice.id);
                    tracing::info!("{} applied", choice.label);
                }
            }
        });

        let mut textured = object.is_textured();
        if ui.checkbox(&mut textured, "Textured").changed() {
            object.set_textured(textured);
        }
        ui.checkbox(&mut state.is_lit, "Light the scene");

        let mut rgba = object.color().to_array();
        ui.horizontal(|ui| {
            ui.label("Color");
            if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
                object.set_color(Color::from_array(rgba));
            }
        });
    });
}

fn transform_controls(ui: &mut Ui, object: &mut Object) {
    let transform = object.transform_mut();

    ui.label("Position");
    let mut p = transform.position.to_array();
    if axis_sliders(ui, &mut p, -10.0..=10.0) {
        transform.set_position(p[0], p[1], p[2]);
    }

    ui.label("Rotation");
    let mut r = transform.rotation.to_array();
    if axis_sliders(ui, &mut r, -360.0..=360.0) {
        transform.set_rotation(r[0], r[1], r[2]);
    }

    ui.label("Scale");
    let mut s = transform.scale.to_array();
    if axis_sliders(ui, &mut s, 0.001..=10.0) {
        transform.set_scale(s[0], s[1], s[2]);
    }
}

/// X/Y/Z sliders over `range`. Returns true when any value changed.
fn axis_sliders(ui: &mut Ui, values: &mut [f32; 3], range: std::ops::RangeInclusive<f32>) -> bool {
    let mut changed = false;
    for (value, axis) in values.iter_mut().zip(["X", "Y", "Z"]) {
        changed |= ui
            .add(Slider::new(value, range.clone()).fixed_decimals(2).text(axis))
            .changed();
    }
    changed
}
