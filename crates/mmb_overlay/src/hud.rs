//! Per-frame HUD description and its egui painting.
//!
//! The game fills a `HudFrame` from its state each frame; this module only
//! knows how to draw one. Coordinates are logical pixels, the same space the
//! simulation uses, so a label anchored on an entity lines up with its sprite.

use egui::{Align2, Color32, FontId, LayerId, Order, Painter, Pos2, Rect};

/// Drifting, fading text such as "+1 Kill".
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingLabel {
    pub text: String,
    /// Horizontal center of the text.
    pub x: f32,
    /// Baseline of the text.
    pub y: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    pub color: [u8; 3],
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOverPanel {
    /// Button rectangle as `[x, y, w, h]`.
    pub button: [f32; 4],
    pub button_label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudFrame {
    pub score: u32,
    pub kills: u32,
    pub lives: u32,
    pub labels: Vec<FloatingLabel>,
    pub game_over: Option<GameOverPanel>,
}

const HUD_TEXT: Color32 = Color32::BLACK;
const HUD_FONT_SIZE: f32 = 18.0;

pub(crate) fn paint_hud(ctx: &egui::Context, hud: &HudFrame) {
    // Background order keeps the HUD underneath egui windows (debug panel).
    let painter = ctx.layer_painter(LayerId::new(Order::Background, egui::Id::new("hud")));

    for label in &hud.labels {
        paint_floating_label(&painter, label);
    }

    let font = FontId::proportional(HUD_FONT_SIZE);
    painter.text(
        Pos2::new(20.0, 12.0),
        Align2::LEFT_TOP,
        format!("Score: {}", hud.score),
        font.clone(),
        HUD_TEXT,
    );
    painter.text(
        Pos2::new(20.0, 36.0),
        Align2::LEFT_TOP,
        format!("Kills: {}", hud.kills),
        font.clone(),
        HUD_TEXT,
    );
    painter.text(
        Pos2::new(20.0, 60.0),
        Align2::LEFT_TOP,
        format!("Lives: {}", hud.lives),
        font,
        HUD_TEXT,
    );

    if let Some(panel) = &hud.game_over {
        paint_game_over(ctx, &painter, panel);
    }
}

/// Solid text over a 4-direction black outline, both scaled by `alpha`.
fn paint_floating_label(painter: &Painter, label: &FloatingLabel) {
    let alpha = label.alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let a = (alpha * 255.0).round() as u8;
    let font = FontId::proportional(label.size);
    let outline = Color32::from_rgba_unmultiplied(0, 0, 0, a);
    let [r, g, b] = label.color;
    let fill = Color32::from_rgba_unmultiplied(r, g, b, a);

    for (dx, dy) in [(1.0, 1.0), (-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0)] {
        painter.text(
            Pos2::new(label.x + dx, label.y + dy),
            Align2::CENTER_BOTTOM,
            &label.text,
            font.clone(),
            outline,
        );
    }
    painter.text(
        Pos2::new(label.x, label.y),
        Align2::CENTER_BOTTOM,
        &label.text,
        font,
        fill,
    );
}

fn paint_game_over(ctx: &egui::Context, painter: &Painter, panel: &GameOverPanel) {
    let screen = ctx.screen_rect();
    painter.rect_filled(screen, 0.0, Color32::from_black_alpha(140));
    painter.text(
        screen.center(),
        Align2::CENTER_CENTER,
        "GAME OVER",
        FontId::proportional(64.0),
        Color32::WHITE,
    );
    painter.text(
        screen.center() + egui::vec2(0.0, 48.0),
        Align2::CENTER_CENTER,
        format!("Click {} to play again", panel.button_label),
        FontId::proportional(20.0),
        Color32::LIGHT_GRAY,
    );

    let [x, y, w, h] = panel.button;
    let button = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));
    let hovered = ctx
        .pointer_hover_pos()
        .is_some_and(|p| button.contains(p));
    let fill = if hovered {
        Color32::from_rgb(250, 250, 250)
    } else {
        Color32::from_rgb(225, 225, 225)
    };
    painter.rect_filled(button.expand(1.5), 4.0, Color32::DARK_GRAY);
    painter.rect_filled(button, 4.0, fill);
    painter.text(
        button.center(),
        Align2::CENTER_CENTER,
        &panel.button_label,
        FontId::proportional(16.0),
        Color32::BLACK,
    );
}
