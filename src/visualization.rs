use macroquad::prelude::*;

use crate::config::SimulationConfig;
use crate::field::{TrailField, MAX_TRAIL};
use crate::swarm::Swarm;

// The trail field is the source of truth; this view mirrors it into a
// texture each frame and stretches it over the window.
pub struct FieldView {
    image: Image,
    texture: Texture2D,
}

impl FieldView {
    pub fn new(width: usize, height: usize) -> Self {
        let image = Image::gen_image_color(width as u16, height as u16, BLACK);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);
        Self { image, texture }
    }

    pub fn draw(&mut self, field: &TrailField) {
        // Field cells and image bytes share the same row-major layout
        for (i, &v) in field.cells().iter().enumerate() {
            let level = v.clamp(0.0, MAX_TRAIL) as u8;
            let o = i * 4;
            self.image.bytes[o] = level;
            self.image.bytes[o + 1] = level;
            self.image.bytes[o + 2] = level;
            self.image.bytes[o + 3] = 255;
        }
        self.texture.update(&self.image);

        draw_texture_ex(
            &self.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );
    }
}

/// Optional overlay marking each agent's position on top of the trail view.
pub fn draw_agents(swarm: &Swarm, agents_visible: bool, config: &SimulationConfig) {
    if !agents_visible {
        return;
    }
    let sx = screen_width() / config.width as f32;
    let sy = screen_height() / config.height as f32;
    for agent in &swarm.agents {
        draw_circle(
            agent.x * sx,
            agent.y * sy,
            config.agent_radius * sx,
            Color::new(1.0, 0.85, 0.4, 0.8),
        );
    }
}

pub fn draw_stats_and_help(
    agent_count: usize,
    mean_intensity: f32,
    max_intensity: f32,
    frame_index: u64,
    paused: bool,
    speed_multiplier: f32,
) {
    let lines = [
        format!("Agents: {}", agent_count),
        format!("Frame: {}", frame_index),
        format!(
            "Trail: mean {:.1} / max {:.1}",
            mean_intensity, max_intensity
        ),
        format!(
            "Speed: {:.1}x{}",
            speed_multiplier,
            if paused { "  [PAUSED]" } else { "" }
        ),
    ];

    let mut y = 25.0;
    for line in &lines {
        draw_text(line, 10.0, y, 20.0, Color::new(0.9, 0.9, 0.9, 0.9));
        y += 22.0;
    }
}

pub fn draw_help_popup() {
    let w = 340.0;
    let h = 230.0;
    let x = (screen_width() - w) / 2.0;
    let y = (screen_height() - h) / 2.0;

    draw_rectangle(x, y, w, h, Color::new(0.0, 0.0, 0.0, 0.85));
    draw_rectangle_lines(x, y, w, h, 2.0, Color::new(0.6, 0.6, 0.6, 1.0));

    let entries = [
        "Controls",
        "",
        "Space      Pause / resume",
        "R          Reseed the swarm",
        "A          Toggle agent overlay",
        "+ / -      Speed up / slow down",
        "0          Reset speed",
        "P          Save screenshot",
        "F1         Close this help",
    ];

    let mut ty = y + 30.0;
    for entry in &entries {
        draw_text(entry, x + 20.0, ty, 18.0, WHITE);
        ty += 22.0;
    }
}
