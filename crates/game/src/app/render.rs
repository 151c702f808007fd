use tilerun_engine::{Level, Renderer, Viewport};
use tracing::trace;

/// Stand-in renderer: works out what a screen of `viewport` size would show
/// and logs it.
#[derive(Debug)]
pub(crate) struct TraceRenderer {
    viewport: Viewport,
    frames_drawn: u64,
}

impl TraceRenderer {
    pub(crate) fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            frames_drawn: 0,
        }
    }

    pub(crate) fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    fn visible_sprites(&self, level: &Level) -> usize {
        let left = self.viewport.view_left(level) as f32;
        let right = left + self.viewport.width as f32;
        level
            .sprites()
            .iter()
            .filter(|sprite| {
                let body = sprite.body();
                body.position.x + body.width() > left && body.position.x < right
            })
            .count()
    }
}

impl Renderer for TraceRenderer {
    fn draw(&mut self, level: &Level) {
        self.frames_drawn += 1;
        let player = level.player().body();
        trace!(
            frame = self.frames_drawn,
            offset_x = self.viewport.camera_offset_x(level),
            offset_y = self.viewport.camera_offset_y(level),
            player_x = player.position.x,
            player_y = player.position.y,
            visible_sprites = self.visible_sprites(level),
            projectiles = level.projectiles().len(),
            "frame_drawn"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tilerun_engine::{parse_map, SimulationConfig};

    use super::*;

    #[test]
    fn only_sprites_inside_the_view_are_visible() {
        let map = format!("   o{}o\n{}\n", " ".repeat(20), "A".repeat(30));
        let level = parse_map("wide", Path::new("wide.txt"), &map, &SimulationConfig::default())
            .expect("parse");
        let renderer = TraceRenderer::new(Viewport::default());
        assert_eq!(renderer.visible_sprites(&level), 1);
    }

    #[test]
    fn draws_are_counted() {
        let level = parse_map("m", Path::new("m.txt"), "\nAAAA\n", &SimulationConfig::default())
            .expect("parse");
        let mut renderer = TraceRenderer::new(Viewport::default());
        renderer.draw(&level);
        renderer.draw(&level);
        assert_eq!(renderer.frames_drawn(), 2);
    }
}
