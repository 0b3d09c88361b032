use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

use crate::clock::Timestamp;

/// 24-bit color understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Confetti colors used on a win
pub const NEON_PALETTE: [Rgb; 4] = [
    Rgb(0x00, 0xE5, 0x99),
    Rgb(0x12, 0xFF, 0xF7),
    Rgb(0xB9, 0xFF, 0xB3),
    Rgb(0xFF, 0xFF, 0xFF),
];

const CONFETTI_SYMBOLS: [char; 6] = ['▪', '●', '◆', '▲', '■', '*'];
const CELEBRATION_WORDS: [&str; 4] = ["FASTER!", "BLAZING!", "INSTANT!", "SPEEDY!"];
const GRAVITY: f64 = 6.0;
// Keeps the piece count sane on very large terminals
const MAX_CONFETTI: usize = 240;

/// The visual effect the game toggles on a win.
///
/// The game only decides when the effect is shown and for how long; what it
/// looks like is up to the implementation.
pub trait CelebrationOverlay {
    fn show(&mut self, now: Timestamp, duration: Duration, palette: &[Rgb]);
    fn hide(&mut self);
    fn is_active(&self) -> bool;
}

/// Particle for celebration animation
#[derive(Debug, Clone)]
pub struct CelebrationParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color: Rgb,
    pub is_text: bool, // Whether this particle is part of text formation
    pub target_x: f64, // Target position for text particles
    pub target_y: f64,
}

impl CelebrationParticle {
    fn confetti<R: Rng>(x: f64, y: f64, color: Rgb, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-2.0..2.0),
            vel_y: rng.gen_range(0.0..3.0),
            symbol: *CONFETTI_SYMBOLS.choose(rng).unwrap_or(&'*'),
            color,
            is_text: false,
            target_x: x,
            target_y: y,
        }
    }

    fn text(x: f64, y: f64, target_x: f64, target_y: f64, symbol: char, color: Rgb) -> Self {
        Self {
            x,
            y,
            vel_x: (target_x - x) * 1.5,
            vel_y: (target_y - y) * 1.5,
            symbol,
            color,
            is_text: true,
            target_x,
            target_y,
        }
    }

    fn update(&mut self, dt: f64) {
        if self.is_text {
            let dist_to_target =
                ((self.target_x - self.x).powi(2) + (self.target_y - self.y).powi(2)).sqrt();
            if dist_to_target > 1.0 {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_x *= 0.95;
                self.vel_y *= 0.95;
            } else {
                // Snap to target and stay there
                self.x = self.target_x;
                self.y = self.target_y;
                self.vel_x = 0.0;
                self.vel_y = 0.0;
            }
        } else {
            self.x += self.vel_x * dt;
            self.y += self.vel_y * dt;
            self.vel_y += GRAVITY * dt;
            // a little flutter so pieces don't fall in straight lines
            self.vel_x *= 0.98;
        }
    }
}

/// Terminal confetti shown over the results screen
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<CelebrationParticle>,
    pub started_at: Timestamp,
    pub duration: Duration,
    pub is_active: bool,
    pub enabled: bool,
    pub terminal_width: f64,
    pub terminal_height: f64,
    last_update: Timestamp,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            started_at: Timestamp::ZERO,
            duration: Duration::ZERO,
            is_active: false,
            enabled: true,
            terminal_width: 80.0,
            terminal_height: 24.0,
            last_update: Timestamp::ZERO,
        }
    }

    /// An overlay that accepts `show` calls but never draws anything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_width = width as f64;
        self.terminal_height = height as f64;
    }

    fn spawn<R: Rng>(&mut self, palette: &[Rgb], rng: &mut R) {
        let fallback = [Rgb(0xFF, 0xFF, 0xFF)];
        let palette = if palette.is_empty() {
            &fallback[..]
        } else {
            palette
        };

        let count = ((self.terminal_width * self.terminal_height) / 12.0) as usize;
        for _ in 0..count.clamp(20, MAX_CONFETTI) {
            let x = rng.gen_range(0.0..self.terminal_width.max(1.0));
            // start above the frame so pieces rain in over time
            let y = rng.gen_range(-self.terminal_height.max(1.0)..0.0);
            let color = *palette.choose(rng).unwrap_or(&fallback[0]);
            self.particles
                .push(CelebrationParticle::confetti(x, y, color, rng));
        }

        let word = CELEBRATION_WORDS.choose(rng).unwrap_or(&"FASTER!");
        self.create_text_particles(word, palette, rng);
    }

    fn create_text_particles<R: Rng>(&mut self, text: &str, palette: &[Rgb], rng: &mut R) {
        let center_x = self.terminal_width / 2.0;
        let center_y = self.terminal_height / 2.0;

        let spacing = 1.0;
        let text_width: f64 = text
            .chars()
            .map(|c| c.width().unwrap_or(1) as f64 + spacing)
            .sum::<f64>()
            - spacing;
        let mut target_x = center_x - text_width / 2.0;
        let target_y = (center_y - 6.0).max(1.0);

        for ch in text.chars() {
            let start_x = center_x + rng.gen_range(-10.0..10.0);
            let start_y = center_y + rng.gen_range(-5.0..5.0);
            let color = *palette.choose(rng).unwrap_or(&Rgb(0xFF, 0xFF, 0xFF));
            self.particles.push(CelebrationParticle::text(
                start_x, start_y, target_x, target_y, ch, color,
            ));
            target_x += ch.width().unwrap_or(1) as f64 + spacing;
        }
    }

    /// Advance the animation to `now`, ending it once its duration has passed
    pub fn update(&mut self, now: Timestamp) {
        if !self.is_active {
            return;
        }

        if now.saturating_duration_since(self.started_at) >= self.duration {
            self.hide();
            return;
        }

        let dt = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.last_update = now;

        let height = self.terminal_height;
        let width = self.terminal_width;
        self.particles.retain_mut(|particle| {
            particle.update(dt);

            if particle.is_text {
                return true;
            }
            let buffer = 2.0;
            particle.y <= height + buffer && particle.x >= -buffer && particle.x <= width + buffer
        });
    }

    /// Particles currently inside the frame
    pub fn visible_particles(&self) -> impl Iterator<Item = &CelebrationParticle> {
        let (width, height) = (self.terminal_width, self.terminal_height);
        self.particles
            .iter()
            .filter(move |p| p.x >= 0.0 && p.y >= 0.0 && p.x < width && p.y < height)
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl CelebrationOverlay for CelebrationAnimation {
    fn show(&mut self, now: Timestamp, duration: Duration, palette: &[Rgb]) {
        if !self.enabled {
            return;
        }

        self.particles.clear();
        self.started_at = now;
        self.last_update = now;
        self.duration = duration;
        self.is_active = true;

        let mut rng = rand::thread_rng();
        self.spawn(palette, &mut rng);
    }

    fn hide(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_confetti_particle_falls() {
        let mut rng = rand::thread_rng();
        let mut particle = CelebrationParticle::confetti(10.0, 10.0, NEON_PALETTE[0], &mut rng);
        let initial_vel_y = particle.vel_y;

        particle.update(0.1);

        assert!(particle.vel_y > initial_vel_y);
        assert!(!particle.is_text);
    }

    #[test]
    fn test_text_particle_converges_on_target() {
        let mut particle = CelebrationParticle::text(0.0, 0.0, 10.0, 5.0, 'A', NEON_PALETTE[1]);
        assert!(particle.is_text);
        assert_eq!(particle.symbol, 'A');

        for _ in 0..20 {
            particle.update(0.1);
        }

        let distance = ((particle.target_x - particle.x).powi(2)
            + (particle.target_y - particle.y).powi(2))
        .sqrt();
        assert!(distance < 5.0);
    }

    #[test]
    fn test_show_activates_with_palette_colors() {
        let mut celebration = CelebrationAnimation::new();
        assert!(!celebration.is_active());

        celebration.resize(80, 24);
        celebration.show(ms(1_000), Duration::from_millis(5_000), &NEON_PALETTE);

        assert!(celebration.is_active());
        assert!(!celebration.particles.is_empty());
        assert!(celebration.particles.iter().any(|p| p.is_text));
        assert!(celebration.particles.iter().any(|p| !p.is_text));
        assert!(celebration
            .particles
            .iter()
            .all(|p| NEON_PALETTE.contains(&p.color)));
    }

    #[test]
    fn test_animation_ends_after_duration() {
        let mut celebration = CelebrationAnimation::new();
        celebration.show(ms(1_000), Duration::from_millis(5_000), &NEON_PALETTE);

        celebration.update(ms(3_000));
        assert!(celebration.is_active());

        celebration.update(ms(5_999));
        assert!(celebration.is_active());

        celebration.update(ms(6_000));
        assert!(!celebration.is_active());
        assert!(celebration.particles.is_empty());
    }

    #[test]
    fn test_hide_is_idempotent() {
        let mut celebration = CelebrationAnimation::new();
        celebration.hide();
        celebration.show(ms(0), Duration::from_millis(5_000), &NEON_PALETTE);
        celebration.hide();
        celebration.hide();

        assert!(!celebration.is_active());
        assert!(celebration.particles.is_empty());
    }

    #[test]
    fn test_disabled_overlay_never_activates() {
        let mut celebration = CelebrationAnimation::disabled();
        celebration.show(ms(0), Duration::from_millis(5_000), &NEON_PALETTE);

        assert!(!celebration.is_active());
        assert!(celebration.particles.is_empty());
    }

    #[test]
    fn test_particles_move_over_time() {
        let mut celebration = CelebrationAnimation::new();
        celebration.show(ms(0), Duration::from_millis(5_000), &NEON_PALETTE);

        let initial: Vec<(f64, f64)> = celebration.particles.iter().map(|p| (p.x, p.y)).collect();
        for step in 1..=5 {
            celebration.update(ms(step * 100));
        }

        let moved = celebration
            .particles
            .iter()
            .zip(initial.iter())
            .filter(|(p, &(x, y))| (p.x - x).abs() > 0.01 || (p.y - y).abs() > 0.01)
            .count();
        assert!(moved > 0, "particles should move after updates");
    }

    #[test]
    fn test_particles_removed_when_off_screen() {
        let mut celebration = CelebrationAnimation::new();
        celebration.resize(20, 10);
        celebration.show(ms(0), Duration::from_millis(5_000), &NEON_PALETTE);

        let mut rng = rand::thread_rng();
        celebration.particles.push(CelebrationParticle::confetti(
            100.0,
            100.0,
            NEON_PALETTE[0],
            &mut rng,
        ));

        celebration.update(ms(100));

        for particle in celebration.particles.iter().filter(|p| !p.is_text) {
            assert!(particle.y <= 12.0 && particle.x >= -2.0 && particle.x <= 22.0);
        }
    }

    #[test]
    fn test_visible_particles_inside_frame() {
        let mut celebration = CelebrationAnimation::new();
        celebration.resize(40, 20);
        celebration.show(ms(0), Duration::from_millis(5_000), &NEON_PALETTE);

        for p in celebration.visible_particles() {
            assert!(p.x >= 0.0 && p.x < 40.0 && p.y >= 0.0 && p.y < 20.0);
        }
    }
}
