//! The egui driver: controls, pacing, and board rendering.
//!
//! The app owns an [`Engine`] and advances it from the frame loop, one step
//! per elapsed delay, then paints whatever the engine's state says. All
//! board-size validation happens here; the engine never sees an `n < 4`.

use eframe::egui;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};
#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

use crate::engine::{Engine, SearchState, StepAction};
use crate::export;
use crate::theme::Theme;

const MIN_N: usize = 4;
const MAX_N: usize = 30;

/// Inter-step delay for a 1..=10 speed setting. Speed 10 means "as fast as
/// the frame budget allows" and is handled separately.
fn step_delay_ms(speed: u64) -> u64 {
    if speed >= 10 {
        0
    } else {
        (10 - speed) * 50
    }
}

/// True if (row, col) is attacked by any placed queen other than one sitting
/// on the square itself.
fn square_threatened(positions: &[Option<usize>], row: usize, col: usize) -> bool {
    for (r, pos) in positions.iter().enumerate() {
        if let Some(c) = *pos {
            if r == row && c == col {
                continue;
            }
            if r == row || c == col || r.abs_diff(row) == c.abs_diff(col) {
                return true;
            }
        }
    }
    false
}

/// The square the most recent step touched, for the transient highlight.
#[derive(Clone, Copy, PartialEq)]
enum Highlight {
    Placed { row: usize, col: usize },
    Removed { row: usize, col: usize },
}

struct Particle {
    pos: egui::Pos2,
    vel: egui::Vec2,
    color: egui::Color32,
    life: f32, // 1.0 down to 0.0
    size: f32,
}

/// UI preferences persisted across sessions. Search state never is.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct Prefs {
    n: usize,
    speed: u64,
    show_threats: bool,
    theme: String,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            n: 8,
            speed: 5,
            show_threats: false,
            theme: Theme::default().name.to_owned(),
        }
    }
}

pub struct QueensApp {
    n_input: String,
    n: usize,
    engine: Engine,

    speed: u64, // 1-10
    playing: bool,
    last_update: Instant,

    theme: Theme,
    show_threats: bool,
    input_error: Option<String>,
    highlight: Option<Highlight>,
    particles: Vec<Particle>,
}

impl QueensApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let prefs: Prefs = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let n = prefs.n.clamp(MIN_N, MAX_N);
        Self {
            n_input: n.to_string(),
            n,
            engine: Engine::new(n),
            speed: prefs.speed.clamp(1, 10),
            playing: false,
            last_update: Instant::now(),
            theme: Theme::by_name(&prefs.theme).unwrap_or_default(),
            show_threats: prefs.show_threats,
            input_error: None,
            highlight: None,
            particles: Vec::new(),
        }
    }

    fn spawn_particles(&mut self, pos: egui::Pos2, color: egui::Color32) {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..30 {
            let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed: f32 = rng.gen_range(100.0..500.0);
            self.particles.push(Particle {
                pos,
                vel: egui::vec2(angle.cos() * speed, angle.sin() * speed - 200.0),
                color,
                life: 1.0,
                size: rng.gen_range(3.0..7.0),
            });
        }
    }

    /// Apply a board-size edit. Anything that is not an integer in
    /// `MIN_N..=MAX_N` is rejected here with a status message and never
    /// reaches the engine.
    fn apply_size_input(&mut self) {
        match self.n_input.trim().parse::<usize>() {
            Ok(new_n) if new_n < MIN_N => {
                self.input_error = Some(format!("No solution exists for N < {MIN_N}"));
            }
            Ok(new_n) if new_n > MAX_N => {
                self.input_error = Some(format!("Board size is capped at {MAX_N}"));
            }
            Ok(new_n) => {
                self.input_error = None;
                if new_n != self.n {
                    self.set_board_size(new_n);
                }
            }
            Err(_) => {
                self.input_error = Some(format!("Enter a whole number between {MIN_N} and {MAX_N}"));
            }
        }
    }

    fn set_board_size(&mut self, n: usize) {
        self.n = n;
        self.n_input = n.to_string();
        self.engine.reset(n);
        self.playing = false;
        self.highlight = None;
        log::info!("board resized to n={n}");
    }

    fn start(&mut self) {
        if self.input_error.is_some() {
            return;
        }
        if matches!(self.engine.state, SearchState::Solved | SearchState::Failed) {
            self.engine.reset(self.n);
            self.highlight = None;
        }
        self.playing = true;
        self.last_update = Instant::now();
        log::info!("search started, n={}", self.n);
    }

    fn halt(&mut self) {
        self.engine.stop();
        self.playing = false;
        log::info!("search stopped at {} steps", self.engine.steps);
    }

    fn reset(&mut self) {
        self.engine.reset(self.n);
        self.playing = false;
        self.highlight = None;
        self.input_error = None;
        self.particles.clear();
    }

    /// Advance the engine once and fold the result into the view state.
    fn advance(&mut self, ctx: &egui::Context) {
        match self.engine.step() {
            StepAction::Placed { row, col } => {
                self.highlight = Some(Highlight::Placed { row, col });
            }
            StepAction::Backtracked { row, col } => {
                self.highlight = Some(Highlight::Removed { row, col });
            }
            StepAction::Solved => {
                self.playing = false;
                self.highlight = None;
                let center = ctx.screen_rect().center();
                let color = self.theme.accent_color;
                self.spawn_particles(center, color);
            }
            StepAction::Failed => {
                self.playing = false;
                self.highlight = None;
            }
            StepAction::Terminal => {
                self.playing = false;
            }
        }
    }

    fn status(&self) -> (String, egui::Color32) {
        if let Some(msg) = &self.input_error {
            return (msg.clone(), self.theme.retreat_color);
        }
        match self.engine.state {
            SearchState::Idle => (
                format!("Board ready for N = {}", self.n),
                self.theme.text_color,
            ),
            SearchState::Running => ("Solving...".to_owned(), self.theme.accent_color),
            SearchState::Solved => (
                format!("Solved for N = {} in {} steps", self.n, self.engine.steps),
                self.theme.accent_color,
            ),
            SearchState::Failed => (
                format!("No solution found (checked {} steps)", self.engine.steps),
                self.theme.retreat_color,
            ),
            SearchState::Stopped => ("Stopped".to_owned(), self.theme.probe_color),
        }
    }

    fn export_solution(&self) {
        if let Some(cols) = self.engine.solution() {
            if let Err(err) = export::export_solution(self.n, &cols) {
                log::error!("csv export failed: {err}");
            }
        }
    }

    fn playback_controls(&mut self, ui: &mut egui::Ui, button_size: egui::Vec2) {
        if ui.add_sized(button_size, egui::Button::new("▶")).clicked() {
            self.start();
        }
        if ui.add_sized(button_size, egui::Button::new("⏸")).clicked() {
            self.halt();
        }
        if ui.add_sized(button_size, egui::Button::new("|▶")).clicked() {
            if self.input_error.is_none() {
                let ctx = ui.ctx().clone();
                self.advance(&ctx);
            }
            self.playing = false;
        }
        if ui.add_sized(button_size, egui::Button::new("⟲")).clicked() {
            self.reset();
        }
    }

    fn size_input(&mut self, ui: &mut egui::Ui) {
        let resp = ui.add(egui::TextEdit::singleline(&mut self.n_input).desired_width(50.0));
        if resp.changed() {
            self.apply_size_input();
        }
        let revert = resp.lost_focus()
            || (resp.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)));
        if revert && self.input_error.is_none() {
            self.n_input = self.n.to_string();
        }
    }

    fn draw_board(&self, ctx: &egui::Context, ui: &mut egui::Ui, is_mobile: bool) {
        let available_rect = ui.available_rect_before_wrap();
        let margin = if is_mobile { 10.0 } else { 60.0 };
        let size = (available_rect.height() - margin)
            .min(available_rect.width() - margin)
            .max(0.0);
        let center = available_rect.center();
        let board_rect = egui::Rect::from_center_size(center, egui::vec2(size, size));

        // Subtle shadow behind the board.
        ui.painter().rect_filled(
            board_rect.expand(5.0),
            5.0,
            self.theme.text_color.linear_multiply(0.2),
        );

        let n = self.n;
        let cell_size = size / n as f32;
        let painter = ui.painter();

        for row in 0..n {
            for col in 0..n {
                let x = board_rect.min.x + col as f32 * cell_size;
                let y = board_rect.min.y + row as f32 * cell_size;
                let cell_rect =
                    egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(cell_size, cell_size));

                let color = if (row + col) % 2 == 0 {
                    self.theme.board_light
                } else {
                    self.theme.board_dark
                };
                painter.rect_filled(cell_rect, 0.0, color);

                if self.show_threats
                    && square_threatened(&self.engine.positions, row, col)
                {
                    painter.rect_filled(
                        cell_rect.shrink(2.0),
                        2.0,
                        egui::Color32::from_rgba_unmultiplied(255, 0, 0, 40),
                    );
                }

                if self.engine.positions[row] == Some(col) {
                    let font_size = cell_size * 0.7;
                    // Fade in the queen the last step placed.
                    let alpha = if self.highlight == Some(Highlight::Placed { row, col }) {
                        ctx.animate_bool(egui::Id::new(("queen", row, col)), true)
                    } else {
                        1.0
                    };
                    painter.text(
                        cell_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "♛",
                        egui::FontId::proportional(font_size),
                        self.theme.queen_color.linear_multiply(alpha),
                    );
                }
            }
        }

        // Transient highlight of the square the last step touched.
        if let Some(highlight) = self.highlight {
            let (row, col, color) = match highlight {
                Highlight::Placed { row, col } => (row, col, self.theme.probe_color),
                Highlight::Removed { row, col } => (row, col, self.theme.retreat_color),
            };
            if row < n && col < n {
                let x = board_rect.min.x + col as f32 * cell_size;
                let y = board_rect.min.y + row as f32 * cell_size;
                let cell_rect =
                    egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(cell_size, cell_size));
                painter.rect_stroke(cell_rect, 0.0, egui::Stroke::new(3.0, color));
            }
        }

        for p in &self.particles {
            painter.circle_filled(p.pos, p.size, p.color.linear_multiply(p.life));
        }

        // File and rank labels.
        for i in 0..n {
            let font_id = egui::FontId::proportional(cell_size * 0.15);
            let col_char = (b'a' + i as u8) as char;

            let x = board_rect.min.x + i as f32 * cell_size + cell_size / 2.0;
            let y = board_rect.max.y + 10.0;
            painter.text(
                egui::pos2(x, y),
                egui::Align2::CENTER_TOP,
                col_char.to_string(),
                font_id.clone(),
                self.theme.text_color,
            );

            let x = board_rect.min.x - 10.0;
            let y = board_rect.min.y + i as f32 * cell_size + cell_size / 2.0;
            painter.text(
                egui::pos2(x, y),
                egui::Align2::RIGHT_CENTER,
                (i + 1).to_string(),
                font_id,
                self.theme.text_color,
            );
        }
    }
}

impl eframe::App for QueensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Particle animation ---
        let dt = ctx.input(|i| i.stable_dt);
        self.particles.retain_mut(|p| {
            p.pos += p.vel * dt;
            p.vel.y += 800.0 * dt; // Gravity
            p.life -= dt * 1.5;
            p.life > 0.0
        });

        // --- Timer-driven stepping ---
        if self.playing {
            if self.speed >= 10 {
                // Fast-forward: as many steps as fit in one frame budget.
                let start = Instant::now();
                while self.playing && start.elapsed() < Duration::from_millis(16) {
                    self.advance(ctx);
                }
            } else if self.last_update.elapsed().as_millis() as u64 >= step_delay_ms(self.speed) {
                self.advance(ctx);
                self.last_update = Instant::now();
            }
            ctx.request_repaint();
        } else if !self.particles.is_empty() {
            ctx.request_repaint();
        }

        // --- Custom styles ---
        let mut style = (*ctx.style()).clone();
        style.visuals.widgets.noninteractive.bg_fill = self.theme.background;
        style.visuals.window_fill = self.theme.background;
        style.visuals.selection.bg_fill = self.theme.accent_color;
        ctx.set_style(style);

        let panel_frame = egui::Frame::none()
            .fill(self.theme.panel_background)
            .inner_margin(12.0)
            .rounding(10.0)
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(20)));

        let screen_rect = ctx.screen_rect();
        let is_mobile = screen_rect.width() < 700.0;

        let (status_text, status_color) = self.status();

        if is_mobile {
            egui::TopBottomPanel::top("mobile_top")
                .frame(panel_frame.inner_margin(egui::Margin::symmetric(10.0, 5.0)))
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new("♛ N-Queens")
                                .strong()
                                .color(self.theme.accent_color),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(format!("Steps: {}", self.engine.steps))
                                    .strong(),
                            );
                        });
                    });
                });

            egui::TopBottomPanel::bottom("mobile_bottom")
                .frame(panel_frame.inner_margin(egui::Margin::symmetric(15.0, 10.0)))
                .show(ctx, |ui| {
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.label("Size:");
                            if ui.button("-").clicked() && self.n > MIN_N {
                                self.set_board_size(self.n - 1);
                                self.input_error = None;
                            }
                            ui.label(
                                egui::RichText::new(self.n.to_string())
                                    .strong()
                                    .color(self.theme.accent_color),
                            );
                            if ui.button("+").clicked() && self.n < MAX_N {
                                self.set_board_size(self.n + 1);
                                self.input_error = None;
                            }

                            ui.add_space(20.0);
                            ui.label("Speed:");
                            ui.add(egui::Slider::new(&mut self.speed, 1..=10).show_value(true));
                        });

                        ui.add_space(8.0);

                        ui.horizontal(|ui| {
                            ui.checkbox(&mut self.show_threats, "Threats");

                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("🎨 Theme").clicked() {
                                        self.theme = self.theme.next();
                                    }
                                    let solved = self.engine.state == SearchState::Solved;
                                    if ui
                                        .add_enabled(solved, egui::Button::new("💾 Export"))
                                        .clicked()
                                    {
                                        self.export_solution();
                                    }
                                },
                            );
                        });

                        ui.add_space(6.0);
                        ui.vertical_centered(|ui| {
                            ui.label(
                                egui::RichText::new(status_text.clone())
                                    .size(12.0)
                                    .color(status_color),
                            );
                        });

                        ui.add_space(8.0);

                        ui.horizontal_centered(|ui| {
                            let b_size = egui::vec2(ui.available_width() / 4.0 - 5.0, 45.0);
                            self.playback_controls(ui, b_size);
                        });
                    });
                });
        } else {
            egui::SidePanel::right("controls")
                .frame(panel_frame)
                .min_width(320.0)
                .resizable(true)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(8.0);
                            ui.label(
                                egui::RichText::new("♛ N-Queens")
                                    .size(24.0)
                                    .strong()
                                    .color(self.theme.text_color),
                            );
                        });
                        ui.add_space(20.0);
                        ui.label(
                            egui::RichText::new("Configuration")
                                .strong()
                                .color(self.theme.text_color),
                        );
                        ui.separator();
                        ui.horizontal(|ui| {
                            ui.label(format!("Board Size ({MIN_N}-{MAX_N}):"));
                            self.size_input(ui);
                        });
                        ui.add_space(15.0);
                        ui.label(
                            egui::RichText::new("Controls")
                                .strong()
                                .color(self.theme.text_color),
                        );
                        ui.separator();
                        ui.horizontal_wrapped(|ui| {
                            let btn_size = egui::vec2(50.0, 40.0);
                            self.playback_controls(ui, btn_size);
                        });

                        ui.add_space(10.0);
                        ui.label("Speed");
                        ui.add(egui::Slider::new(&mut self.speed, 1..=10).text("Speed"));

                        ui.add_space(10.0);
                        ui.checkbox(&mut self.show_threats, "Show Threatened Squares");

                        ui.add_space(10.0);
                        ui.label("Theme:");
                        egui::ComboBox::from_id_salt("theme_picker")
                            .selected_text(self.theme.name)
                            .show_ui(ui, |ui| {
                                for preset in Theme::presets() {
                                    ui.selectable_value(
                                        &mut self.theme,
                                        preset.clone(),
                                        preset.name,
                                    );
                                }
                            });

                        ui.add_space(20.0);
                        ui.label(
                            egui::RichText::new("Status")
                                .strong()
                                .color(self.theme.text_color),
                        );
                        ui.separator();
                        ui.label(
                            egui::RichText::new(status_text.clone())
                                .size(14.0)
                                .color(status_color),
                        );
                        ui.add_space(4.0);
                        ui.label(
                            egui::RichText::new(format!("Steps: {}", self.engine.steps))
                                .monospace()
                                .size(14.0),
                        );

                        ui.add_space(10.0);
                        let solved = self.engine.state == SearchState::Solved;
                        if ui
                            .add_enabled(solved, egui::Button::new("Export Solution (CSV)"))
                            .clicked()
                        {
                            self.export_solution();
                        }
                    });
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.background))
            .show(ctx, |ui| {
                self.draw_board(ctx, ui, is_mobile);
            });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(
            storage,
            eframe::APP_KEY,
            &Prefs {
                n: self.n,
                speed: self.speed,
                show_threats: self.show_threats,
                theme: self.theme.name.to_owned(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_shrinks_as_speed_rises() {
        assert_eq!(step_delay_ms(1), 450);
        assert_eq!(step_delay_ms(5), 250);
        assert_eq!(step_delay_ms(9), 50);
        assert_eq!(step_delay_ms(10), 0);
    }

    #[test]
    fn threatened_squares_follow_queen_lines() {
        let positions = vec![Some(1), None, None, None];
        // Same row, same column, and diagonal are all threatened.
        assert!(square_threatened(&positions, 0, 3));
        assert!(square_threatened(&positions, 2, 1));
        assert!(square_threatened(&positions, 2, 3));
        // A knight's-move square is not.
        assert!(!square_threatened(&positions, 2, 2));
        // The queen's own square does not threaten itself.
        assert!(!square_threatened(&positions, 0, 1));
    }
}
