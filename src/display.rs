//! Rendering layer — all terminal drawing lives here.
//!
//! The renderer receives an immutable view of the game state each frame and
//! translates it into crossterm commands.  No game logic is performed.  The
//! world field is stretched over the terminal area inside the border, so a
//! resize simply changes the scale.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use car_dodge::entities::{GameState, Rect, Screen};
use car_dodge::platform::Renderer;
use car_dodge::rules::Ruleset;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_ROAD_EDGE: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_SHIELD: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_SHIELDED: Color = Color::Cyan;
const C_OBSTACLE: Color = Color::Red;
const C_POWER_UP: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Play area inside the border, in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Area {
    col: u16,
    row: u16,
    width: u16,
    height: u16,
}

impl Area {
    /// Row 0 is the HUD, row 1 and `height - 2` the border, the last row the
    /// controls hint.
    fn for_terminal(width: u16, height: u16) -> Area {
        Area {
            col: 1,
            row: 2,
            width: width.saturating_sub(2).max(1),
            height: height.saturating_sub(4).max(1),
        }
    }
}

/// Map the world span `[start, start + len)` clipped to `[0, world)` onto
/// `cells` terminal cells.  Returns the first cell and the cell count, which
/// is at least one for anything visible.
fn cell_span(start: i32, len: i32, world: i32, cells: u16) -> Option<(u16, u16)> {
    let a = start.max(0) as i64;
    let b = (start + len).min(world) as i64;
    if b <= a || world <= 0 {
        return None;
    }
    let (world, cells) = (world as i64, cells as i64);
    let first = (a * cells / world).min(cells - 1);
    let last = ((b * cells + world - 1) / world).clamp(first + 1, cells);
    Some((first as u16, (last - first) as u16))
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Fixed size for headless rendering; `None` asks the terminal.
    size: Option<(u16, u16)>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, size: None }
    }

    #[cfg(test)]
    fn with_size(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            size: Some((width, height)),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn terminal_size(&self) -> std::io::Result<(u16, u16)> {
        match self.size {
            Some(size) => Ok(size),
            None => terminal::size(),
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    /// Render one complete frame.
    fn render(&mut self, state: &GameState) -> std::io::Result<()> {
        let (width, height) = self.terminal_size()?;
        let area = Area::for_terminal(width, height);
        let out = &mut self.out;

        out.queue(terminal::Clear(terminal::ClearType::All))?;

        match state.screen {
            Screen::Start => {
                draw_border(out, width, height)?;
                draw_start(out, state, width, height)?;
            }
            Screen::Playing | Screen::Paused => {
                draw_border(out, width, height)?;
                draw_road_edges(out, state, area)?;
                draw_field(out, state, area)?;
                draw_hud(out, state, width)?;
                if state.screen == Screen::Paused {
                    draw_paused(out, width, height)?;
                }
            }
            Screen::GameOver => {
                draw_border(out, width, height)?;
                draw_hud(out, state, width)?;
                draw_game_over(out, state, width, height)?;
            }
        }
        draw_controls_hint(out, state, height)?;

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
        out.flush()
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

/// Dotted lines where the player's horizontal range ends, when that is
/// narrower than the field.
fn draw_road_edges<W: Write>(out: &mut W, state: &GameState, area: Area) -> std::io::Result<()> {
    let rules = &state.rules;
    let road_right = rules.x_max + rules.player_width;
    if rules.x_min <= 0 && road_right >= rules.field_width {
        return Ok(());
    }

    out.queue(style::SetForegroundColor(C_ROAD_EDGE))?;
    let edges = [
        cell_span(rules.x_min - 1, 1, rules.field_width, area.width),
        cell_span(road_right, 1, rules.field_width, area.width),
    ];
    for (col, _) in edges.into_iter().flatten() {
        for row in 0..area.height {
            out.queue(cursor::MoveTo(area.col + col, area.row + row))?;
            out.queue(Print("┊"))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_field<W: Write>(out: &mut W, state: &GameState, area: Area) -> std::io::Result<()> {
    for obstacle in &state.obstacles {
        fill_rect(out, state, area, &obstacle.rect, "▓", C_OBSTACLE)?;
    }
    for power_up in &state.power_ups {
        fill_rect(out, state, area, &power_up.rect, "◆", C_POWER_UP)?;
    }
    let color = if state.shield_active() {
        C_PLAYER_SHIELDED
    } else {
        C_PLAYER
    };
    fill_rect(out, state, area, &state.player.rect, "█", color)
}

fn fill_rect<W: Write>(
    out: &mut W,
    state: &GameState,
    area: Area,
    rect: &Rect,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let rules = &state.rules;
    let Some((col, cols)) = cell_span(rect.x, rect.w, rules.field_width, area.width) else {
        return Ok(());
    };
    let Some((row, rows)) = cell_span(rect.y, rect.h, rules.field_height, area.height) else {
        return Ok(());
    };

    out.queue(style::SetForegroundColor(color))?;
    let line = glyph.repeat(cols as usize);
    for r in row..row + rows {
        out.queue(cursor::MoveTo(area.col + col, area.row + r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>5}  Hi:{:>5}",
        state.score,
        state.high_score.max(state.score)
    )))?;

    let level_str = format!("[ LEVEL {} ]", state.level);
    let lx = (width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    if state.rules.power_up.is_some() {
        let shield_str = if state.shield_active() {
            format!("SHIELD {:>4.1}s", state.shield_remaining().as_secs_f32())
        } else {
            "SHIELD  off".to_string()
        };
        let rx = width.saturating_sub(shield_str.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(rx, 0))?;
        out.queue(style::SetForegroundColor(if state.shield_active() {
            C_HUD_SHIELD
        } else {
            C_HINT
        }))?;
        out.queue(Print(&shield_str))?;
    }

    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_start<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cy = height / 2;
    print_centered(out, width, cy.saturating_sub(6), "═══  CAR  DODGE  ═══", Color::Cyan)?;

    if state.high_score > 0 {
        let best = format!("Best Score: {}", state.high_score);
        print_centered(out, width, cy.saturating_sub(5), &best, Color::Yellow)?;
    }

    let left = (width / 2).saturating_sub(22);
    out.queue(cursor::MoveTo(left, cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Choose a ruleset:"))?;

    for (i, ruleset) in Ruleset::ALL.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        let selected = *ruleset == state.ruleset();
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(if selected {
            Color::Yellow
        } else {
            Color::White
        }))?;
        out.queue(Print(format!(
            "{}{:<8}",
            if selected { "▸" } else { " " },
            ruleset.as_str()
        )))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!(" {}", ruleset.blurb())))?;
    }

    print_centered(out, width, cy + 4, "Press SPACE to Start", Color::White)
}

fn draw_paused<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let cy = height / 2;
    print_centered(out, width, cy.saturating_sub(1), "╔════════════╗", Color::White)?;
    print_centered(out, width, cy, "║   PAUSED   ║", Color::White)?;
    print_centered(out, width, cy + 1, "╚════════════╝", Color::White)?;
    print_centered(out, width, cy + 2, "Press P to Resume", C_HINT)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let new_best = state.new_best;
    let score_line = format!("Score: {} | Level: {}", state.score, state.level);
    let best_line = if new_best {
        format!("★ NEW BEST: {} ★", state.score)
    } else {
        format!("Best Score: {}", state.high_score)
    };

    let start = (height / 2).saturating_sub(3);
    print_centered(out, width, start, "╔════════════════════╗", Color::Red)?;
    print_centered(out, width, start + 1, "║     GAME  OVER     ║", Color::Red)?;
    print_centered(out, width, start + 2, "╚════════════════════╝", Color::Red)?;
    print_centered(out, width, start + 3, &score_line, Color::Yellow)?;
    print_centered(
        out,
        width,
        start + 4,
        &best_line,
        if new_best { Color::Yellow } else { C_HINT },
    )?;
    print_centered(out, width, start + 5, "R - Restart  Q - Quit", Color::White)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &GameState,
    height: u16,
) -> std::io::Result<()> {
    let hint = match state.screen {
        Screen::Start => "1-3 : Ruleset   SPACE : Start   Q : Quit",
        Screen::GameOver => "R : Restart   Q : Quit",
        Screen::Playing | Screen::Paused if state.rules.allows_vertical() => {
            "← → ↑ ↓ / WASD : Steer   P : Pause   Q : Quit"
        }
        Screen::Playing | Screen::Paused => "← → / A D : Steer   P : Pause   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_dodge::compute::{init_state, reset};

    #[test]
    fn span_covers_whole_field() {
        assert_eq!(cell_span(0, 400, 400, 40), Some((0, 40)));
    }

    #[test]
    fn span_is_at_least_one_cell() {
        assert_eq!(cell_span(200, 1, 400, 40), Some((20, 1)));
    }

    #[test]
    fn span_clips_above_field() {
        // An obstacle just spawned at y = -80 is invisible, half-way in shows
        // only its lower part.
        assert_eq!(cell_span(-80, 80, 600, 30), None);
        assert_eq!(cell_span(-40, 80, 600, 30), Some((0, 2)));
    }

    #[test]
    fn span_clamps_to_last_cell() {
        assert_eq!(cell_span(399, 1, 400, 40), Some((39, 1)));
    }

    fn render_to_string(state: &GameState) -> String {
        let mut renderer = TerminalRenderer::with_size(Vec::new(), 60, 24);
        renderer.render(state).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn start_screen_lists_rulesets() {
        let text = render_to_string(&init_state(Ruleset::Lanes, 42));
        assert!(text.contains("CAR  DODGE"));
        assert!(text.contains("Best Score: 42"));
        for ruleset in Ruleset::ALL {
            assert!(text.contains(ruleset.as_str()));
        }
    }

    #[test]
    fn paused_overlay_drawn_over_field() {
        let mut state = reset(&init_state(Ruleset::Shield, 0));
        state.screen = Screen::Paused;
        let text = render_to_string(&state);
        assert!(text.contains("PAUSED"));
        assert!(text.contains("█"));
        assert!(text.contains("SHIELD  off"));
    }

    #[test]
    fn game_over_shows_new_best() {
        let mut state = reset(&init_state(Ruleset::Classic, 3));
        state.score = 7;
        state.high_score = 7;
        state.new_best = true;
        state.screen = Screen::GameOver;
        let text = render_to_string(&state);
        assert!(text.contains("GAME  OVER"));
        assert!(text.contains("NEW BEST: 7"));
    }

    #[test]
    fn game_over_tie_is_not_new_best() {
        let mut state = reset(&init_state(Ruleset::Classic, 7));
        state.score = 7;
        state.screen = Screen::GameOver;
        let text = render_to_string(&state);
        assert!(!text.contains("NEW BEST"));
        assert!(text.contains("Best Score: 7"));
    }
}
