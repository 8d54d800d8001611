//! Layout and drawing: playfield, HUD sidebar, pause / win / loss overlays.

use crate::game::{Snapshot, Status};
use crate::grid::Cell;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Terminal columns per grid cell; two keep blocks roughly square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 20;
const POPUP_WIDTH: u16 = 34;

const FILLED: &str = "█";
const EMPTY: [&str; 2] = [" ", "·"];

/// Board size in terminal cells including the border.
fn board_outer_size(snapshot: &Snapshot) -> (u16, u16) {
    let w = snapshot.grid.width() as u16 * CELL_WIDTH + 2;
    let h = snapshot.grid.height() as u16 + 2;
    (w, h)
}

/// Draw one frame from a snapshot.
pub fn draw(frame: &mut Frame, snapshot: &Snapshot, theme: &Theme) {
    let area = frame.area();
    let (bw, bh) = board_outer_size(snapshot);
    let total_w = bw + SIDEBAR_WIDTH;

    // Center horizontally, then vertically
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let buf = frame.buffer_mut();
    draw_board(buf, snapshot, theme, columns[0]);
    draw_sidebar(buf, snapshot, theme, columns[1]);

    match snapshot.status {
        Status::Playing => {}
        Status::Paused => draw_pause_overlay(buf, theme, area),
        Status::Won => draw_win_overlay(buf, snapshot, theme, area),
        Status::Lost => draw_loss_overlay(buf, theme, area),
    }
}

fn draw_board(buf: &mut Buffer, snapshot: &Snapshot, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg));
    let inner = block.inner(area);
    block.render(area, buf);

    let empty_style = Style::default().fg(theme.inactive_fg).bg(theme.bg);
    for (y, row) in snapshot.grid.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            match cell {
                Cell::Filled(c) => put_block(buf, inner, x as i32, y as i32, theme.piece_color(*c), theme.bg),
                Cell::Empty => {
                    for (i, sym) in EMPTY.iter().enumerate() {
                        put(buf, inner, x as i32, y as i32, i as u16, sym, empty_style);
                    }
                }
            }
        }
    }

    if let Some(piece) = &snapshot.piece {
        let color = theme.piece_color(piece.color);
        for (x, y) in piece.cells() {
            put_block(buf, inner, x, y, color, theme.bg);
        }
    }
}

fn put_block(buf: &mut Buffer, inner: Rect, x: i32, y: i32, color: Color, bg: Color) {
    let style = Style::default().fg(color).bg(bg);
    for i in 0..CELL_WIDTH {
        put(buf, inner, x, y, i, FILLED, style);
    }
}

/// Write one terminal cell of grid cell `(x, y)`; anything outside `inner` is skipped.
fn put(buf: &mut Buffer, inner: Rect, x: i32, y: i32, sub: u16, symbol: &str, style: Style) {
    if x < 0 || y < 0 {
        return;
    }
    let rx = inner.x as u32 + x as u32 * CELL_WIDTH as u32 + sub as u32;
    let ry = inner.y as u32 + y as u32;
    if rx < (inner.x + inner.width) as u32 && ry < (inner.y + inner.height) as u32 {
        buf[(rx as u16, ry as u16)].set_symbol(symbol).set_style(style);
    }
}

fn draw_sidebar(buf: &mut Buffer, snapshot: &Snapshot, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Stats (border + score, lines, stage, blocks)
            Constraint::Length(1), // gap
            Constraint::Length(9), // Controls
        ])
        .split(area);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let stats = vec![
        stat("Score: ", snapshot.score.to_string()),
        stat("Lines: ", snapshot.lines_cleared.to_string()),
        stat("Stage: ", format!("{}/{}", snapshot.stage, snapshot.max_stage)),
        stat(
            "Blocks: ",
            format!("{}/{}", snapshot.blocks_broken, snapshot.stage_goal),
        ),
    ];
    Paragraph::new(stats)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .render(chunks[0], buf);

    let controls = [
        ("←→", " move"),
        ("↑", " rotate"),
        ("↓", " soft drop"),
        ("Space", " hard drop"),
        ("P", " pause"),
        ("R", " restart"),
        ("Q", " quit"),
    ]
    .into_iter()
    .map(|(key, what)| {
        Line::from(vec![
            Span::styled(key, title_style),
            Span::styled(what, fg_style),
        ])
    })
    .collect::<Vec<_>>();
    Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .render(chunks[2], buf);
}

fn popup_rect(area: Rect, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(POPUP_WIDTH) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: POPUP_WIDTH.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_popup(buf: &mut Buffer, theme: &Theme, area: Rect, lines: Vec<Line<'_>>) {
    let popup = popup_rect(area, lines.len() as u16 + 2);
    Clear.render(popup, buf);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, buf);
}

fn draw_pause_overlay(buf: &mut Buffer, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " PAUSED ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "P resume    Q quit",
            Style::default().fg(theme.main_fg),
        )),
    ];
    draw_popup(buf, theme, area, lines);
}

fn draw_win_overlay(buf: &mut Buffer, snapshot: &Snapshot, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "CONGRATULATIONS!",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("You completed all {} stages!", snapshot.max_stage),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to play again",
            Style::default().fg(theme.main_fg),
        )),
    ];
    draw_popup(buf, theme, area, lines);
}

fn draw_loss_overlay(buf: &mut Buffer, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " GAME OVER ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to restart",
            Style::default().fg(theme.main_fg),
        )),
    ];
    draw_popup(buf, theme, area, lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::game::GameState;
    use crate::piece::{PieceColor, ShapeKind};
    use crate::rng::SequenceShapes;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Instant;

    fn snapshot_after(kinds: &[ShapeKind], setup: impl FnOnce(&mut GameState<SequenceShapes>)) -> Snapshot {
        let mut state = GameState::new(
            SequenceShapes::new(kinds.to_vec()),
            &GameConfig::default(),
            Instant::now(),
        );
        setup(&mut state);
        state.snapshot()
    }

    fn render(snapshot: &Snapshot) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal
            .draw(|f| draw(f, snapshot, &Theme::default()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.y + area.height)
            .map(|y| {
                (area.x..area.x + area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn blocks_in(buf: &Buffer, color: PieceColor) -> usize {
        let want = Theme::default().piece_color(color);
        buf.content()
            .iter()
            .filter(|c| c.symbol() == FILLED && c.fg == want)
            .count()
    }

    #[test]
    fn test_hud_shows_score_lines_stage_and_blocks() {
        let snap = snapshot_after(&[ShapeKind::T], |s| {
            s.score = 300;
            s.lines_cleared = 3;
            s.stage = 4;
        });
        let screen = text(&render(&snap));
        assert!(screen.contains("Score: 300"), "{screen}");
        assert!(screen.contains("Lines: 3"));
        assert!(screen.contains("Stage: 4/10"));
        assert!(screen.contains("Blocks: 0/1"));
        assert!(!screen.contains("PAUSED"));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_active_piece_and_grid_blocks_are_drawn_in_colour() {
        let snap = snapshot_after(&[ShapeKind::T, ShapeKind::I], |s| s.hard_drop());
        let buf = render(&snap);
        assert_eq!(blocks_in(&buf, PieceColor::Magenta), 4 * CELL_WIDTH as usize);
        assert_eq!(blocks_in(&buf, PieceColor::Cyan), 4 * CELL_WIDTH as usize);
        assert!(text(&buf).contains('·'));
    }

    #[test]
    fn test_pause_hides_piece_and_shows_overlay() {
        let snap = snapshot_after(&[ShapeKind::T], |s| s.toggle_pause());
        let buf = render(&snap);
        assert_eq!(blocks_in(&buf, PieceColor::Magenta), 0);
        assert!(text(&buf).contains("PAUSED"));
    }

    #[test]
    fn test_win_and_loss_overlays_are_exclusive() {
        let mut snap = snapshot_after(&[ShapeKind::O], |_| {});
        snap.piece = None;

        snap.status = Status::Won;
        let won = text(&render(&snap));
        assert!(won.contains("CONGRATULATIONS!"));
        assert!(won.contains("You completed all 10 stages!"));
        assert!(won.contains("Press R to play again"));
        assert!(!won.contains("GAME OVER"));

        snap.status = Status::Lost;
        let lost = text(&render(&snap));
        assert!(lost.contains("GAME OVER"));
        assert!(lost.contains("Press R to restart"));
        assert!(!lost.contains("CONGRATULATIONS!"));
    }

    #[test]
    fn test_board_border_and_two_wide_locked_cell() {
        let mut snap = snapshot_after(&[ShapeKind::O], |_| {});
        snap.piece = None;
        snap.grid.set(0, 19, PieceColor::Red).unwrap();

        // Exactly board (22) + sidebar (20) wide, board height tall: no centering slack.
        let mut terminal = Terminal::new(TestBackend::new(42, 22)).unwrap();
        terminal
            .draw(|f| draw(f, &snap, &Theme::default()))
            .unwrap();
        let buf = terminal.backend().buffer();

        assert_eq!(buf[(0, 0)].symbol(), "┌");
        assert_eq!(buf[(21, 0)].symbol(), "┐");
        assert_eq!(buf[(0, 21)].symbol(), "└");
        assert_eq!(buf[(21, 21)].symbol(), "┘");
        assert_eq!(buf[(1, 20)].symbol(), FILLED);
        assert_eq!(buf[(2, 20)].symbol(), FILLED);
        assert_eq!(buf[(1, 20)].fg, Theme::default().piece_color(PieceColor::Red));
        assert_eq!(buf[(4, 20)].symbol(), "·");
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let snap = snapshot_after(&[ShapeKind::I], |_| {});
        let mut terminal = Terminal::new(TestBackend::new(12, 6)).unwrap();
        terminal
            .draw(|f| draw(f, &snap, &Theme::default()))
            .unwrap();
    }
}
