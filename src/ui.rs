use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use neon_speed::{
    celebration::{CelebrationAnimation, Rgb},
    game::{GameState, Verdict, REFERENCE_LATENCY},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const SQUARE_WIDTH: u16 = 28;
const SQUARE_HEIGHT: u16 = 11;
const CARD_WIDTH: u16 = 60;
const CARD_HEIGHT: u16 = 14;

const NEON_GREEN: Color = Color::Rgb(0x00, 0xE5, 0x99);
const NEON_CYAN: Color = Color::Rgb(0x12, 0xFF, 0xF7);

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.game.state();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().fg(Color::Gray).add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(2), // tagline
                Constraint::Min(1),    // body
                Constraint::Length(1), // key hints
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "N E O N   S P E E D",
            Style::default().patch(bold_style).fg(NEON_GREEN),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            "Are you able to react as fast as it takes to provision a Postgres database on Neon?",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

        match state {
            GameState::Idle => render_start(chunks[2], buf),
            GameState::Waiting | GameState::Ready => render_square(state, chunks[2], buf),
            GameState::Results => render_results(self, chunks[2], buf),
        }

        let hints = match state {
            GameState::Idle => "space / enter / click: start   q: quit",
            GameState::Waiting => "wait for green...   q: quit",
            GameState::Ready => "space / enter / click: now!",
            GameState::Results => "r / enter: play again   d: deploy postgres   q: quit",
        };
        Paragraph::new(Span::styled(hints, dim_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let overlay = self.game.overlay();
        if overlay.is_active {
            render_celebration(overlay, area, buf);
        }
    }
}

fn render_start(area: Rect, buf: &mut Buffer) {
    let button = centered(area, 24, 3);
    Paragraph::new(Span::styled(
        "Start Game",
        Style::default()
            .fg(Color::Black)
            .bg(NEON_GREEN)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .style(Style::default().fg(Color::Black).bg(NEON_GREEN)),
    )
    .render(button, buf);
}

fn render_square(state: GameState, area: Rect, buf: &mut Buffer) {
    let (color, label, caption) = if state == GameState::Ready {
        (Color::Green, "CLICK NOW!", "Click now!")
    } else {
        (
            Color::Red,
            "Wait...",
            "Get ready! Click when the square turns green.",
        )
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(area);

    let square = centered(chunks[0], SQUARE_WIDTH, SQUARE_HEIGHT);
    let mut lines = vec![Line::from(""); (square.height.saturating_sub(1) / 2) as usize];
    lines.push(Line::from(Span::styled(
        label,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().style(Style::default().bg(color)))
        .render(square, buf);

    Paragraph::new(Span::styled(caption, Style::default().fg(Color::Gray)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let (Some(reaction), Some(verdict)) = (app.game.reaction_time(), app.game.verdict()) else {
        return;
    };

    let label_style = Style::default().fg(Color::Gray);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let message_style = match verdict {
        Verdict::Win => Style::default().patch(bold_style).fg(NEON_GREEN),
        Verdict::TryAgain => Style::default().fg(Color::White),
    };

    let lines = vec![
        Line::from(Span::styled("Your reaction time", label_style)),
        Line::from(Span::styled(
            format!("{} ms", reaction.as_millis()),
            Style::default().patch(bold_style).fg(Color::LightGreen),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Provisioning a Postgres database on Neon takes",
            label_style,
        )),
        Line::from(Span::styled(
            format!("~{} ms", REFERENCE_LATENCY.as_millis()),
            Style::default().patch(bold_style).fg(NEON_CYAN),
        )),
        Line::from(""),
        Line::from(Span::styled(verdict.message(), message_style)),
    ];

    let card = centered(area, CARD_WIDTH, CARD_HEIGHT);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(" Results ", bold_style)),
        )
        .render(card, buf);
}

fn render_celebration(overlay: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    for particle in overlay.visible_particles() {
        let x = area.x.saturating_add(particle.x as u16);
        let y = area.y.saturating_add(particle.y as u16);
        if x >= area.right() || y >= area.bottom() {
            continue;
        }

        if let Some(cell) = buf.cell_mut((x, y)) {
            let mut style = Style::default().fg(rgb(particle.color));
            if particle.is_text {
                style = style.add_modifier(Modifier::BOLD);
            }
            cell.set_char(particle.symbol).set_style(style);
        }
    }
}
