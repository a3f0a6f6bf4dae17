#![allow(clippy::cast_possible_truncation)]

use crate::app::App;
use crate::components::{Board, GameState, Position};
use crate::menu_types::{Button, MENU_BUTTONS, Mode};
use crate::sound::AudioState;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

// Each cell is 2 characters wide and 1 tall
const CELL_WIDTH: u16 = 2;

const BUTTON_WIDTH: u16 = 20;
const BUTTON_HEIGHT: u16 = 3;
const BACK_BUTTON_WIDTH: u16 = 10;

// Rows above the board reserved for the BACK button
const HEADER_HEIGHT: u16 = BUTTON_HEIGHT;

pub fn render(f: &mut Frame, app: &App) {
    match app.mode {
        Mode::Menu => render_menu(f, app),
        Mode::Records => render_records(f, app),
        Mode::Playing | Mode::GameOver => render_game(f, app),
    }
}

/// Button under a pointer press at `column`/`row`, given the frame `area`.
#[must_use]
pub fn button_at(area: Rect, mode: Mode, column: u16, row: u16) -> Option<Button> {
    match mode {
        Mode::Menu => menu_button_rects(area)
            .into_iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(button, _)| button),
        Mode::Records | Mode::GameOver => {
            contains(back_button_rect(area), column, row).then_some(Button::Back)
        }
        Mode::Playing => None,
    }
}

#[must_use]
pub fn menu_button_rects(area: Rect) -> [(Button, Rect); 3] {
    let x = area.x + area.width.saturating_sub(BUTTON_WIDTH) / 2;
    let top = area.y + area.height / 4;

    let mut rects = [(Button::Start, Rect::default()); 3];
    for (i, button) in MENU_BUTTONS.iter().enumerate() {
        let y = top + i as u16 * (BUTTON_HEIGHT + 1);
        rects[i] = (
            *button,
            Rect::new(x, y, BUTTON_WIDTH, BUTTON_HEIGHT).intersection(area),
        );
    }
    rects
}

#[must_use]
pub fn back_button_rect(area: Rect) -> Rect {
    Rect::new(area.x + 1, area.y, BACK_BUTTON_WIDTH, BUTTON_HEIGHT).intersection(area)
}

// Outer size of the bordered board, saturating for boards no terminal can show
fn board_extent(board: &Board) -> (u16, u16) {
    let width = u16::try_from(board.width)
        .unwrap_or(u16::MAX)
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2);
    let height = u16::try_from(board.height)
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    (width, height)
}

/// Where the bordered board goes, horizontally centered under the header.
#[must_use]
pub fn board_rect(area: Rect, board: &Board) -> Rect {
    let (width, height) = board_extent(board);
    let x = area.x + area.width.saturating_sub(width) / 2;
    Rect::new(x, area.y + HEADER_HEIGHT, width, height).intersection(area)
}

#[must_use]
pub fn fits(area: Rect, board: &Board) -> bool {
    let (width, height) = board_extent(board);
    area.width >= width.max(BUTTON_WIDTH)
        && area.height >= height.saturating_add(HEADER_HEIGHT + 2)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn render_button(f: &mut Frame, area: Rect, button: Button, highlighted: bool) {
    let style = if highlighted {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let widget = Paragraph::new(button.label())
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn render_menu(f: &mut Frame, app: &App) {
    let area = f.area();

    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, Rect::new(area.x, area.y, area.width, 2.min(area.height)));

    let selected = app.selected_button();
    let rects = menu_button_rects(area);
    for (button, rect) in rects {
        render_button(f, rect, button, button == selected);
    }

    let status_y = rects[rects.len() - 1].1.bottom().saturating_add(1);
    let status = Paragraph::new(vec![
        Line::from(audio_status(app.audio())),
        Line::from("m music   n sound   +/- volume   q quit")
            .style(Style::default().fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center);
    f.render_widget(
        status,
        Rect::new(area.x, status_y, area.width, 2).intersection(area),
    );
}

/// One-line summary of the sound settings, e.g. `MUSIC: ON   SOUND: OFF   VOLUME: 50%`.
#[must_use]
pub fn audio_status(audio: &AudioState) -> String {
    let on_off = |enabled: bool| if enabled { "ON" } else { "OFF" };
    format!(
        "MUSIC: {}   SOUND: {}   VOLUME: {:.0}%",
        on_off(audio.is_music_enabled()),
        on_off(audio.is_sound_enabled()),
        audio.get_volume() * 100.0
    )
}

fn render_records(f: &mut Frame, app: &App) {
    let area = f.area();
    render_button(f, back_button_rect(area), Button::Back, false);

    let lines: Vec<Line> = app
        .records()
        .iter()
        .enumerate()
        .map(|(i, score)| Line::from(format!("{}: {score}", i + 1)))
        .collect();

    let list_area = Rect::new(
        area.x,
        area.y + HEADER_HEIGHT + 1,
        area.width,
        area.height.saturating_sub(HEADER_HEIGHT + 1),
    );
    let list = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP).title("RECORDS"));
    f.render_widget(list, list_area);
}

fn render_game(f: &mut Frame, app: &App) {
    let area = f.area();
    let board = app.board();
    let game_state = app.game_state();

    if !fits(area, board) {
        let warning = Paragraph::new("Terminal too small!\nPlease resize your terminal.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("BLOCKFALL"));
        f.render_widget(warning, area);
        return;
    }

    let board_area = board_rect(area, board);
    render_board(f, board, board_area);

    let status = Paragraph::new(format!(
        "SCORE: {}   LINES: {}",
        game_state.score, game_state.lines_cleared
    ))
    .alignment(Alignment::Center);
    f.render_widget(
        status,
        Rect::new(area.x, board_area.bottom(), area.width, 1).intersection(area),
    );

    if game_state.is_over() {
        render_game_over(f, game_state, board_area);
        render_button(f, back_button_rect(area), Button::Back, false);
    }
}

fn render_board(f: &mut Frame, board: &Board, area: Rect) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    f.render_widget(Block::default().borders(Borders::ALL), area);

    for x in 0..board.width {
        for y in 0..board.height {
            let occupied = board.is_occupied(Position {
                x: x as i32,
                y: y as i32,
            });
            let (symbol, color) = if occupied {
                ("█", Color::Red)
            } else {
                ("·", Color::DarkGray)
            };

            let cell_x = inner.left() + x as u16 * CELL_WIDTH;
            let cell_y = inner.top() + y as u16;
            for dx in 0..CELL_WIDTH {
                if let Some(cell) = f.buffer_mut().cell_mut((cell_x + dx, cell_y)) {
                    cell.set_symbol(if occupied || dx == 0 { symbol } else { " " });
                    cell.set_fg(color);
                }
            }
        }
    }
}

fn render_game_over(f: &mut Frame, game_state: &GameState, board_area: Rect) {
    let mut lines = vec![
        Line::from("THE END").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(format!("SCORE: {}", game_state.score)),
    ];
    if game_state.is_record {
        lines.push(Line::from("NEW RECORD"));
    }

    let height = lines.len() as u16 + 2;
    let banner_area = centered_rect(board_area.width.saturating_sub(2), height, board_area);
    let banner = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Rgb(255, 211, 95)))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(Clear, banner_area);
    f.render_widget(banner, banner_area);
}

/// Helper function to create a centered rectangle inside another rectangle
#[must_use]
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + r.width.saturating_sub(width) / 2;
    let y = r.y + r.height.saturating_sub(height) / 2;

    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
