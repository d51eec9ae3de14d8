use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::shared::{DisplayState, PadId};

const COLS: usize = 4;
const ROWS: usize = 2;

// 2x4 pads in PadId order: kick snare hihat clap / tom1 tom2 crash ride
pub fn draw_pad_grid(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, ROWS as u32); ROWS])
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, COLS as u32); COLS])
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            if let Some(pad) = PadId::from_index(row_idx * COLS + col_idx) {
                draw_pad(frame, *cell_area, pad, state);
            }
        }
    }
}

fn draw_pad(frame: &mut Frame, area: Rect, pad: PadId, state: &DisplayState) {
    let lit = state.active_pad == Some(pad);
    let selected = state.selected_pad == Some(pad);
    let style = if lit {
        Style::default().fg(Color::LightMagenta).bg(Color::Magenta)
    } else if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let border = if selected { BorderType::Double } else { BorderType::Rounded };

    // a star marks pads playing a user sample
    let custom = if state.custom[pad.index()] { " *" } else { "" };
    let block = Block::bordered()
        .border_type(border)
        .border_style(style)
        .title(format!(" {} ", pad.key()));
    let label = Line::from(format!("{}{custom}", pad.label())).style(style.add_modifier(Modifier::BOLD));
    let body = Paragraph::new(label).alignment(Alignment::Center).block(block).style(style);
    frame.render_widget(body, area);
}
