use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use super::grid::draw_pad_grid;
use crate::shared::{DisplayState, LED_SLOTS, TransportState};

const HELP: &str = "qwer/asdf pads  QWER/ASDF edit  spc play  b rec  . stop  o loop  t click  \
                    -/= tempo  [/] vol  m mute  1-3 kit  g param  ,// adjust  h on/off  \
                    k/K save/load kit  i/I import/remove  esc quit";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // lcd screen
            Constraint::Min(8),    // pad grid
            Constraint::Length(2), // key help
        ])
        .split(area);

    draw_screen(frame, sections[0], state, blink_on);
    draw_pad_grid(frame, sections[1], state);
    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    frame.render_widget(help, sections[2]);
}

fn draw_screen(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let lines = vec![
        status_line(state, blink_on),
        Line::from(Span::styled(
            state.message.clone(),
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        )),
        led_line(state.led),
        edit_line(state),
    ];
    let screen = Paragraph::new(lines).block(Block::bordered().title(" drumtty "));
    frame.render_widget(screen, area);
}

fn status_line(state: &DisplayState, blink_on: bool) -> Line<'static> {
    let transport = match state.transport {
        // recording blinks so it is hard to miss
        TransportState::Recording if blink_on => Span::styled("● REC", Style::default().fg(Color::Red)),
        TransportState::Recording => Span::raw("  REC"),
        TransportState::Playing => Span::styled("▶ PLAY", Style::default().fg(Color::Green)),
        TransportState::Idle => Span::raw(state.transport.label()),
    };
    let volume = if state.muted {
        Span::styled("MUTE", Style::default().fg(Color::Red))
    } else {
        Span::raw(format!("VOL {:.0}%", state.volume * 100.0))
    };
    let mut spans = vec![
        transport,
        Span::raw(format!("  KIT {}", state.kit.as_str().to_uppercase())),
        Span::raw(format!("  BPM {}  ", state.bpm)),
        volume,
    ];
    if state.looping {
        spans.push(Span::raw("  LOOP"));
    }
    if state.metronome {
        spans.push(Span::raw("  CLICK"));
    }
    if !state.audio_ok {
        spans.push(Span::styled("  NO AUDIO", Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

fn led_line(led: i8) -> Line<'static> {
    let spans: Vec<Span> = (0..LED_SLOTS)
        .map(|slot| {
            if slot == led {
                Span::styled("● ", Style::default().fg(Color::LightRed))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    Line::from(spans)
}

fn edit_line(state: &DisplayState) -> Line<'static> {
    let Some(pad) = state.selected_pad else {
        return Line::from(Span::styled(
            "shift + pad key to edit effects",
            Style::default().fg(Color::DarkGray),
        ));
    };
    let on = if state.param_enabled { "on" } else { "off" };
    Line::from(format!(
        "EDIT {}  {} {:.2} [{on}]",
        pad.label(),
        state.param.label(),
        state.param_value
    ))
}
