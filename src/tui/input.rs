use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::middle::kit_for_key;
use crate::shared::{InputEvent, PadId};

const VOLUME_STEP: f32 = 0.05;
const PARAM_STEP: f32 = 0.05;

// poll for a key from the terminal and resolve it to input events for the middle
pub fn poll_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }
    if let Event::Key(key) = event::read()? {
        // only presses; repeats and releases would double-trigger pads
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key));
    }
    Ok(vec![])
}

fn handle_key(key: KeyEvent) -> Vec<InputEvent> {
    let code = match key.code {
        // some terminals report shift as a modifier on the lowercase char
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::SHIFT) => {
            KeyCode::Char(c.to_ascii_uppercase())
        }
        code => code,
    };
    match code {
        KeyCode::Esc => vec![InputEvent::Quit],
        KeyCode::Char(' ') => vec![InputEvent::TogglePlay],

        // pads: lowercase plays, uppercase selects for editing
        KeyCode::Char(c) if char_to_pad(c).is_some() => match char_to_pad(c) {
            Some(pad) if c.is_ascii_uppercase() => vec![InputEvent::SelectPad(pad)],
            Some(pad) => vec![InputEvent::TriggerPad(pad)],
            None => vec![],
        },
        KeyCode::Char(c @ '1'..='3') => c
            .to_digit(10)
            .and_then(|n| kit_for_key(n as u8))
            .map(InputEvent::SelectKit)
            .into_iter()
            .collect(),

        // transport
        KeyCode::Char('b') => vec![InputEvent::ToggleRecord],
        KeyCode::Char('.') => vec![InputEvent::Stop],
        KeyCode::Char('o') => vec![InputEvent::ToggleLoop],
        KeyCode::Char('m') => vec![InputEvent::ToggleMute],
        KeyCode::Char('t') => vec![InputEvent::ToggleMetronome],
        KeyCode::Char('-') => vec![InputEvent::AdjustTempo(-1)],
        KeyCode::Char('=') => vec![InputEvent::AdjustTempo(1)],
        KeyCode::Char('[') => vec![InputEvent::AdjustVolume(-VOLUME_STEP)],
        KeyCode::Char(']') => vec![InputEvent::AdjustVolume(VOLUME_STEP)],

        // effects on the selected pad
        KeyCode::Char('g') => vec![InputEvent::NextParam],
        KeyCode::Char(',') => vec![InputEvent::AdjustParam(-PARAM_STEP)],
        KeyCode::Char('/') => vec![InputEvent::AdjustParam(PARAM_STEP)],
        KeyCode::Char('h') => vec![InputEvent::ToggleParam],

        // files
        KeyCode::Char('k') => vec![InputEvent::SaveKit],
        KeyCode::Char('K') => vec![InputEvent::LoadKit],
        KeyCode::Char('i') => vec![InputEvent::ImportSample],
        KeyCode::Char('I') => vec![InputEvent::RemoveSample],

        _ => vec![],
    }
}

// q w e r / a s d f, either case
fn char_to_pad(c: char) -> Option<PadId> {
    let pad = match c.to_ascii_lowercase() {
        'q' => PadId::Kick,
        'w' => PadId::Snare,
        'e' => PadId::HiHat,
        'r' => PadId::Clap,
        'a' => PadId::Tom1,
        's' => PadId::Tom2,
        'd' => PadId::Crash,
        'f' => PadId::Ride,
        _ => return None,
    };
    Some(pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::KitId;

    fn key(c: char) -> Vec<InputEvent> {
        handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn pad_keys_trigger_and_shifted_keys_select() {
        assert_eq!(key('q'), vec![InputEvent::TriggerPad(PadId::Kick)]);
        assert_eq!(key('f'), vec![InputEvent::TriggerPad(PadId::Ride)]);
        assert_eq!(key('S'), vec![InputEvent::SelectPad(PadId::Tom2)]);
        let shifted = handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::SHIFT));
        assert_eq!(shifted, vec![InputEvent::SelectPad(PadId::HiHat)]);
    }

    #[test]
    fn every_pad_has_a_key_matching_its_label() {
        for pad in PadId::ALL {
            assert_eq!(char_to_pad(pad.key()), Some(pad));
        }
    }

    #[test]
    fn number_keys_pick_kits() {
        assert_eq!(key('2'), vec![InputEvent::SelectKit(KitId::Electronic)]);
        assert_eq!(key('4'), vec![]);
    }

    #[test]
    fn file_keys_use_case_for_the_inverse_action() {
        assert_eq!(key('k'), vec![InputEvent::SaveKit]);
        assert_eq!(key('K'), vec![InputEvent::LoadKit]);
        assert_eq!(key('i'), vec![InputEvent::ImportSample]);
        assert_eq!(key('I'), vec![InputEvent::RemoveSample]);
    }

    #[test]
    fn transport_keys() {
        assert_eq!(key(' '), vec![InputEvent::TogglePlay]);
        assert_eq!(key('b'), vec![InputEvent::ToggleRecord]);
        assert_eq!(key('='), vec![InputEvent::AdjustTempo(1)]);
        assert_eq!(
            handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            vec![InputEvent::Quit]
        );
        assert_eq!(key('z'), vec![]);
    }
}
