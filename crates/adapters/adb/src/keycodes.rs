//! Remote-control key names and their Android keycodes.

/// Named keys accepted by the `button` action.
pub const KEYCODES: &[(&str, u32)] = &[
    ("HOME", 3),
    ("BACK", 4),
    ("UP", 19),
    ("DOWN", 20),
    ("LEFT", 21),
    ("RIGHT", 22),
    ("SELECT", 23),
    ("ENTER", 66),
    ("PLAY", 126),
    ("PAUSE", 127),
    ("STOP", 86),
    ("NEXT", 87),
    ("PREVIOUS", 88),
    ("REWIND", 89),
    ("FAST_FORWARD", 90),
    ("MUTE", 164),
    ("VOLUME_UP", 24),
    ("VOLUME_DOWN", 25),
    ("0", 7),
    ("1", 8),
    ("2", 9),
    ("3", 10),
    ("4", 11),
    ("5", 12),
    ("6", 13),
    ("7", 14),
    ("8", 15),
    ("9", 16),
];

/// Resolve an already upper-cased key name to a keycode.
///
/// Table entries win, so single digits map to the digit keys; any other
/// all-digit input is taken as a raw keycode.
#[must_use]
pub fn resolve(key: &str) -> Option<u32> {
    if let Some((_, code)) = KEYCODES.iter().find(|(name, _)| *name == key) {
        return Some(*code);
    }
    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        return key.parse().ok();
    }
    None
}
