//! Clock-division lookup table at 24 PPQN.

/// Ticks per step for each division code, longest first.
const TICKS_PER_STEP: [u8; 17] = [
    192, // 2/1
    144, // 3/2
    96,  // 1/1
    72,  // 3/4
    64,  // 2/3
    48,  // 1/2
    36,  // 3/8
    32,  // 1/3
    24,  // 1/4
    16,  // 1/6
    12,  // 1/8
    8,   // 1/12
    6,   // 1/16
    4,   // 1/24
    3,   // 1/32
    2,   // 1/48
    1,   // 1/96
];

const LABELS: [&str; 17] = [
    "2/1", "3/2", "1/1", "3/4", "2/3", "1/2", "3/8", "1/3", "1/4", "1/6", "1/8", "1/12", "1/16",
    "1/24", "1/32", "1/48", "1/96",
];

/// Highest valid division code.
pub const MAX_DIVISION: u8 = (TICKS_PER_STEP.len() - 1) as u8;

/// Default clock division, one sixteenth note per step.
pub const DEFAULT_DIVISION: u8 = 12;

fn clamp_code(code: u8) -> usize {
    usize::from(code.min(MAX_DIVISION))
}

/// Number of clock ticks covered by `code`. Codes past the end clamp to the
/// shortest division.
pub fn ticks_per_step(code: u8) -> u8 {
    TICKS_PER_STEP[clamp_code(code)]
}

pub fn label(code: u8) -> &'static str {
    LABELS[clamp_code(code)]
}
