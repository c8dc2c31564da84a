//! Custom character glyphs
//!
//! Both controllers have 8 CGRAM slots of 5x8 pixels. A glyph is stored as
//! eight row bytes, top row first, using the low 5 bits of each byte.

use crate::profile::DeviceProfile;

/// Number of CGRAM slots
pub const GLYPH_SLOTS: u8 = 8;

/// Pixel columns per glyph row
pub const GLYPH_WIDTH: usize = 5;

const ROW_MASK: u8 = 0x1F;

/// One 5x8 custom character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Glyph([u8; 8]);

impl Glyph {
    pub const BLANK: Glyph = Glyph([0; 8]);

    /// Build from row bytes; bits above the 5 pixel columns are dropped
    pub const fn from_rows(rows: [u8; 8]) -> Self {
        let mut masked = [0u8; 8];
        let mut i = 0;
        while i < 8 {
            masked[i] = rows[i] & ROW_MASK;
            i += 1;
        }
        Glyph(masked)
    }

    /// Build from ASCII art, `#` or `*` marking a lit pixel
    ///
    /// ```
    /// use picolcd_device::Glyph;
    ///
    /// let arrow = Glyph::from_art([
    ///     "..#..",
    ///     ".###.",
    ///     "#.#.#",
    ///     "..#..",
    ///     "..#..",
    ///     "..#..",
    ///     "..#..",
    ///     ".....",
    /// ]);
    /// assert_eq!(arrow.rows()[1], 0b01110);
    /// ```
    pub fn from_art(art: [&str; 8]) -> Self {
        let mut rows = [0u8; 8];
        for (row, line) in rows.iter_mut().zip(art) {
            *row = line
                .bytes()
                .take(GLYPH_WIDTH)
                .enumerate()
                .filter(|&(_, c)| matches!(c, b'#' | b'*'))
                .fold(0, |acc, (x, _)| acc | (0x10 >> x));
        }
        Glyph(rows)
    }

    pub fn rows(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        x < GLYPH_WIDTH && y < 8 && self.0[y] & (0x10 >> x) != 0
    }
}

impl From<[u8; 8]> for Glyph {
    fn from(rows: [u8; 8]) -> Self {
        Glyph::from_rows(rows)
    }
}

/// Character code that displays CGRAM slot `index`
///
/// The controller mirrors slots 0-7 at codes 0x08-0x0F; the mirrored code
/// is returned so text never contains NUL.
pub const fn special_char(index: u8) -> u8 {
    0x08 | (index & 0x07)
}

/// Bars stacked in one character row by the bar-graph glyph set
pub const BARS_PER_ROW: usize = 3;

/// Glyph set for three stacked horizontal bars per text row
///
/// Slot `n` lights bar `k` (top to bottom) when bit `k` of `n` is set, so a
/// cell's slot is simply the bitmask of the bars covering it.
pub const BAR_GRAPH: [Glyph; GLYPH_SLOTS as usize] = {
    let mut set = [Glyph::BLANK; GLYPH_SLOTS as usize];
    let mut slot = 0;
    while slot < GLYPH_SLOTS as usize {
        let mut rows = [0u8; 8];
        let mut bar = 0;
        while bar < BARS_PER_ROW {
            if slot & (1 << bar) != 0 {
                rows[bar * 3] = ROW_MASK;
                rows[bar * 3 + 1] = ROW_MASK;
            }
            bar += 1;
        }
        set[slot] = Glyph(rows);
        slot += 1;
    }
    set
};

/// Render bar lengths (in cells) as text rows of bar-graph characters
///
/// Every three bars share a row; a trailing partial group still gets a row.
/// Lengths beyond the line width fill the whole row.
pub fn bar_graph_rows(profile: &DeviceProfile, levels: &[u8]) -> Vec<Vec<u8>> {
    let width = usize::from(profile.cols);
    levels
        .chunks(BARS_PER_ROW)
        .map(|group| {
            (0..width)
                .map(|cell| {
                    let mask = group
                        .iter()
                        .enumerate()
                        .filter(|&(_, &len)| cell < usize::from(len))
                        .fold(0u8, |acc, (bar, _)| acc | (1 << bar));
                    special_char(mask)
                })
                .collect()
        })
        .collect()
}
