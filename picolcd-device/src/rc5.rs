//! Philips RC5 infrared decoder
//!
//! The PicoLCD does not decode IR itself; it reports the receiver output as
//! a list of signed pulse durations. RC5 is bi-phase coded with a bit period
//! of ~1778us, so every level lasts either half a bit (short) or a full bit
//! (long, two equal half-bits back to back).
//!
//! Decoding runs in two passes:
//!
//! 1. durations -> half-bit levels (short = 1 level, long = 2 levels)
//! 2. half-bit pairs -> code bits: `(0,1)` is a 1, `(1,0)` is a 0
//!
//! The leading half of the first start bit is idle line and never shows up
//! in the samples, so level 0 is the second half of start bit 1.

use thiserror::Error;
use tracing::{debug, trace};

/// Shortest accepted half-bit duration (exclusive lower bound 444)
pub const SHORT_MIN: u16 = 445;
/// Longest short duration; anything above is a full bit
pub const SHORT_MAX: u16 = 1332;
/// Longest accepted full-bit duration (exclusive upper bound 2222)
pub const LONG_MAX: u16 = 2221;

/// Bits in an RC5 code: 2 start, 1 toggle, 5 address, 6 command
pub const CODE_BITS: usize = 14;
/// Half-bit levels needed to read a full code (the trailing half is optional)
pub const MIN_RAW_BITS: usize = 0x1A;
/// Capacity of the half-bit buffer; one IR report cannot exceed it
pub const RAW_CAPACITY: usize = 128;

/// Why an IR frame was not accepted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rc5Error {
    #[error("pulse duration {0} outside the RC5 timing bands")]
    InvalidDuration(i16),

    #[error("more than 128 half-bits in one frame")]
    Overflow,

    #[error("only {0} half-bits, need 26")]
    InsufficientData(usize),

    #[error("invalid bi-phase pair at half-bit {0}")]
    Framing(usize),
}

/// A decoded RC5 code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedIr {
    /// Start bits (S1, S2/field); 0b11 for classic RC5
    pub start: u8,
    /// Toggles on every new key press
    pub toggle: bool,
    /// 5-bit system address
    pub address: u8,
    /// 6-bit command
    pub command: u8,
}

impl DecodedIr {
    /// Packed code word: `00 SS 0 AAAAA CCCCCC`
    ///
    /// The toggle slot stays zero so repeated presses of one key compare
    /// equal.
    pub fn packed(&self) -> u16 {
        (u16::from(self.start & 0x03) << 12)
            | (u16::from(self.address & 0x1F) << 6)
            | u16::from(self.command & 0x3F)
    }
}

/// Duration band of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Short,
    Long,
}

fn classify(duration: u16) -> Option<Band> {
    match duration {
        SHORT_MIN..=SHORT_MAX => Some(Band::Short),
        d if d > SHORT_MAX && d <= LONG_MAX => Some(Band::Long),
        _ => None,
    }
}

/// Stateful RC5 decoder
///
/// Holds the half-bit and code buffers between the two decoding passes.
/// Both counters are zero whenever `decode` returns, success or not.
#[derive(Debug, Clone)]
pub struct Rc5Decoder {
    raw: [u8; RAW_CAPACITY],
    raw_bit_count: usize,
    code: [u8; CODE_BITS],
    bit_count: usize,
}

impl Default for Rc5Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Rc5Decoder {
    pub fn new() -> Self {
        Self {
            raw: [0; RAW_CAPACITY],
            raw_bit_count: 0,
            code: [0; CODE_BITS],
            bit_count: 0,
        }
    }

    /// Half-bits currently buffered
    pub fn raw_bit_count(&self) -> usize {
        self.raw_bit_count
    }

    /// Code bits currently assembled
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Drop all buffered bits
    pub fn reset(&mut self) {
        self.raw_bit_count = 0;
        self.bit_count = 0;
    }

    /// Decode one IR frame
    pub fn decode(&mut self, samples: &[i16]) -> Result<DecodedIr, Rc5Error> {
        self.reset();
        let result = self.decode_inner(samples);
        if let Err(e) = &result {
            debug!("RC5 decode failed: {}", e);
        }
        self.reset();
        result
    }

    fn push_raw(&mut self, level: u8) -> Result<(), Rc5Error> {
        let slot = self
            .raw
            .get_mut(self.raw_bit_count)
            .ok_or(Rc5Error::Overflow)?;
        *slot = level;
        self.raw_bit_count += 1;
        Ok(())
    }

    fn push_code(&mut self, bit: u8) {
        self.code[self.bit_count] = bit;
        self.bit_count += 1;
    }

    fn decode_inner(&mut self, samples: &[i16]) -> Result<DecodedIr, Rc5Error> {
        // Pass 1: durations -> half-bit levels. Positive samples are low
        // (space), negative samples are high (pulse).
        for &sample in samples {
            let level = u8::from(sample < 0);
            let band = classify(sample.unsigned_abs()).ok_or(Rc5Error::InvalidDuration(sample))?;
            self.push_raw(level)?;
            if band == Band::Long {
                self.push_raw(level)?;
            }
        }
        trace!("RC5 half-bits: {:?}", &self.raw[..self.raw_bit_count]);

        if self.raw_bit_count < MIN_RAW_BITS {
            return Err(Rc5Error::InsufficientData(self.raw_bit_count));
        }

        // Pass 2: every complete pair from index 1 must be a transition,
        // including pairs past the last code bit
        let mut i = 1;
        while i + 1 < self.raw_bit_count {
            if self.raw[i] == self.raw[i + 1] {
                return Err(Rc5Error::Framing(i));
            }
            i += 2;
        }

        // Start bit 1 is implied; (0,1) is a 1, (1,0) is a 0
        self.push_code(1);
        for pair in 0..CODE_BITS - 2 {
            let bit = u8::from(self.raw[1 + 2 * pair] == 0);
            self.push_code(bit);
        }

        // The last bit may have lost its second half to the idle line; its
        // first half alone decides it.
        let last = self.raw[MIN_RAW_BITS - 1];
        self.push_code(u8::from(last == 0));

        let field = |range: std::ops::Range<usize>| {
            self.code[range]
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | bit)
        };
        Ok(DecodedIr {
            start: field(0..2),
            toggle: self.code[2] == 1,
            address: field(3..8),
            command: field(8..14),
        })
    }
}

/// Decode one IR frame with a fresh decoder
pub fn decode_rc5(samples: &[i16]) -> Result<DecodedIr, Rc5Error> {
    Rc5Decoder::new().decode(samples)
}
