//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::convert_to_gbk;
use crate::markup::{Align, TextStyle};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const CAN: u8 = 0x18;

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is written as
/// UTF-8 and converted to GBK by [`build`](Self::build).
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    /// Create a new builder; the buffer starts with `ESC @`
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(&[ESC, 0x40]);
        Self { buf }
    }

    /// Create an empty builder without the leading initialize command
    pub fn empty() -> Self {
        Self { buf: Vec::new() }
    }

    // === Text Output ===

    /// Write raw text
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Line feed
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// ESC a n
    pub fn align(&mut self, align: Align) -> &mut Self {
        let n = match align {
            Align::Left => 0x00,
            Align::Center => 0x01,
            Align::Right => 0x02,
        };
        self.buf.extend_from_slice(&[ESC, 0x61, n]);
        self
    }

    // === Text Style ===

    /// Apply bold, underline and character size in one go
    pub fn style(&mut self, style: TextStyle) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x45, u8::from(style.bold)]);
        self.buf
            .extend_from_slice(&[ESC, 0x2D, u8::from(style.underline)]);
        let mut size = 0x00;
        if style.double_width {
            size |= 0x10;
        }
        if style.double_height {
            size |= 0x01;
        }
        self.buf.extend_from_slice(&[GS, 0x21, size]);
        self
    }

    /// Back to plain text
    pub fn reset_style(&mut self) -> &mut Self {
        self.style(TextStyle::default())
    }

    // === Paper Control ===

    /// Full cut (GS V 0)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, 0x56, 0x00]);
        self
    }

    /// Partial cut, leaving a small connection (GS V 1)
    pub fn cut_partial(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, 0x56, 0x01]);
        self
    }

    /// Drop any data still sitting in the print buffer (CAN)
    pub fn cancel(&mut self) -> &mut Self {
        self.buf.push(CAN);
        self
    }

    // === Cash Drawer ===

    /// Open cash drawer (pin 2)
    pub fn open_drawer(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x70, 0x00, 25, 250]);
        self
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Reset printer to default state (ESC @)
    pub fn reset(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x40]);
        self
    }

    // === Build ===

    /// Build the final byte buffer with GBK encoding
    pub fn build(self) -> Vec<u8> {
        convert_to_gbk(&self.buf)
    }

    /// Build without GBK conversion (command-only sequences, tests)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}
