//! Star line-mode command builder
//!
//! Star Micronics printers (TSP100/TSP650/mC-Print in Star mode) do not
//! understand ESC/POS styling. This builder mirrors [`EscPosBuilder`]
//! with the StarPRNT equivalents. Text is sent as UTF-8 and lines end in
//! `CR LF`.
//!
//! [`EscPosBuilder`]: crate::EscPosBuilder

use crate::markup::{Align, TextStyle};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;

/// Star line-mode cut modes for `ESC d n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarCut {
    Full = 0,
    Partial = 1,
    FeedFull = 2,
    FeedPartial = 3,
}

/// Star line-mode command builder
pub struct StarBuilder {
    buf: Vec<u8>,
}

impl StarBuilder {
    /// Create a builder; the buffer starts with `ESC @`
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(&[ESC, 0x40]);
        Self { buf }
    }

    pub fn empty() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// CR LF
    pub fn newline(&mut self) -> &mut Self {
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// ESC GS a n
    pub fn align(&mut self, align: Align) -> &mut Self {
        let n = match align {
            Align::Left => 0x00,
            Align::Center => 0x01,
            Align::Right => 0x02,
        };
        self.buf.extend_from_slice(&[ESC, GS, 0x61, n]);
        self
    }

    /// `ESC E`/`ESC F` emphasis, `ESC -` underline, `ESC i` expansion
    pub fn style(&mut self, style: TextStyle) -> &mut Self {
        if style.bold {
            self.buf.extend_from_slice(&[ESC, 0x45]);
        } else {
            self.buf.extend_from_slice(&[ESC, 0x46]);
        }
        self.buf
            .extend_from_slice(&[ESC, 0x2D, u8::from(style.underline)]);
        // ESC i n1 n2: n1 = extra height multiple, n2 = extra width multiple
        self.buf.extend_from_slice(&[
            ESC,
            0x69,
            u8::from(style.double_height),
            u8::from(style.double_width),
        ]);
        self
    }

    pub fn reset_style(&mut self) -> &mut Self {
        self.style(TextStyle::default())
    }

    /// ESC d n
    pub fn cut(&mut self, mode: StarCut) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x64, mode as u8]);
        self
    }

    /// Drawer kick (BEL)
    pub fn open_drawer(&mut self) -> &mut Self {
        self.buf.push(0x07);
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for StarBuilder {
    fn default() -> Self {
        Self::new()
    }
}
