//! Vendor command sets
//!
//! Each printer family turns receipt markup into its own byte stream and
//! has its own fixed post-receipt cut sequence.

use crate::escpos::EscPosBuilder;
use crate::markup::{MarkupLine, TextStyle};
use crate::star::{StarBuilder, StarCut};
use enum_dispatch::enum_dispatch;

/// Encoding capabilities of a printer family
#[enum_dispatch]
pub trait CommandSet {
    /// Encode parsed markup into printer bytes
    fn encode(&self, lines: &[MarkupLine]) -> Vec<u8>;

    /// Fixed sequence written after the receipt to finish and cut it
    fn cut_sequence(&self) -> Vec<u8>;

    /// Cash drawer pulse
    fn drawer_kick(&self) -> Vec<u8>;
}

/// Generic ESC/POS printers (GBK text)
#[derive(Debug, Clone, Copy, Default)]
pub struct EscPosCommands;

/// Star Micronics line mode (UTF-8 text)
#[derive(Debug, Clone, Copy, Default)]
pub struct StarCommands;

/// Static dispatch over the supported command sets
#[enum_dispatch(CommandSet)]
#[derive(Debug, Clone, Copy)]
pub enum VendorCommands {
    EscPos(EscPosCommands),
    Star(StarCommands),
}

impl CommandSet for EscPosCommands {
    fn encode(&self, lines: &[MarkupLine]) -> Vec<u8> {
        let mut b = EscPosBuilder::new();
        for line in lines {
            b.align(line.align);
            let mut styled = false;
            for span in &line.spans {
                if !span.style.is_plain() || styled {
                    b.style(span.style);
                    styled = true;
                }
                b.text(&span.text);
            }
            if styled {
                b.reset_style();
            }
            b.newline();
        }
        b.build()
    }

    /// `CAN`, `ESC @`, `GS V 1`, `LF CR`, `SP LF`, `ESC @`
    fn cut_sequence(&self) -> Vec<u8> {
        let mut b = EscPosBuilder::empty();
        b.cancel()
            .reset()
            .cut_partial()
            .raw(b"\n\r")
            .raw(b" \n")
            .reset();
        b.build_raw()
    }

    fn drawer_kick(&self) -> Vec<u8> {
        let mut b = EscPosBuilder::empty();
        b.open_drawer();
        b.build_raw()
    }
}

impl CommandSet for StarCommands {
    fn encode(&self, lines: &[MarkupLine]) -> Vec<u8> {
        let mut b = StarBuilder::new();
        for line in lines {
            b.align(line.align);
            let mut styled = false;
            for span in &line.spans {
                if !span.style.is_plain() || styled {
                    b.style(span.style);
                    styled = true;
                }
                b.text(&span.text);
            }
            if styled {
                b.style(TextStyle::default());
            }
            b.newline();
        }
        b.build()
    }

    /// `CR LF`, then feed and partial cut
    fn cut_sequence(&self) -> Vec<u8> {
        let mut b = StarBuilder::empty();
        b.newline().cut(StarCut::FeedPartial);
        b.build()
    }

    fn drawer_kick(&self) -> Vec<u8> {
        let mut b = StarBuilder::empty();
        b.open_drawer();
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrinterVendor;
    use crate::markup::parse_markup;

    #[test]
    fn test_generic_cut_sequence_is_fixed() {
        let seq = PrinterVendor::Generic.commands().cut_sequence();
        assert_eq!(
            seq,
            vec![
                0x18, 0x1B, 0x40, 0x1D, 0x56, 0x01, 0x0A, 0x0D, 0x20, 0x0A, 0x1B, 0x40
            ]
        );
    }

    #[test]
    fn test_star_cut_sequence_is_fixed() {
        let seq = PrinterVendor::Star.commands().cut_sequence();
        assert_eq!(seq, vec![0x0D, 0x0A, 0x1B, 0x64, 0x03]);
    }

    #[test]
    fn test_generic_encoding_resets_style_per_line() {
        let lines = parse_markup("[C]<b>Hi</b>\n[L]plain");
        let data = PrinterVendor::Generic.commands().encode(&lines);
        // Chinese-mode header, then ESC @
        assert_eq!(&data[5..7], &[0x1B, 0x40]);
        let s = String::from_utf8_lossy(&data);
        assert!(s.contains("Hi"));
        // bold on appears once, bold off after the styled line
        let bold_on = data.windows(3).filter(|w| *w == [0x1B, 0x45, 0x01]).count();
        let bold_off = data.windows(3).filter(|w| *w == [0x1B, 0x45, 0x00]).count();
        assert_eq!(bold_on, 1);
        assert!(bold_off >= 1);
    }

    #[test]
    fn test_star_encoding_plain_lines_have_no_style_bytes() {
        let lines = parse_markup("[L]plain");
        let data = PrinterVendor::Star.commands().encode(&lines);
        assert_eq!(
            data,
            vec![0x1B, 0x40, 0x1B, 0x1D, 0x61, 0x00, b'p', b'l', b'a', b'i', b'n', b'\r', b'\n']
        );
    }

    #[test]
    fn test_drawer_kicks_differ_by_vendor() {
        assert_eq!(
            PrinterVendor::Generic.commands().drawer_kick(),
            vec![0x1B, 0x70, 0x00, 25, 250]
        );
        assert_eq!(PrinterVendor::Star.commands().drawer_kick(), vec![0x07]);
    }
}
