//! # woo-printer
//!
//! Thermal receipt printing - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Receipt markup (`[L]`/`[C]`/`[R]` lines with `<b>`, `<u>`, `<w>`, `<h>`)
//! - ESC/POS command building with GBK encoding
//! - Star line-mode command building with UTF-8 text
//! - Column layout helpers for 58mm and 80mm paper
//! - Transports: raw TCP (port 9100) and serial / Bluetooth SPP
//!
//! WHAT to print (receipt templates) stays in `woo-station`.
//!
//! ## Example
//!
//! ```ignore
//! use woo_printer::{MarkupBuilder, PrinterProfile, PrinterTransport, ReceiptSender};
//!
//! let profile = PrinterProfile::default();
//! let mut markup = MarkupBuilder::new(profile.chars_per_line());
//! markup.center("ORDER #1024").sep_double().left_right("Total", "$12.00");
//!
//! let transport = PrinterTransport::from_config("serial", "/dev/rfcomm0", 115200)?;
//! ReceiptSender::new(transport, profile)
//!     .send_markup(&markup.build(), 1)
//!     .await?;
//! ```

mod encoding;
mod error;
mod escpos;
pub mod layout;
mod markup;
mod printer;
mod profile;
mod sender;
mod star;
mod vendor;

// Re-exports
pub use encoding::convert_to_gbk;
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use layout::ItemColumns;
pub use markup::{
    Align, MarkupBuilder, MarkupLine, Span, TextStyle, parse_markup, sanitize_markup,
};
pub use printer::{DEFAULT_PORT, NetworkPrinter, Printer, PrinterTransport, SerialPrinter};
pub use profile::{PaperWidth, PrinterProfile, PrinterVendor};
pub use sender::ReceiptSender;
pub use star::{StarBuilder, StarCut};
pub use vendor::{CommandSet, EscPosCommands, StarCommands, VendorCommands};
