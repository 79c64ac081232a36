//! Vendor-aware receipt sender
//!
//! Encodes receipt markup for the configured vendor and pushes it through a
//! transport. Each job checks connectivity first, writes the receipt, then
//! writes the vendor's fixed cut sequence. Failures are logged and returned
//! to the caller; nothing is retried here.

use crate::error::{PrintError, PrintResult};
use crate::markup::{parse_markup, sanitize_markup};
use crate::printer::Printer;
use crate::profile::PrinterProfile;
use crate::vendor::CommandSet;
use tracing::{error, info, instrument};

pub struct ReceiptSender<P: Printer> {
    printer: P,
    profile: PrinterProfile,
}

impl<P: Printer> ReceiptSender<P> {
    pub fn new(printer: P, profile: PrinterProfile) -> Self {
        Self { printer, profile }
    }

    pub fn profile(&self) -> &PrinterProfile {
        &self.profile
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    /// Encode markup into vendor bytes, with the drawer kick in front when
    /// the profile asks for it. The cut sequence is not included.
    pub fn encode(&self, markup: &str) -> Vec<u8> {
        let commands = self.profile.vendor.commands();
        let lines = parse_markup(&sanitize_markup(markup));
        let mut data = Vec::new();
        if self.profile.open_drawer {
            data.extend(commands.drawer_kick());
        }
        data.extend(commands.encode(&lines));
        data
    }

    /// Render-and-send entry point for receipt markup
    #[instrument(skip(self, markup), fields(printer = %self.printer.target(), vendor = %self.profile.vendor))]
    pub async fn send_markup(&self, markup: &str, copies: u32) -> PrintResult<()> {
        let data = self.encode(markup);
        self.send_bytes(&data, copies).await
    }

    /// Send already-encoded bytes `copies` times (at least once)
    pub async fn send_bytes(&self, data: &[u8], copies: u32) -> PrintResult<()> {
        let target = self.printer.target();

        if !self.printer.is_online().await {
            let err = PrintError::Offline(target);
            error!(error = %err, "Printer failed connectivity check");
            return Err(err);
        }

        let cut = self.profile.vendor.commands().cut_sequence();
        let copies = copies.max(1);
        for copy in 1..=copies {
            if let Err(e) = self.printer.print(data).await {
                error!(printer = %target, copy, error = %e, "Receipt write failed");
                return Err(e);
            }
            if self.profile.auto_cut
                && let Err(e) = self.printer.print(&cut).await
            {
                error!(printer = %target, copy, error = %e, "Cut command failed");
                return Err(e);
            }
        }

        info!(printer = %target, copies, bytes = data.len(), "Receipt sent");
        Ok(())
    }
}
