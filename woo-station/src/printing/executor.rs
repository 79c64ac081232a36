//! Print job executor
//!
//! Renders orders with the configured template and hands the markup to the
//! receipt sender. Each job is attempted once; failures are logged and
//! returned to the caller.

use chrono::Utc;
use dashmap::DashSet;
use shared::models::Order;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use woo_printer::{PrintError, Printer, PrinterProfile, PrinterTransport, ReceiptSender};

use super::renderer::ReceiptRenderer;
use super::types::{TemplateConfig, TemplateType};
use crate::core::Config;

#[derive(Debug, Error)]
pub enum PrintJobError {
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error(transparent)]
    Print(#[from] PrintError),

    #[error("Order {0} is already being printed")]
    Busy(u64),
}

pub type PrintJobResult<T> = Result<T, PrintJobError>;

/// Removes the order id from the in-flight set when the job ends
struct InFlightGuard<'a> {
    set: &'a DashSet<u64>,
    id: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

/// Print job executor
///
/// One executor per station printer. Concurrent jobs for the same order are
/// rejected with [`PrintJobError::Busy`] so the poller and a manual reprint
/// never interleave receipts.
pub struct PrintExecutor<P: Printer = PrinterTransport> {
    sender: ReceiptSender<P>,
    renderer: ReceiptRenderer,
    template: TemplateConfig,
    copies: u32,
    in_flight: DashSet<u64>,
}

impl PrintExecutor<PrinterTransport> {
    /// Build the transport, profile and template from the station config
    pub fn from_config(config: &Config) -> PrintJobResult<Self> {
        let transport = PrinterTransport::from_config(
            &config.printer_connection,
            &config.printer_address,
            config.printer_baud_rate,
        )?;
        let profile = config.printer_profile();
        let renderer = ReceiptRenderer::for_profile(&profile, config.store_info(), config.timezone);
        Self::new(
            ReceiptSender::new(transport, profile),
            renderer,
            TemplateConfig::preset(config.template),
            config.print_copies,
        )
    }
}

impl<P: Printer> PrintExecutor<P> {
    pub fn new(
        sender: ReceiptSender<P>,
        renderer: ReceiptRenderer,
        template: TemplateConfig,
        copies: u32,
    ) -> PrintJobResult<Self> {
        if !template.is_valid() {
            return Err(PrintJobError::InvalidTemplate(template.template_id.clone()));
        }
        Ok(Self {
            sender,
            renderer,
            template,
            copies: copies.max(1),
            in_flight: DashSet::new(),
        })
    }

    pub fn template(&self) -> &TemplateConfig {
        &self.template
    }

    pub fn profile(&self) -> &PrinterProfile {
        self.sender.profile()
    }

    pub fn copies(&self) -> u32 {
        self.copies
    }

    /// Printer address for logs and the test page
    pub fn target(&self) -> String {
        self.sender.printer().target()
    }

    /// Print an order with the configured template
    pub async fn print_order(&self, order: &Order) -> PrintJobResult<()> {
        self.print_with(order, &self.template).await
    }

    /// Print an order with another variant (e.g. a kitchen ticket on demand)
    pub async fn print_order_as(&self, order: &Order, template: TemplateType) -> PrintJobResult<()> {
        self.print_with(order, &TemplateConfig::preset(template)).await
    }

    #[instrument(skip(self, order, template), fields(order_id = order.id, template = %template.template_type))]
    async fn print_with(&self, order: &Order, template: &TemplateConfig) -> PrintJobResult<()> {
        if !self.in_flight.insert(order.id) {
            warn!("Print job already running for this order");
            return Err(PrintJobError::Busy(order.id));
        }
        let _guard = InFlightGuard {
            set: &self.in_flight,
            id: order.id,
        };

        let markup = self.renderer.render(order, template);
        match self.sender.send_markup(&markup, self.copies).await {
            Ok(()) => {
                info!(copies = self.copies, items = order.items.len(), "Receipt printed");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Receipt print failed");
                Err(e.into())
            }
        }
    }

    /// Print the printer test page (single copy)
    #[instrument(skip(self))]
    pub async fn print_test_page(&self) -> PrintJobResult<()> {
        let markup = self
            .renderer
            .render_test_page(self.sender.profile(), &self.target(), Utc::now());
        self.sender.send_markup(&markup, 1).await.map_err(|e| {
            error!(error = %e, "Test page failed");
            PrintJobError::from(e)
        })?;
        info!("Test page printed");
        Ok(())
    }
}
