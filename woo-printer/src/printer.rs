//! Printer transports
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Serial devices: Bluetooth SPP/RFCOMM (`/dev/rfcomm0`, `COM5`) and
//!   USB-serial adapters

use crate::error::{PrintError, PrintResult};
use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Trait for printer transports
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Write raw bytes to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is reachable
    async fn is_online(&self) -> bool;

    /// Human-readable target, used in logs and errors
    fn target(&self) -> String;
}

/// Network printer (TCP port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let ip: IpAddr = host
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid host: {}", host)))?;
        Ok(Self {
            addr: SocketAddr::new(ip, port),
            timeout: Duration::from_secs(5),
        })
    }

    /// Parse `"192.168.1.100:9100"`; a bare IP uses port 9100
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr = addr.trim();
        if let Ok(addr) = addr.parse::<SocketAddr>() {
            return Ok(Self {
                addr,
                timeout: Duration::from_secs(5),
            });
        }
        Self::new(addr, DEFAULT_PORT)
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        debug!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;
        stream.flush().await?;

        debug!("Sent {} bytes", data.len());
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }

    fn target(&self) -> String {
        self.addr.to_string()
    }
}

/// Serial printer: a paired Bluetooth SPP device or a USB-serial port
///
/// The OS exposes an RFCOMM channel as a serial device, so Bluetooth
/// printers go through the same path as wired ones.
#[derive(Debug, Clone)]
pub struct SerialPrinter {
    path: String,
    baud_rate: u32,
    timeout: Duration,
}

impl SerialPrinter {
    pub fn new(path: &str, baud_rate: u32) -> PrintResult<Self> {
        let path = path.trim();
        if path.is_empty() {
            return Err(PrintError::InvalidConfig(
                "Serial device path is empty".to_string(),
            ));
        }
        if baud_rate == 0 {
            return Err(PrintError::InvalidConfig(
                "Baud rate must be positive".to_string(),
            ));
        }
        Ok(Self {
            path: path.to_string(),
            baud_rate,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn open(&self) -> PrintResult<Box<dyn serialport::SerialPort>> {
        Ok(serialport::new(&self.path, self.baud_rate)
            .timeout(self.timeout)
            .open()?)
    }

    /// Blocking write, run from `spawn_blocking`
    fn write_blocking(&self, data: &[u8]) -> PrintResult<()> {
        let mut port = self.open()?;
        port.write_all(data).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                PrintError::Timeout(format!("Write timeout: {}", self.path))
            } else {
                PrintError::Io(e)
            }
        })?;
        port.flush()?;
        Ok(())
    }
}

impl Printer for SerialPrinter {
    #[instrument(skip(self, data), fields(path = %self.path, baud = self.baud_rate, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let printer = self.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || printer.write_blocking(&data))
            .await
            .map_err(|e| PrintError::Task(format!("Serial write task failed: {}", e)))??;

        debug!("Serial write complete");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path))]
    async fn is_online(&self) -> bool {
        let printer = self.clone();
        match tokio::task::spawn_blocking(move || printer.open().map(|_| ())).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Serial printer unavailable");
                false
            }
            Err(e) => {
                warn!(error = %e, "Serial check task failed");
                false
            }
        }
    }

    fn target(&self) -> String {
        self.path.clone()
    }
}

/// Configured transport, chosen at startup
#[derive(Debug, Clone)]
pub enum PrinterTransport {
    Network(NetworkPrinter),
    Serial(SerialPrinter),
}

impl PrinterTransport {
    /// Build from a connection kind (`network` / `serial`) and an address
    pub fn from_config(connection: &str, address: &str, baud_rate: u32) -> PrintResult<Self> {
        let transport = match connection.trim().to_lowercase().as_str() {
            "network" | "tcp" => PrinterTransport::Network(NetworkPrinter::from_addr(address)?),
            "serial" | "bluetooth" => PrinterTransport::Serial(SerialPrinter::new(address, baud_rate)?),
            other => {
                return Err(PrintError::InvalidConfig(format!(
                    "Unknown printer connection: {}",
                    other
                )));
            }
        };
        info!(printer = %transport.target(), "Printer transport configured");
        Ok(transport)
    }
}

impl Printer for PrinterTransport {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match self {
            PrinterTransport::Network(p) => p.print(data).await,
            PrinterTransport::Serial(p) => p.print(data).await,
        }
    }

    async fn is_online(&self) -> bool {
        match self {
            PrinterTransport::Network(p) => p.is_online().await,
            PrinterTransport::Serial(p) => p.is_online().await,
        }
    }

    fn target(&self) -> String {
        match self {
            PrinterTransport::Network(p) => p.target(),
            PrinterTransport::Serial(p) => p.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_network_printer_from_addr_defaults_port() {
        let printer = NetworkPrinter::from_addr("192.168.1.100").unwrap();
        assert_eq!(printer.addr().port(), DEFAULT_PORT);
        let printer = NetworkPrinter::from_addr("10.0.0.5:9101").unwrap();
        assert_eq!(printer.addr().port(), 9101);
    }

    #[test]
    fn test_invalid_addr() {
        assert!(NetworkPrinter::from_addr("invalid").is_err());
        assert!(SerialPrinter::new("  ", 9600).is_err());
        assert!(SerialPrinter::new("/dev/rfcomm0", 0).is_err());
    }

    #[test]
    fn test_transport_from_config() {
        let t = PrinterTransport::from_config("serial", "/dev/rfcomm0", 115200).unwrap();
        assert!(matches!(t, PrinterTransport::Serial(_)));
        assert_eq!(t.target(), "/dev/rfcomm0");
        let t = PrinterTransport::from_config("network", "127.0.0.1", 0).unwrap();
        assert!(matches!(t, PrinterTransport::Network(_)));
        assert!(PrinterTransport::from_config("usb", "x", 0).is_err());
    }

    #[tokio::test]
    async fn test_network_print_writes_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            sock.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
        printer.print(b"hello").await.unwrap();
        assert_eq!(server.await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_missing_serial_device_is_offline() {
        let printer = SerialPrinter::new("/dev/does-not-exist-printer", 9600).unwrap();
        assert!(!printer.is_online().await);
        assert!(printer.print(b"x").await.is_err());
    }
}
