//! Printer profile: vendor and paper geometry

use crate::error::{PrintError, PrintResult};
use crate::vendor::{EscPosCommands, StarCommands, VendorCommands};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Printer command-set family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterVendor {
    /// Generic ESC/POS (Xprinter, Rongta, Epson-compatible)
    #[default]
    Generic,
    /// Star Micronics line mode
    Star,
}

impl PrinterVendor {
    /// Command set used to encode receipts for this vendor
    pub fn commands(self) -> VendorCommands {
        match self {
            PrinterVendor::Generic => VendorCommands::EscPos(EscPosCommands),
            PrinterVendor::Star => VendorCommands::Star(StarCommands),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrinterVendor::Generic => "generic",
            PrinterVendor::Star => "star",
        }
    }
}

impl FromStr for PrinterVendor {
    type Err = PrintError;

    fn from_str(s: &str) -> PrintResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "generic" | "escpos" | "esc/pos" => Ok(PrinterVendor::Generic),
            "star" => Ok(PrinterVendor::Star),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown printer vendor: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PrinterVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paper roll width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperWidth {
    #[serde(rename = "58")]
    Mm58,
    #[default]
    #[serde(rename = "80")]
    Mm80,
}

impl PaperWidth {
    /// Characters per line in the printer's default font
    pub fn chars_per_line(self) -> usize {
        match self {
            PaperWidth::Mm58 => 32,
            PaperWidth::Mm80 => 48,
        }
    }

    pub fn mm(self) -> u32 {
        match self {
            PaperWidth::Mm58 => 58,
            PaperWidth::Mm80 => 80,
        }
    }

    pub fn from_mm(mm: u32) -> PrintResult<Self> {
        match mm {
            58 => Ok(PaperWidth::Mm58),
            80 => Ok(PaperWidth::Mm80),
            other => Err(PrintError::InvalidConfig(format!(
                "Unsupported paper width: {}mm",
                other
            ))),
        }
    }
}

/// How receipts are laid out and finished for one printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterProfile {
    #[serde(default)]
    pub vendor: PrinterVendor,
    #[serde(default)]
    pub paper_width: PaperWidth,
    /// Send the cut sequence after each receipt
    #[serde(default = "default_true")]
    pub auto_cut: bool,
    /// Kick the cash drawer before the receipt
    #[serde(default)]
    pub open_drawer: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self {
            vendor: PrinterVendor::default(),
            paper_width: PaperWidth::default(),
            auto_cut: true,
            open_drawer: false,
        }
    }
}

impl PrinterProfile {
    pub fn new(vendor: PrinterVendor, paper_width: PaperWidth) -> Self {
        Self {
            vendor,
            paper_width,
            ..Default::default()
        }
    }

    pub fn chars_per_line(&self) -> usize {
        self.paper_width.chars_per_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_parsing() {
        assert_eq!("STAR".parse::<PrinterVendor>().unwrap(), PrinterVendor::Star);
        assert_eq!("escpos".parse::<PrinterVendor>().unwrap(), PrinterVendor::Generic);
        assert!("zebra".parse::<PrinterVendor>().is_err());
    }

    #[test]
    fn test_paper_width() {
        assert_eq!(PaperWidth::from_mm(58).unwrap().chars_per_line(), 32);
        assert_eq!(PaperWidth::from_mm(80).unwrap().chars_per_line(), 48);
        assert!(PaperWidth::from_mm(112).is_err());
    }

    #[test]
    fn test_profile_serde_defaults() {
        let profile: PrinterProfile = serde_json::from_str(r#"{"vendor":"star","paper_width":"58"}"#).unwrap();
        assert_eq!(profile.vendor, PrinterVendor::Star);
        assert_eq!(profile.paper_width, PaperWidth::Mm58);
        assert!(profile.auto_cut);
        assert!(!profile.open_drawer);
    }
}
