// SensorConsole
// Supplied without warranty.
// Use at your own risk.

/// A detected port as shown in the port dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub port_name: String, // e.g. "COM7"
    pub display: String,   // e.g. "COM7: STMicroelectronics STLink"
}

impl std::fmt::Display for PortEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl From<serialport::SerialPortInfo> for PortEntry {
    fn from(p: serialport::SerialPortInfo) -> Self {
        let display = match p.port_type {
            serialport::SerialPortType::UsbPort(info) => {
                let parts: Vec<String> = info.manufacturer.into_iter().chain(info.product).collect();
                if parts.is_empty() {
                    format!("{}: USB Serial", p.port_name)
                } else {
                    format!("{}: {}", p.port_name, parts.join(" "))
                }
            }
            serialport::SerialPortType::BluetoothPort => format!("{}: Bluetooth", p.port_name),
            serialport::SerialPortType::PciPort => format!("{}: PCI", p.port_name),
            serialport::SerialPortType::Unknown => p.port_name.clone(),
        };
        PortEntry {
            port_name: p.port_name,
            display,
        }
    }
}

/// Ports currently visible to the OS, sorted by label. Enumeration errors
/// yield an empty list.
pub fn scan() -> Vec<PortEntry> {
    let mut out: Vec<PortEntry> = match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(PortEntry::from).collect(),
        Err(e) => {
            log::warn!("port scan failed: {e}");
            Vec::new()
        }
    };
    out.sort_by(|a, b| a.display.cmp(&b.display));
    out
}
