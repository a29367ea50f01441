//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                |
//! |-------------|--------------------|----------------------------|
//! | `cpu_clock` | CpuClockPort       | ESP-IDF power manager      |
//! | `log_sink`  | EventSink          | Serial log output          |
//! | `status`    | NodeInfoPort       | System timer, WiFi station |
//! | `time`      | MonotonicClock     | ESP32 system timer         |
//! | `uart`      | SerialPort         | Console UART0              |
//! | `wifi`      | ConnectivityPort   | ESP-IDF WiFi STA / AP      |

pub mod cpu_clock;
pub mod log_sink;
pub mod status;
pub mod time;
pub mod uart;
pub mod wifi;
