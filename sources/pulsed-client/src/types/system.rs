//! System metrics types

use serde::{Deserialize, Serialize};

/// CPU, memory, disk and load snapshot from `GET /api/v1/system`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// Global CPU usage percentage (0-100)
    pub cpu_usage: f64,
    /// Number of logical CPUs
    pub cpu_count: u32,
    /// Used memory in bytes
    pub memory_used: u64,
    /// Total memory in bytes
    pub memory_total: u64,
    pub memory_percent: f64,
    /// Used disk space in bytes
    pub disk_used: u64,
    /// Total disk space in bytes
    pub disk_total: u64,
    pub disk_percent: f64,
    /// 1, 5 and 15 minute load averages
    pub load_avg: [f64; 3],
    pub uptime_secs: u64,
    /// Sensor readings, when the host exposes any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temperatures: Vec<TemperatureReading>,
}

/// A single temperature sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub label: String,
    pub celsius: f64,
}

impl SystemSnapshot {
    /// Hottest sensor, if any are reported
    pub fn max_temperature(&self) -> Option<&TemperatureReading> {
        self.temperatures
            .iter()
            .max_by(|a, b| a.celsius.total_cmp(&b.celsius))
    }
}
