//! Plain text rendering of widget snapshots
//!
//! No colors or cursor control, one block per update, suitable for a
//! terminal or a log file.

use feeds::FeedItem;
use pulsed_client::{
    ContainerState, DevicePresence, DockerInventory, NetworkReport, ServiceHealth, ServiceStatus,
    SystemSnapshot,
};

use crate::scheduler::{Phase, WidgetSnapshot};
use crate::weather::WeatherReport;

/// Containers listed before collapsing the rest
const DOCKER_PREVIEW: usize = 5;

pub trait Render {
    fn render(&self) -> Vec<String>;
}

pub fn render_snapshot<T: Render>(snapshot: &WidgetSnapshot<T>, verbose: bool) -> String {
    let time = snapshot
        .updated_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let mut out = format!("[{}] {}", time, snapshot.name);

    match (&snapshot.phase, &snapshot.data, &snapshot.error) {
        (_, _, Some(error)) => {
            out.push_str(&format!(": {}", error.message));
            if verbose {
                out.push_str(&format!(" ({})", error.detail));
            }
        }
        (_, Some(data), None) => {
            for line in data.render() {
                out.push_str("\n  ");
                out.push_str(&line);
            }
        }
        (Phase::Idle, None, None) => out.push_str(": idle"),
        (_, None, None) => out.push_str(": loading"),
    }
    out
}

pub fn format_bytes(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    if days > 0 {
        return format!("{}d {}h", days, hours);
    }
    format!("{}h {}m", hours, (seconds % 3_600) / 60)
}

impl Render for SystemSnapshot {
    fn render(&self) -> Vec<String> {
        let mut lines = vec![
            format!("CPU     {:.1}% ({} cores)", self.cpu_usage, self.cpu_count),
            format!(
                "Memory  {:.1}% ({} / {})",
                self.memory_percent,
                format_bytes(self.memory_used),
                format_bytes(self.memory_total)
            ),
            format!(
                "Disk    {:.1}% ({} / {})",
                self.disk_percent,
                format_bytes(self.disk_used),
                format_bytes(self.disk_total)
            ),
            format!(
                "Load    {:.2} {:.2} {:.2}",
                self.load_avg[0], self.load_avg[1], self.load_avg[2]
            ),
            format!("Uptime  {}", format_uptime(self.uptime_secs)),
        ];
        if let Some(hottest) = self.max_temperature() {
            lines.push(format!("Temp    {:.0}°C ({})", hottest.celsius, hottest.label));
        }
        lines
    }
}

impl Render for DockerInventory {
    fn render(&self) -> Vec<String> {
        let mut lines = vec![format!("{}/{} running", self.running, self.total)];
        for container in self.containers.iter().take(DOCKER_PREVIEW) {
            let marker = match container.container_state() {
                ContainerState::Running => "up",
                ContainerState::Paused => "paused",
                ContainerState::Exited => "down",
                ContainerState::Other => "?",
            };
            lines.push(format!(
                "{:<6} {} ({}) {}",
                marker, container.name, container.image, container.status
            ));
        }
        if self.containers.len() > DOCKER_PREVIEW {
            lines.push(format!("... {} more", self.containers.len() - DOCKER_PREVIEW));
        }
        lines
    }
}

impl Render for DevicePresence {
    fn render(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{}/{} online",
            self.online_count,
            self.devices.len()
        )];
        lines.extend(self.devices.iter().map(|d| {
            format!(
                "{:<7} {} {}",
                if d.online { "online" } else { "offline" },
                d.name,
                d.ip
            )
        }));
        lines
    }
}

impl Render for NetworkReport {
    fn render(&self) -> Vec<String> {
        self.interfaces
            .iter()
            .map(|i| {
                format!(
                    "{} {} rx {} tx {}",
                    i.name,
                    i.ip.as_deref().unwrap_or("-"),
                    format_bytes(i.rx_bytes),
                    format_bytes(i.tx_bytes)
                )
            })
            .collect()
    }
}

impl Render for ServiceHealth {
    fn render(&self) -> Vec<String> {
        let mut lines = vec![format!("{}/{} healthy", self.healthy, self.total)];
        lines.extend(self.services.iter().map(|s| {
            let status = match s.service_status() {
                ServiceStatus::Healthy => "ok",
                ServiceStatus::Timeout => "timeout",
                ServiceStatus::ConnectionRefused => "refused",
                ServiceStatus::Unhealthy => "down",
            };
            match s.latency_ms {
                Some(ms) => format!("{:<7} {} {:.0}ms", status, s.name, ms),
                None => format!("{:<7} {}", status, s.name),
            }
        }));
        lines
    }
}

impl Render for Vec<FeedItem> {
    fn render(&self) -> Vec<String> {
        if self.is_empty() {
            return vec!["No items".to_string()];
        }
        self.iter()
            .enumerate()
            .map(|(i, item)| match (item.score, item.comment_count) {
                (Some(score), Some(comments)) => format!(
                    "{:>2}. {} ({} points, {} comments)",
                    i + 1,
                    item.title,
                    score,
                    comments
                ),
                _ => format!("{:>2}. {}", i + 1, item.title),
            })
            .collect()
    }
}

impl Render for WeatherReport {
    fn render(&self) -> Vec<String> {
        vec![
            format!("{} {}° {}", self.location, self.temperature, self.condition),
            format!(
                "H: {}° L: {}° feels like {}° humidity {}% wind {} km/h",
                self.high, self.low, self.feels_like, self.humidity, self.wind_speed
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{WidgetError, WidgetState};
    use crate::widgets::fake;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.0 GB");
        assert_eq!(format_bytes(16 * 1024 * 1024 * 1024), "16.0 GB");
        assert_eq!(format_bytes(1536 * 1024 * 1024), "1.5 GB");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(90_061), "1d 1h");
        assert_eq!(format_uptime(3_660), "1h 1m");
        assert_eq!(format_uptime(59), "0h 0m");
    }

    #[test]
    fn test_render_ready_snapshot() {
        let mut state = WidgetState::new("system");
        let t = state.begin();
        state.commit(t, Ok(fake::system()));

        let text = render_snapshot(&state.snapshot(), false);
        assert!(text.contains("] system"));
        assert!(text.contains("CPU     12.5% (8 cores)"));
        assert!(text.contains("Memory  25.0% (4.0 GB / 16.0 GB)"));
        assert!(text.contains("Uptime  1d 1h"));
    }

    #[test]
    fn test_render_failed_snapshot() {
        let mut state: WidgetState<SystemSnapshot> = WidgetState::new("system");
        let t = state.begin();
        state.commit(
            t,
            Err(WidgetError::new("Pulsed offline", "Pulsed API error: 503")),
        );

        let text = render_snapshot(&state.snapshot(), false);
        assert!(text.ends_with("system: Pulsed offline"));

        let verbose = render_snapshot(&state.snapshot(), true);
        assert!(verbose.ends_with("system: Pulsed offline (Pulsed API error: 503)"));
    }

    #[test]
    fn test_render_docker_preview() {
        let containers: Vec<_> = (0..7)
            .map(|i| fake::container(&format!("c{}", i), "running"))
            .collect();
        let inventory = DockerInventory {
            containers,
            running: 7,
            total: 7,
        };

        let lines = inventory.render();
        assert_eq!(lines[0], "7/7 running");
        assert_eq!(lines.len(), 1 + 5 + 1);
        assert_eq!(lines[6], "... 2 more");
    }

    #[test]
    fn test_render_service_latency() {
        let check = |name: &str, status: &str, latency_ms| pulsed_client::ServiceCheckResult {
            name: name.into(),
            url: format!("http://{}", name),
            status: status.into(),
            latency_ms,
            last_check: "2024-01-01T00:00:00Z".into(),
        };
        let health = ServiceHealth {
            services: vec![check("grafana", "healthy", Some(12.7)), check("nas", "timeout", None)],
            healthy: 1,
            total: 2,
        };

        assert_eq!(
            health.render(),
            vec!["1/2 healthy", "ok      grafana 13ms", "timeout nas"]
        );
    }

    #[test]
    fn test_render_feed_items() {
        let mut hn = FeedItem::new("Show HN: x", "https://x.test");
        hn.score = Some(120);
        hn.comment_count = Some(30);
        let items = vec![hn, FeedItem::new("Plain", "https://y.test")];

        let lines = items.render();
        assert_eq!(lines[0], " 1. Show HN: x (120 points, 30 comments)");
        assert_eq!(lines[1], " 2. Plain");
        assert_eq!(Vec::<FeedItem>::new().render(), vec!["No items"]);
    }
}
