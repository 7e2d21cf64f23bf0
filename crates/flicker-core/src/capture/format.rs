const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
const K: u64 = 1024;

/// Render a byte count with binary units and two decimals, e.g. `1.50 KB`.
///
/// The unit index is `floor(log1024(bytes))`, clamped to GB. It is computed
/// on integers so exact powers of 1024 never round down a unit.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut index = 0;
    let mut divisor = 1_u64;
    while index < UNITS.len() - 1 && bytes / divisor >= K {
        divisor *= K;
        index += 1;
    }

    format!("{:.2} {}", bytes as f64 / divisor as f64, UNITS[index])
}
