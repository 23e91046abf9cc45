/// Format a bytes-per-second rate (1024-based units).
pub fn format_rate(bytes_per_second: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    if bytes_per_second >= MIB {
        format!("{:.2} MB/s", bytes_per_second / MIB)
    } else if bytes_per_second >= KIB {
        format!("{:.1} KB/s", bytes_per_second / KIB)
    } else {
        format!("{bytes_per_second:.0} B/s")
    }
}

/// `"2d 03h 04m"` from one day up, `"hh:mm:ss"` below.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let days  = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let mins  = total % 3_600 / 60;
    let secs  = total % 60;

    if days > 0 {
        format!("{days}d {hours:02}h {mins:02}m")
    } else {
        format!("{hours:02}:{mins:02}:{secs:02}")
    }
}

/// Thousands-separated integer, e.g. `"12,345"`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_rate_units() {
        assert_eq!(format_rate(512.0), "512 B/s");
        assert_eq!(format_rate(2048.0), "2.0 KB/s");
        assert_eq!(format_rate(3.5 * 1024.0 * 1024.0), "3.50 MB/s");
    }

    #[test]
    fn format_duration_short_and_long() {
        assert_eq!(format_duration(3_725.9), "01:02:05");
        assert_eq!(format_duration(2.0 * 86_400.0 + 3.0 * 3_600.0 + 4.0 * 60.0), "2d 03h 04m");
        assert_eq!(format_duration(-5.0), "00:00:00");
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1_234), "1,234");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
