//! Human-readable file size formatting.

/// Format a byte count as a human-readable string with two decimals,
/// walking B / KB / MB / GB in 1024 steps and capping at TB.
pub fn format_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} TB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(512), "512.00 B");
    }

    #[test]
    fn test_kilobytes() {
        assert_eq!(format_size(1536), "1.50 KB");
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_terabytes() {
        assert_eq!(format_size(2 * 1024u64.pow(4)), "2.00 TB");
    }
}
