const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count for display: `1536` → `"1.5 KB"`.
///
/// Picks the largest unit the value reaches (capped at GB), rounds to two
/// decimals with ties going up, and drops trailing zeros.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let log2 = 63 - bytes.leading_zeros() as usize;
    let unit = (log2 / 10).min(UNITS.len() - 1);
    let divisor = 1u128 << (10 * unit);

    // Hundredths, rounded half up, computed exactly.
    let hundredths = (2 * bytes as u128 * 100 + divisor) / (2 * divisor);
    let whole = hundredths / 100;
    let frac = hundredths % 100;

    let number = if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{}.{}", whole, frac / 10)
    } else {
        format!("{}.{:02}", whole, frac)
    };

    format!("{} {}", number, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn whole_units() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn fractional_values_strip_trailing_zeros() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1280), "1.25 KB");
        assert_eq!(format_file_size(2_621_440), "2.5 MB");
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1100 / 1024 = 1.07421875
        assert_eq!(format_file_size(1100), "1.07 KB");
        // 1.125 exactly, tie rounds up
        assert_eq!(format_file_size(1152), "1.13 KB");
        // just under 1 MB rounds up to the KB ceiling
        assert_eq!(format_file_size(1_048_575), "1024 KB");
    }

    #[test]
    fn caps_at_gigabytes() {
        assert_eq!(format_file_size(1u64 << 40), "1024 GB");
        assert_eq!(format_file_size(u64::MAX), "17179869184 GB");
    }
}
