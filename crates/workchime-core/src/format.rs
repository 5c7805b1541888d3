//! Display formatting helpers shared by the schedulers and the CLI.

/// 12-hour clock label for a whole hour: `0 -> "12 AM"`, `13 -> "1 PM"`.
pub fn format_hour(hour: u8) -> String {
    match hour {
        0 => "12 AM".to_string(),
        h if h < 12 => format!("{h} AM"),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}

/// `m:ss` countdown, e.g. `1500 -> "25:00"`.
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_labels() {
        assert_eq!(format_hour(0), "12 AM");
        assert_eq!(format_hour(9), "9 AM");
        assert_eq!(format_hour(11), "11 AM");
        assert_eq!(format_hour(12), "12 PM");
        assert_eq!(format_hour(13), "1 PM");
        assert_eq!(format_hour(23), "11 PM");
    }

    #[test]
    fn countdown_pads_seconds() {
        assert_eq!(format_countdown(1500), "25:00");
        assert_eq!(format_countdown(61), "1:01");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(0), "0:00");
    }
}
