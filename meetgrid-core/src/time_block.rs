//! Half-hour time blocks.
//!
//! A day is split into 48 blocks of 30 minutes; block `n` starts at
//! `n * 30` minutes after midnight.

use crate::error::ValidationError;

/// Number of time blocks in a day.
pub const TIME_BLOCKS: usize = 48;

pub const MINUTES_PER_BLOCK: usize = 30;

pub fn validate_block(block: usize) -> Result<usize, ValidationError> {
    if block < TIME_BLOCKS {
        Ok(block)
    } else {
        Err(ValidationError::TimeBlockOutOfRange(block))
    }
}

/// "HH:MM" start time of a block. Block 48 renders as "24:00" so it can
/// be used as an exclusive range end.
pub fn block_label(block: usize) -> String {
    let minutes = block * MINUTES_PER_BLOCK;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse either a raw block index ("19") or a half-hour aligned time ("09:30").
pub fn parse_block(s: &str) -> Result<usize, ValidationError> {
    let s = s.trim();

    let Some((hours, minutes)) = s.split_once(':') else {
        let block: usize = s
            .parse()
            .map_err(|_| ValidationError::InvalidTime(format!("'{s}' is not a block index or HH:MM")))?;
        return validate_block(block);
    };

    let invalid = || ValidationError::InvalidTime(format!("'{s}'. Expected HH:MM"));
    let hours: usize = hours.parse().map_err(|_| invalid())?;
    let minutes: usize = minutes.parse().map_err(|_| invalid())?;

    if minutes % MINUTES_PER_BLOCK != 0 || minutes >= 60 {
        return Err(ValidationError::InvalidTime(format!(
            "'{s}' is not aligned to a {MINUTES_PER_BLOCK}-minute block"
        )));
    }

    validate_block(hours * 2 + minutes / MINUTES_PER_BLOCK)
}

/// Like [`parse_block`] but also accepts "24:00"/"48" as an exclusive end.
pub fn parse_range_end(s: &str) -> Result<usize, ValidationError> {
    match s.trim() {
        "24:00" | "48" => Ok(TIME_BLOCKS),
        other => parse_block(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_label() {
        assert_eq!(block_label(0), "00:00");
        assert_eq!(block_label(19), "09:30");
        assert_eq!(block_label(47), "23:30");
        assert_eq!(block_label(48), "24:00");
    }

    #[test]
    fn test_parse_block_accepts_index_and_time() {
        assert_eq!(parse_block("5"), Ok(5));
        assert_eq!(parse_block("09:30"), Ok(19));
        assert_eq!(parse_block("23:30"), Ok(47));
    }

    #[test]
    fn test_parse_block_rejects_out_of_range() {
        assert_eq!(parse_block("48"), Err(ValidationError::TimeBlockOutOfRange(48)));
        assert_eq!(parse_block("24:00"), Err(ValidationError::TimeBlockOutOfRange(48)));
        assert!(parse_block("09:15").is_err());
        assert!(parse_block("nine").is_err());
    }

    #[test]
    fn test_malformed_times_are_time_errors() {
        for input in ["nine", "09:15", "9h30", "12:xx"] {
            let err = parse_block(input).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidTime(_)),
                "{input}: {err:?}"
            );
            assert!(err.to_string().starts_with("Invalid time: "));
        }
    }

    #[test]
    fn test_parse_range_end_allows_end_of_day() {
        assert_eq!(parse_range_end("24:00"), Ok(TIME_BLOCKS));
        assert_eq!(parse_range_end("17:00"), Ok(34));
    }
}
