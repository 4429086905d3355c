use std::time::{SystemTime, UNIX_EPOCH};

/// Microseconds since the epoch, used for coarse elapsed-time logging.
pub fn get_current_timestamp() -> u64 {
    let now = SystemTime::now();
    let duration_since_epoch = now.duration_since(UNIX_EPOCH).expect("Time went backwards");
    duration_since_epoch.as_micros() as u64
}

#[cfg(test)]
mod util_test {
    use crate::util::get_current_timestamp;

    #[test]
    pub fn test_timestamp_monotonic() {
        let first = get_current_timestamp();
        let second = get_current_timestamp();
        assert!(second >= first);
    }
}
