use std::time::{Duration, Instant};
use tracing::info;

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.start.elapsed()
        );
    }
}

/// Plain decimal text for a price, always with a fractional part.
/// 146.64 → "146.64" | 420.0 → "420.0"
pub fn fmt_price(p: f64) -> String {
    let s = p.to_string();
    if s.contains('.') || !p.is_finite() {
        s
    } else {
        format!("{}.0", s)
    }
}

/// "$146.64" for display, "Not found" when unknown.
pub fn fmt_dollars(p: Option<f64>) -> String {
    match p {
        Some(p) => format!("${:.2}", p),
        None => "Not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_price() {
        assert_eq!(fmt_price(146.64), "146.64");
        assert_eq!(fmt_price(420.0), "420.0");
        assert_eq!(fmt_price(0.0), "0.0");
        assert_eq!(fmt_price(1234.5), "1234.5");
    }

    #[test]
    fn test_fmt_dollars() {
        assert_eq!(fmt_dollars(Some(420.0)), "$420.00");
        assert_eq!(fmt_dollars(None), "Not found");
    }

    #[test]
    fn test_timer_elapsed_grows() {
        let t = Timer::start("test");
        std::thread::sleep(Duration::from_millis(5));
        assert!(t.elapsed() >= Duration::from_millis(5));
    }
}
