//! Window configuration for the runners.

/// Environment variable overriding the logical window size, as `WIDTHxHEIGHT`.
pub const WINDOW_SIZE_ENV: &str = "LOGIN_WINDOW_SIZE";

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub title: String,
    /// Logical size of the desktop window; ignored on Android.
    pub logical_size: (f64, f64),
}

impl Default for RunConfig {
    fn default() -> Self {
        // phone-shaped
        Self {
            title: "Login".into(),
            logical_size: (412.0, 892.0),
        }
    }
}

impl RunConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.logical_size = (width, height);
        self
    }

    /// Applies `LOGIN_WINDOW_SIZE` when it is set and well-formed.
    pub fn from_env(self) -> Self {
        match std::env::var(WINDOW_SIZE_ENV) {
            Ok(raw) => self.with_size_override(&raw),
            Err(_) => self,
        }
    }

    fn with_size_override(self, raw: &str) -> Self {
        match parse_size(raw) {
            Some((w, h)) => self.with_size(w, h),
            None => {
                log::warn!("ignoring {WINDOW_SIZE_ENV}={raw:?}; expected WIDTHxHEIGHT");
                self
            }
        }
    }
}

fn parse_size(raw: &str) -> Option<(f64, f64)> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w.is_finite() && h.is_finite() && w >= 1.0 && h >= 1.0).then_some((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window_size() {
        assert_eq!(parse_size("360x800"), Some((360.0, 800.0)));
        assert_eq!(parse_size(" 1024 X 768 "), Some((1024.0, 768.0)));
    }

    #[test]
    fn rejects_malformed_sizes() {
        for bad in ["", "360", "x800", "0x800", "-1x2", "axb", "NaNx10"] {
            assert_eq!(parse_size(bad), None, "{bad}");
        }
    }

    #[test]
    fn bad_override_keeps_previous_size() {
        let cfg = RunConfig::new("t").with_size(100.0, 200.0);
        assert_eq!(cfg.clone().with_size_override("huge").logical_size, (100.0, 200.0));
        assert_eq!(cfg.with_size_override("300x600").logical_size, (300.0, 600.0));
    }
}
