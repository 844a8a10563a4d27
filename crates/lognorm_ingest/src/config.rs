#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CaptureRaw {
    #[default]
    None,
    Line,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IngestLimits {
    pub max_line_bytes: usize,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_line_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IngestConfig {
    pub limits: IngestLimits,
    /// Passed as the `strip` flag of each normalize call. A trailing `\r` is
    /// removed and whitespace-only lines are skipped whatever this is set to.
    pub strip: bool,
    pub capture_raw: CaptureRaw,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            limits: IngestLimits::default(),
            strip: true,
            capture_raw: CaptureRaw::None,
        }
    }
}
