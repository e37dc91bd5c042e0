use crate::table::RegisterTable;
use crate::types::FrameSize;

/// A supported output resolution and the table that produces it.
#[derive(Debug, Clone, Copy)]
pub struct Mode {
    pub label: &'static str,
    pub size: FrameSize,
    pub table: RegisterTable,
}

impl Mode {
    pub const fn new(label: &'static str, width: u32, height: u32, table: RegisterTable) -> Self {
        Self {
            label,
            size: FrameSize::new(width, height),
            table,
        }
    }
}

impl PartialEq for Mode {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.size == other.size
    }
}

impl Eq for Mode {}

/// Non-empty list of modes in declared order.
///
/// Declare larger modes first: resolution picks the first one that fits.
#[derive(Debug, Clone, Copy)]
pub struct ModeTable {
    modes: &'static [Mode],
}

impl ModeTable {
    pub const fn new(modes: &'static [Mode]) -> Self {
        assert!(!modes.is_empty(), "mode table needs at least one mode");
        Self { modes }
    }

    pub fn modes(&self) -> &'static [Mode] {
        self.modes
    }

    pub fn get(&self, index: usize) -> Option<&'static Mode> {
        self.modes.get(index)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Fallback when no mode fits a request: the last declared one.
    pub fn default_mode(&self) -> &'static Mode {
        &self.modes[self.modes.len() - 1]
    }

    /// First mode, in declared order, that fits within `requested`;
    /// the default mode when none does. Never fails.
    ///
    /// The effective size is the returned mode's `size`, which replaces the
    /// caller's request.
    pub fn resolve(&self, requested: FrameSize) -> &'static Mode {
        let modes: &'static [Mode] = self.modes;
        match modes.iter().find(|mode| mode.size.fits_within(requested)) {
            Some(mode) => mode,
            None => {
                log::debug!(
                    "no mode fits {}x{}, using default {}",
                    requested.width,
                    requested.height,
                    self.default_mode().label
                );
                self.default_mode()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{RegisterEntry, TableRole};

    const NO_REGS: RegisterTable = RegisterTable::new("none", TableRole::Mode, &[RegisterEntry::END]);

    static THREE: ModeTable = ModeTable::new(&[
        Mode::new("VGA", 640, 480, NO_REGS),
        Mode::new("WIDE", 752, 240, NO_REGS),
        Mode::new("QVGA", 320, 240, NO_REGS),
    ]);

    #[test]
    fn test_exact_match() {
        assert_eq!(THREE.resolve(FrameSize::new(640, 480)).label, "VGA");
        assert_eq!(THREE.resolve(FrameSize::new(320, 240)).label, "QVGA");
    }

    #[test]
    fn test_first_fitting_mode_in_declared_order() {
        // VGA is too tall, WIDE fits before QVGA is considered
        assert_eq!(THREE.resolve(FrameSize::new(800, 300)).label, "WIDE");
        assert_eq!(THREE.resolve(FrameSize::new(1920, 1080)).label, "VGA");
        assert_eq!(THREE.resolve(FrameSize::new(700, 479)).label, "QVGA");
    }

    #[test]
    fn test_too_small_falls_back_to_last() {
        assert_eq!(THREE.resolve(FrameSize::new(100, 100)).label, "QVGA");
        assert_eq!(THREE.resolve(FrameSize::new(0, 0)).label, "QVGA");
        assert_eq!(THREE.resolve(FrameSize::new(u32::MAX, 10)).label, "QVGA");
    }

    #[test]
    fn test_resolved_mode_fits_any_large_enough_request() {
        for w in (320..=1000).step_by(37) {
            for h in (240..=800).step_by(29) {
                let requested = FrameSize::new(w, h);
                let mode = THREE.resolve(requested);
                assert!(mode.size.fits_within(requested), "{}x{} -> {}", w, h, mode.label);
            }
        }
    }

    #[test]
    #[should_panic(expected = "at least one mode")]
    fn test_empty_mode_table_is_rejected() {
        static NONE: [Mode; 0] = [];
        let _ = ModeTable::new(&NONE);
    }
}
