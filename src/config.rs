/// # Quirks
/// Historical interpreters disagree on a few instructions. Each disagreement is a
/// switch here; the defaults are what most programs written since the 1990s expect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    pub subtract_flag: SubtractFlag,
    pub sprite_edges: SpriteEdges,
}

/// How `8xy5` and `8xy7` decide the value of VF
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubtractFlag {
    /// VF = 1 when the subtraction doesn't borrow (minuend >= subtrahend)
    NoBorrow,
    /// VF = 1 only when the minuend is strictly greater
    StrictGreater,
}

impl Default for SubtractFlag {
    fn default() -> Self {
        SubtractFlag::NoBorrow
    }
}

impl SubtractFlag {
    pub fn flag(self, minuend: u8, subtrahend: u8) -> u8 {
        let set = match self {
            SubtractFlag::NoBorrow => minuend >= subtrahend,
            SubtractFlag::StrictGreater => minuend > subtrahend,
        };
        u8::from(set)
    }
}

/// What happens to sprite pixels that fall off the edge of the display
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpriteEdges {
    /// They reappear on the opposite edge
    Wrap,
    /// They are dropped
    Clip,
}

impl Default for SpriteEdges {
    fn default() -> Self {
        SpriteEdges::Wrap
    }
}

/// When the delay and sound timers count down
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerPolicy {
    /// Once per executed instruction; reproducible but tied to dispatch speed
    PerInstruction,
    /// Only when the caller invokes `tick_timers`, which it should do at 60Hz
    Wallclock,
}

impl Default for TimerPolicy {
    fn default() -> Self {
        TimerPolicy::Wallclock
    }
}

/// Everything needed to build a machine
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    pub timers: TimerPolicy,
    /// Seed for `Cxnn`; drawn from the OS when absent
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_borrow_flag() {
        assert_eq!(SubtractFlag::NoBorrow.flag(0x33, 0x11), 1);
        assert_eq!(SubtractFlag::NoBorrow.flag(0x11, 0x11), 1);
        assert_eq!(SubtractFlag::NoBorrow.flag(0x11, 0x12), 0);
    }

    #[test]
    fn test_strict_greater_flag() {
        assert_eq!(SubtractFlag::StrictGreater.flag(0x33, 0x11), 1);
        assert_eq!(SubtractFlag::StrictGreater.flag(0x11, 0x11), 0);
        assert_eq!(SubtractFlag::StrictGreater.flag(0x11, 0x12), 0);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.quirks.subtract_flag, SubtractFlag::NoBorrow);
        assert_eq!(config.quirks.sprite_edges, SpriteEdges::Wrap);
        assert_eq!(config.timers, TimerPolicy::Wallclock);
        assert_eq!(config.seed, None);
    }
}
