// Pure render models for the hearts bar, score line and feedback texts.

pub const FULL_HEART: &str = "❤️";
pub const EMPTY_HEART: &str = "♡";
pub const FULL_HEART_CLASS: &str = "full-heart";
pub const EMPTY_HEART_CLASS: &str = "empty-heart";
pub const LOW_HEALTH_CLASS: &str = "low-health";
/// At or below this many lives (and above zero) the bar pulses.
pub const LOW_HEALTH_THRESHOLD: u32 = 3;

pub const SKIPPED_FEEDBACK: &str = "已跳过";
pub const NETWORK_ERROR_FEEDBACK: &str = "网络错误，请重试";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeSlot {
    Full,
    Empty,
}

impl LifeSlot {
    pub fn symbol(self) -> &'static str {
        match self {
            LifeSlot::Full => FULL_HEART,
            LifeSlot::Empty => EMPTY_HEART,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            LifeSlot::Full => FULL_HEART_CLASS,
            LifeSlot::Empty => EMPTY_HEART_CLASS,
        }
    }
}

/// Snapshot of the hearts bar; the view rebuilds its node from this every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivesView {
    pub slots: Vec<LifeSlot>,
    pub low_health: bool,
}

impl LivesView {
    pub fn full_count(&self) -> usize {
        self.slots.iter().filter(|s| **s == LifeSlot::Full).count()
    }
}

/// Exactly `total` slots; `current` is clamped into `[0, total]`.
pub fn lives_view(current: i32, total: u32) -> LivesView {
    let full = current.clamp(0, total as i32) as u32;
    let slots = (0..total)
        .map(|i| if i < full { LifeSlot::Full } else { LifeSlot::Empty })
        .collect();
    LivesView {
        slots,
        low_health: full > 0 && full <= LOW_HEALTH_THRESHOLD,
    }
}

pub fn score_text(current: u32, target: u32) -> String {
    format!("{current} / {target}")
}

pub fn deduction_feedback(points: u32) -> String {
    format!("-{points} {FULL_HEART}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_life_count_renders_total_slots() {
        let total = 10;
        for current in 0..=total as i32 {
            let view = lives_view(current, total);
            assert_eq!(view.slots.len(), total as usize);
            assert_eq!(view.full_count(), current as usize);
            assert!(view.slots[..current as usize].iter().all(|s| *s == LifeSlot::Full));
            assert_eq!(view.low_health, current > 0 && current <= 3);
        }
    }

    #[test]
    fn out_of_range_lives_are_clamped() {
        assert_eq!(lives_view(-2, 5).full_count(), 0);
        assert!(!lives_view(-2, 5).low_health);
        assert_eq!(lives_view(12, 5).full_count(), 5);
    }

    #[test]
    fn score_line() {
        assert_eq!(score_text(5, 10), "5 / 10");
    }
}
