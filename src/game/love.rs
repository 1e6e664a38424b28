use rand::Rng;

/// Full meter.
pub const LOVE_MAX: f32 = 100.0;
/// Upper bound of the random amount drained every tick.
pub const DEFAULT_DRAIN: f32 = 0.00001;

/// The player's "health": starts full and slowly drains.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoveMeter {
    value: f32,
    max_drain: f32,
}

impl Default for LoveMeter {
    fn default() -> Self {
        Self { value: LOVE_MAX, max_drain: DEFAULT_DRAIN }
    }
}

impl LoveMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drain(mut self, max_drain: f32) -> Self {
        self.max_drain = max_drain.max(0.0);
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value.clamp(0.0, LOVE_MAX);
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Fill level in `0.0..=1.0`, used for the meter bar.
    pub fn fraction(&self) -> f32 {
        self.value / LOVE_MAX
    }

    pub fn add(&mut self, amount: f32) {
        self.value = (self.value + amount).min(LOVE_MAX);
    }

    pub fn subtract(&mut self, amount: f32) {
        self.value = (self.value - amount).max(0.0);
    }

    /// Remove a random amount in `[0, max_drain)`. Returns what was removed.
    pub fn drain(&mut self, rng: &mut impl Rng) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let amount = rng.r#gen::<f32>() * self.max_drain;
        let before = self.value;
        self.subtract(amount);
        before - self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_add_and_subtract_clamp() {
        let mut meter = LoveMeter::new();
        meter.add(5.0);
        assert_eq!(meter.value(), LOVE_MAX);
        meter.subtract(250.0);
        assert_eq!(meter.value(), 0.0);
        assert!(meter.is_empty());
    }

    #[test]
    fn test_drain_stays_below_max() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut meter = LoveMeter::new().with_drain(0.5);
        for _ in 0..100 {
            let removed = meter.drain(&mut rng);
            assert!((0.0..0.5).contains(&removed));
        }
        assert!(meter.value() < LOVE_MAX);
    }
}
