pub(crate) const FIRST_DAY: u32 = 1;

/// In-game day counter. Only moves forward, one day per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayClock {
    day: u32,
}

impl Default for DayClock {
    fn default() -> Self {
        Self { day: FIRST_DAY }
    }
}

impl DayClock {
    pub(crate) fn day(&self) -> u32 {
        self.day
    }

    /// Advances to the next day and returns it.
    pub(crate) fn tick(&mut self) -> u32 {
        self.day = self.day.saturating_add(1);
        self.day
    }

    pub(crate) fn restore(&mut self, day: u32) {
        self.day = day;
    }
}
