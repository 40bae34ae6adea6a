/// Monotonic simulation clock.
/// Advances by a fixed increment per tick, independent of wall-clock frame time.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Simulation time advanced per tick.
    step: f64,
    /// Accumulated simulation time.
    time: f64,
    /// Number of ticks since creation.
    ticks: u64,
}

impl SimulationClock {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            time: 0.0,
            ticks: 0,
        }
    }

    /// Advance by one tick. Returns the new simulation time.
    pub fn advance(&mut self) -> f64 {
        self.ticks += 1;
        // Multiply instead of accumulating so rounding error does not drift.
        self.time = self.ticks as f64 * self.step;
        self.time
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Ticks since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The fixed increment per tick.
    pub fn step(&self) -> f64 {
        self.step
    }
}
