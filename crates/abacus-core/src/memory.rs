/// Single accumulator register (MC / MR / M+ / M- / MS).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryRegister {
    value: f64,
}

impl MemoryRegister {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn add(&mut self, v: f64) {
        self.value += v;
    }

    pub fn subtract(&mut self, v: f64) {
        self.value -= v;
    }

    pub fn recall(&self) -> f64 {
        self.value
    }

    pub fn clear(&mut self) {
        self.value = 0.0;
    }

    pub fn store(&mut self, v: f64) {
        self.value = v;
    }
}
