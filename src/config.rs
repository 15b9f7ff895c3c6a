/// How opcode 8xy4 reports carry in VF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddFlag {
    /// VF = 1 when the sum overflows a byte, 0 otherwise.
    #[default]
    Carry,
    /// VF = 1 after every add, whether or not it carried. Kept for
    /// comparing against traces of interpreters that behave this way.
    AlwaysSet,
}

/// Interpreter configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub add_flag: AddFlag,
    /// Seed for the Cxkk random source. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_add_flag(mut self, add_flag: AddFlag) -> Self {
        self.add_flag = add_flag;
        self
    }
}
