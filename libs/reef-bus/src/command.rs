//! Command timing classification
//!
//! EZO circuits need a command-dependent settle time before their reply is
//! valid. The class is decided by string prefix, never by parsing the
//! command into a structured type.

/// Timing class of an EZO command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    /// Readings (`R...`) and calibrations (`CAL...`); the circuit needs the
    /// long settle time to produce a valid value.
    Long,
    /// `SLEEP...`; the circuit stops answering, so there is nothing to read
    /// back.
    Sleep,
    /// Everything else; acknowledged after the short settle time.
    Short,
}

impl CommandClass {
    /// Classify a command by prefix, case-insensitively.
    ///
    /// Rules are evaluated top to bottom: long-delay prefixes first, then
    /// the sleep prefix, else the short-delay default.
    pub fn classify(command: &str) -> Self {
        let upper = command.to_ascii_uppercase();
        if upper.starts_with('R') || upper.starts_with("CAL") {
            CommandClass::Long
        } else if upper.starts_with("SLEEP") {
            CommandClass::Sleep
        } else {
            CommandClass::Short
        }
    }
}
