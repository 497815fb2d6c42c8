use std::fmt;

/// Counters from a completed session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Dataset groups copied to the output
    pub groups: usize,
    /// Datasets read, transformed and written
    pub datasets: usize,
    /// Doubles decoded from the input
    pub values_read: usize,
    /// Doubles encoded to the output
    pub values_written: usize,
    /// Size of the output in bytes
    pub bytes_written: u64,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rescaled {} dataset(s) in {} group(s): {} values in, {} values out, {} bytes written",
            self.datasets, self.groups, self.values_read, self.values_written, self.bytes_written
        )
    }
}
