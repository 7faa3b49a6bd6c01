//! Timer reports.

use std::fmt;

/// Snapshot of the visible timers of a [`Registry`](crate::Registry).
///
/// A `Report` is detached from the registry it was taken from: it does not change
/// when the registry is updated later and can be sent to other threads.
///
/// The entries are in the order in which the timers were registered. Hidden timers
/// (keys starting with `_`) are not included.
///
/// # Examples
///
/// ```
/// use time_tally::Registry;
///
/// # fn main() -> time_tally::Result<()> {
/// let registry = Registry::new();
/// registry.increment("load", 1.5)?;
/// registry.define(["save"])?;
///
/// let report = registry.to_report();
/// assert_eq!(report.get("load"), Some(1.5));
/// assert_eq!(report.to_string(), "load: 1.5\nsave: 0\n");
///
/// for entry in report.entries() {
///     println!("{} took {} seconds in total", entry.name(), entry.seconds());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

/// Accumulated time of a single timer in a [`Report`].
#[derive(Clone, Debug, PartialEq)]
pub struct ReportEntry {
    name: String,
    seconds: f64,
}

impl Report {
    pub(crate) fn new(entries: Vec<ReportEntry>) -> Self {
        Self { entries }
    }

    /// The timers in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter()
    }

    /// The accumulated seconds of the timer `name`, if the report contains it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.seconds)
    }

    /// The number of timers in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report contains no timers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prints one `<name>: <seconds>` line per timer to stdout.
    ///
    /// Prints nothing if the report is empty, not even an empty line.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }

        print!("{self}");
    }
}

impl ReportEntry {
    pub(crate) fn new(name: String, seconds: f64) -> Self {
        Self { name, seconds }
    }

    /// The timer key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The accumulated time in seconds.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.seconds)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }

        Ok(())
    }
}
