//! Loop guard for unbounded scans.

use super::error::InternalError;

/// Turns a scanning loop that stops advancing into an error.
///
/// Call [`advance`](Self::advance) once per iteration with the loop's driving
/// index. Every index must be strictly greater than the previous one.
#[derive(Debug)]
pub struct Watchdog {
    scanner: &'static str,
    last: Option<usize>,
}

impl Watchdog {
    pub fn new(scanner: &'static str) -> Self {
        Self {
            scanner,
            last: None,
        }
    }

    pub fn advance(&mut self, index: usize) -> Result<(), InternalError> {
        if self.last.is_some_and(|last| index <= last) {
            log::debug!("{} scanner stuck at index {}", self.scanner, index);
            return Err(InternalError::NoProgress {
                scanner: self.scanner,
                index,
            });
        }
        self.last = Some(index);
        Ok(())
    }
}
