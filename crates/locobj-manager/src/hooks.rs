//! Callbacks into the embedding host.

/// Progress reporting and blocking error display.
///
/// Long operations call [`pump_events`](HostHooks::pump_events) between
/// files so a single-threaded host can keep its UI responsive.
pub trait HostHooks {
    fn progress_begin(&mut self, _caption: &str) {}

    /// Progress in `0..=255`.
    fn progress_set(&mut self, _value: u8) {}

    fn progress_end(&mut self) {}

    fn pump_events(&mut self) {}

    /// Show an error the user must acknowledge. The caller aborts afterwards.
    fn show_fatal_error(&mut self, _title: &str, _message: &str) {}
}

/// Host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostHooks for NullHost {}
