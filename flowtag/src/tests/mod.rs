mod args_test;

/// Process-wide `log` backend for tests that assert on emitted diagnostics.
///
/// Records are kept per thread, so tests running in parallel only see their own.
#[cfg(test)]
pub(crate) mod captured_log {
    use std::cell::RefCell;
    use std::sync::Once;

    use log::{Level, LevelFilter, Log, Metadata, Record};

    struct CaptureLogger;

    thread_local! {
        static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    static CAPTURE: CaptureLogger = CaptureLogger;
    static INSTALL: Once = Once::new();

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            RECORDS.with(|records| {
                records
                    .borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }

        fn flush(&self) {}
    }

    /// Installs the capturing logger (once) and clears this thread's records.
    pub fn start() {
        INSTALL.call_once(|| {
            log::set_logger(&CAPTURE).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });
        RECORDS.with(|records| records.borrow_mut().clear());
    }

    /// Messages logged on this thread at exactly `level` since `start`.
    pub fn messages(level: Level) -> Vec<String> {
        RECORDS.with(|records| {
            records
                .borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, message)| message.clone())
                .collect()
        })
    }
}
