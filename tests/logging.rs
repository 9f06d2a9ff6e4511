use std::io;
use std::sync::{Arc, Mutex};
use termtool::{Level, LogFormat, critical, setup_logging_with_writer};
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    fn count(&self, line: &str) -> usize {
        self.lines().iter().filter(|l| l.as_str() == line).count()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// One test per process: the subscriber it installs is process-wide.
#[test]
fn test_repeated_setup_writes_each_record_once() {
    let output = Capture::default();
    let format = LogFormat::default();

    setup_logging_with_writer(Level::Warning, false, &format, output.clone()).unwrap();
    setup_logging_with_writer(Level::Warning, false, &format, output.clone()).unwrap();
    setup_logging_with_writer(Level::Warning, false, &format, output.clone()).unwrap();

    warn!("once");
    info!("hidden");
    assert_eq!(output.count("WARNING once"), 1);
    assert_eq!(output.lines(), ["WARNING once"]);

    setup_logging_with_writer(Level::Info, false, &format, output.clone()).unwrap();
    info!("shown");
    assert_eq!(output.count("INFO Set log level to INFO"), 1);
    assert_eq!(output.count("INFO shown"), 1);

    setup_logging_with_writer(Level::Critical, false, &LogFormat::new("{levelname}: {message}"), output.clone())
        .unwrap();
    warn!("dropped");
    critical!("kept");
    assert_eq!(output.count("CRITICAL: kept"), 1);
    assert_eq!(output.count("WARNING dropped"), 0);
    assert_eq!(output.lines().len(), 4);
}
