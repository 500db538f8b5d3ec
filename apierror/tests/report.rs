use apierror::{INTERNAL_SERVER_ERROR, NOT_FOUND};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        let buf = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if let Ok(mut buf) = self.0.lock() {
            buf.extend_from_slice(data);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured(f: impl FnOnce()) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.contents()
}

#[test]
fn test_report_client_error_warns() {
    let err = NOT_FOUND.wrap_message("user 42");
    let out = captured(|| err.report());

    assert!(out.contains("WARN"));
    assert!(out.contains("not found"));
    assert!(out.contains("status=404"));
    assert!(out.contains("code=3"));
    assert!(out.contains("cause=user 42"));
    assert!(out.contains(&format!("location={}", err.frame())));
}

#[test]
fn test_report_server_error_without_cause() {
    let err = INTERNAL_SERVER_ERROR.trace();
    let out = captured(|| err.report());

    assert!(out.contains("ERROR"));
    assert!(out.contains("internal server error"));
    assert!(out.contains("status=500"));
    assert!(!out.contains("cause="));
}
