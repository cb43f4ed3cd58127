//! Upload progress tracking.

use std::io::{self, Read};

/// Receives the upload percentage in `[0,100]`.
pub type ProgressFn = Box<dyn FnMut(u8) + Send>;

/// Integer percentage of `loaded` over `total`, rounded to nearest.
/// An empty body counts as complete.
pub fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = loaded.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// Wraps the upload body and reports the share of bytes handed to the
/// transport. Reports are strictly increasing.
pub struct ProgressReader<R> {
    inner: R,
    total: u64,
    loaded: u64,
    last_reported: Option<u8>,
    on_progress: ProgressFn,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(inner: R, total: u64, on_progress: ProgressFn) -> Self {
        Self {
            inner,
            total,
            loaded: 0,
            last_reported: None,
            on_progress,
        }
    }

    fn report(&mut self) {
        let pct = percent(self.loaded, self.total);
        if self.last_reported.map_or(true, |last| pct > last) {
            self.last_reported = Some(pct);
            (self.on_progress)(pct);
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.loaded += n as u64;
        self.report();
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<u8>>>, ProgressFn) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, Box::new(move |p| sink.lock().unwrap().push(p)))
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(1, 200), 1);
        assert_eq!(percent(199, 200), 100);
        assert_eq!(percent(100, 300), 33);
        assert_eq!(percent(500, 100), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_reports_increase_and_finish_at_100() {
        let data = vec![7u8; 10_000];
        let (seen, callback) = recorder();
        let mut reader = ProgressReader::new(Cursor::new(data), 10_000, callback);

        let mut buf = [0u8; 333];
        while reader.read(&mut buf).unwrap() > 0 {}

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*seen.last().unwrap(), 100);
    }

    #[test]
    fn test_empty_body_reports_complete() {
        let (seen, callback) = recorder();
        let mut reader = ProgressReader::new(Cursor::new(Vec::<u8>::new()), 0, callback);
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }
}
