use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::application::data::LogLevel;

/// Builds the diagnostics subscriber, or nothing when logging is silenced.
///
/// `ansi` must follow the colour decision for the stream behind `writer`, so
/// redirected stderr receives plain text.
pub fn subscriber<W>(
    level: LogLevel,
    ansi: bool,
    writer: W,
) -> Option<impl Subscriber + Send + Sync + 'static>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = LevelFilter::from(level);
    if level == LevelFilter::OFF {
        return None;
    }
    Some(
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(writer)
            .with_ansi(ansi)
            .without_time()
            .compact()
            .finish(),
    )
}

/// In-memory log sink shared between a subscriber and the test reading it
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tracing::warn;

    fn log_warning(ansi: bool) -> String {
        let logs = CapturedLogs::default();
        let subscriber = subscriber(LogLevel::Warn, ansi, logs.clone()).unwrap();
        tracing::subscriber::with_default(subscriber, || warn!("listing looks odd"));
        logs.contents()
    }

    #[test]
    fn plain_output_has_no_escape_sequences() {
        let output = log_warning(false);
        assert!(output.contains("listing looks odd"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn coloured_output_has_escape_sequences() {
        assert!(log_warning(true).contains('\x1b'));
    }

    #[rstest]
    #[case(LogLevel::Warn, true)]
    #[case(LogLevel::Trace, true)]
    #[case(LogLevel::Silent, false)]
    fn silent_builds_no_subscriber(#[case] level: LogLevel, #[case] built: bool) {
        assert_eq!(subscriber(level, false, std::io::sink).is_some(), built);
    }
}
