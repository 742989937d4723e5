//! Line-stream formatting for the CLI.
//!
//! Each input line is offered to the [`Formatter`]; JSON lines are replaced by their
//! summary presentation and everything else is echoed or dropped. Lines are read as
//! raw bytes so input that is not UTF-8 is passed along untouched.

use std::borrow::Cow;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::config::OutputConfig;
use crate::error::Result;
use crate::formatter::{FormattedEntry, Formatter};
use crate::metrics::BlobMetrics;
use crate::template::OutputMode;

/// Per-run presentation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Append the pretty JSON under plain summaries
    pub show_details: bool,
    /// Echo non-JSON lines instead of dropping them
    pub passthrough: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            show_details: false,
            passthrough: true,
        }
    }
}

impl From<&OutputConfig> for PipelineOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            show_details: config.show_details,
            passthrough: config.passthrough,
        }
    }
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub lines: u64,
    pub formatted: u64,
    pub passed_through: u64,
    pub dropped: u64,
}

/// Format lines from `reader` into `writer` until end of input or shutdown
pub async fn run<R, W>(
    mut reader: R,
    mut writer: W,
    formatter: &Formatter,
    options: PipelineOptions,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<PipelineStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    let mut stats = PipelineStats::default();
    let mut listening = true;

    loop {
        tokio::select! {
            biased;

            signal = shutdown.recv(), if listening => match signal {
                // No sender left, so no shutdown can arrive
                Err(RecvError::Closed) => listening = false,
                _ => {
                    tracing::info!("Shutdown requested, stopping pipeline");
                    break;
                }
            },

            // Partial reads stay in `line` if the shutdown branch wins
            read = reader.read_until(b'\n', &mut line) => {
                if read? == 0 {
                    break;
                }
                stats.lines += 1;
                process_line(trim_line_ending(&line), &mut writer, formatter, options, &mut stats)
                    .await?;
                line.clear();
            }
        }
    }

    writer.flush().await?;

    tracing::info!(
        lines = stats.lines,
        formatted = stats.formatted,
        passed_through = stats.passed_through,
        dropped = stats.dropped,
        "Pipeline finished"
    );

    Ok(stats)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

async fn process_line<W>(
    line: &[u8],
    writer: &mut W,
    formatter: &Formatter,
    options: PipelineOptions,
    stats: &mut PipelineStats,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let entry = match std::str::from_utf8(line) {
        Ok(text) => formatter.format_blob(text),
        Err(e) => {
            tracing::debug!(error = %e, "Line is not valid UTF-8");
            BlobMetrics::record_skipped("invalid_utf8");
            None
        }
    };

    let output: Cow<'_, [u8]> = match entry {
        Some(entry) => {
            stats.formatted += 1;
            let text = present(&entry, formatter.options().mode, options.show_details);
            Cow::Owned(text.into_bytes())
        }
        None if options.passthrough => {
            stats.passed_through += 1;
            Cow::Borrowed(line)
        }
        None => {
            stats.dropped += 1;
            return Ok(());
        }
    };

    writer.write_all(&output).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

fn present(entry: &FormattedEntry, mode: OutputMode, show_details: bool) -> String {
    match mode {
        OutputMode::Html => entry.to_html(),
        OutputMode::Plain => entry.to_text(show_details),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SummaryConfig;
    use crate::template::RenderOptions;

    fn plain_formatter(config: SummaryConfig) -> Formatter {
        Formatter::new(&config, RenderOptions::plain())
    }

    async fn run_plain(input: &[u8], options: PipelineOptions) -> (String, PipelineStats) {
        let (_tx, rx) = broadcast::channel(1);
        let formatter = plain_formatter(SummaryConfig::default());
        let mut output = Vec::new();
        let stats = run(input, &mut output, &formatter, options, rx)
            .await
            .unwrap();
        (String::from_utf8(output).unwrap(), stats)
    }

    #[tokio::test]
    async fn test_formats_json_and_passes_through_text() {
        let input = b"starting up\n{\"level\":\"ERROR\",\"message\":\"x\"}\n";
        let (output, stats) = run_plain(input, PipelineOptions::default()).await;

        assert_eq!(output, "starting up\nmessage: x\nlevel: ERROR\n");
        assert_eq!(
            stats,
            PipelineStats {
                lines: 2,
                formatted: 1,
                passed_through: 1,
                dropped: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_drops_text_without_passthrough() {
        let options = PipelineOptions {
            show_details: false,
            passthrough: false,
        };
        let (output, stats) = run_plain(b"noise\n{\"msg\":\"m\"}\n{broken\n", options).await;

        assert_eq!(output, "msg: m\n");
        assert_eq!(stats.dropped, 2);
    }

    #[tokio::test]
    async fn test_show_details() {
        let options = PipelineOptions {
            show_details: true,
            passthrough: true,
        };
        let (output, _) = run_plain(b"{\"msg\":\"m\"}", options).await;
        assert_eq!(output, "msg: m\n  {\n    \"msg\": \"m\"\n  }\n");
    }

    #[tokio::test]
    async fn test_html_mode() {
        let (_tx, rx) = broadcast::channel(1);
        let formatter = Formatter::new(
            &SummaryConfig::with_template("error['err']"),
            RenderOptions::default(),
        );
        let mut output = Vec::new();
        run(
            &b"{\"err\":\"<E>\"}\n"[..],
            &mut output,
            &formatter,
            PipelineOptions::default(),
            rx,
        )
        .await
        .unwrap();

        let html = String::from_utf8(output).unwrap();
        assert!(html.contains(r#"<span class="kibana-json-error">&lt;E&gt;</span>"#));
        assert!(html.ends_with("</pre></div>\n"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_run() {
        let input = b"{\"msg\":\"a\"}\n\xff\xfe bad\n{\"msg\":\"b\"}\n";
        let (_tx, rx) = broadcast::channel(1);
        let formatter = plain_formatter(SummaryConfig::default());
        let mut output = Vec::new();

        let stats = run(
            &input[..],
            &mut output,
            &formatter,
            PipelineOptions::default(),
            rx,
        )
        .await
        .unwrap();

        assert_eq!(output, b"msg: a\n\xff\xfe bad\nmsg: b\n".to_vec());
        assert_eq!(
            stats,
            PipelineStats {
                lines: 3,
                formatted: 2,
                passed_through: 1,
                dropped: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_dropped_without_passthrough() {
        let options = PipelineOptions {
            show_details: false,
            passthrough: false,
        };
        let (output, stats) = run_plain(b"\xc3\x28\n{\"msg\":\"ok\"}\r\n", options).await;

        assert_eq!(output, "msg: ok\n");
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.formatted, 1);
    }

    #[tokio::test]
    async fn test_lines_split_across_reads() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"msg\":")
            .read(b"\"a\"}\n{\"ms")
            .read(b"g\":\"b\"}\n")
            .build();
        let (_tx, rx) = broadcast::channel(1);
        let formatter = plain_formatter(SummaryConfig::default());
        let mut output = Vec::new();

        let stats = run(
            tokio::io::BufReader::new(reader),
            &mut output,
            &formatter,
            PipelineOptions::default(),
            rx,
        )
        .await
        .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "msg: a\nmsg: b\n");
        assert_eq!(stats.formatted, 2);
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let (tx, rx) = broadcast::channel(1);
        tx.send(()).unwrap();
        let formatter = plain_formatter(SummaryConfig::default());
        let mut output = Vec::new();

        let stats = run(
            &b"{\"msg\":\"never\"}\n"[..],
            &mut output,
            &formatter,
            PipelineOptions::default(),
            rx,
        )
        .await
        .unwrap();

        assert_eq!(stats.lines, 0);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_closed_shutdown_channel_is_ignored() {
        let (tx, rx) = broadcast::channel::<()>(1);
        drop(tx);
        let formatter = plain_formatter(SummaryConfig::default());
        let mut output = Vec::new();

        let stats = run(
            &b"{\"msg\":\"kept\"}\n"[..],
            &mut output,
            &formatter,
            PipelineOptions::default(),
            rx,
        )
        .await
        .unwrap();

        assert_eq!(stats.formatted, 1);
    }
}
