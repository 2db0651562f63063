use clap::ArgMatches;
use std::ffi::OsString;
use std::io::Write;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::cli::{self, FLAG_BODY, FLAG_TITLE};
use crate::config::Config;
use crate::error::PushyError;
use crate::plog;
use crate::pushbullet::{NoteSender, NotificationRequest, Target};

/// Parse `args`, send one note and report the outcome on `out`.
///
/// Returns the process exit code: `0` on success (and for `--help` /
/// `--version`), `1` for any failure. Nothing is written on success.
pub async fn run<I, T, R, W>(
    args: I,
    config: &Config,
    stdin: &mut R,
    sender: &dyn NoteSender,
    out: &mut W,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    R: AsyncRead + Unpin,
    W: Write,
{
    let matches = match cli::parse(args) {
        Ok(matches) => matches,
        Err(e) => {
            let _ = write!(out, "{}", e.render());
            return if e.use_stderr() { 1 } else { 0 };
        }
    };

    match dispatch(config, &matches, stdin, sender).await {
        Ok(_) => 0,
        Err(e) => {
            plog!("failed: {e}");
            let _ = writeln!(out, "{e}");
            1
        }
    }
}

/// Validate the inputs in order (API key, title, body) and hand the note to
/// `sender`. The sender is never called unless every check passed.
pub async fn dispatch<R>(
    config: &Config,
    matches: &ArgMatches,
    stdin: &mut R,
    sender: &dyn NoteSender,
) -> Result<NotificationRequest, PushyError>
where
    R: AsyncRead + Unpin,
{
    if config.api_key.is_empty() {
        return Err(PushyError::MissingApiKey);
    }

    let title = match matches.try_get_one::<String>(FLAG_TITLE) {
        Ok(Some(title)) => title.clone(),
        Ok(None) => {
            return Err(PushyError::FlagRetrieval {
                flag: FLAG_TITLE,
                reason: "flag was not set".to_string(),
            });
        }
        Err(e) => {
            return Err(PushyError::FlagRetrieval {
                flag: FLAG_TITLE,
                reason: e.to_string(),
            });
        }
    };

    let body = matches
        .try_get_one::<String>(FLAG_BODY)
        .map_err(|e| PushyError::FlagRetrieval {
            flag: FLAG_BODY,
            reason: e.to_string(),
        })?
        .cloned()
        .unwrap_or_default();

    let body = if body.is_empty() {
        read_body(stdin).await?
    } else {
        body
    };

    let request = NotificationRequest {
        target: Target::AllDevices,
        title,
        body,
    };

    plog!("sending note title={:?}", request.title);
    sender.push_note(&config.api_key, &request).await?;
    plog!("note sent");

    Ok(request)
}

/// Read stdin to end of stream. The bytes are used as-is, trailing newline
/// included.
async fn read_body<R>(stdin: &mut R) -> Result<String, PushyError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    stdin
        .read_to_end(&mut buf)
        .await
        .map_err(PushyError::StdinRead)?;
    plog!("read {} bytes of body from stdin", buf.len());

    String::from_utf8(buf).map_err(|e| {
        PushyError::StdinRead(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
