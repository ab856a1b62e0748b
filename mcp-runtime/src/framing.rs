use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// How a message arrived on stdio. Responses go back the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Framing {
    /// `Content-Length` headers, blank line, body.
    ContentLength,
    /// One JSON document per line.
    Line,
}

pub(crate) type Frame = (Result<Value, serde_json::Error>, Framing);

/// Read the next message. `Ok(None)` on clean EOF. A body that is not valid
/// JSON is returned as the inner `Err` so the caller can answer with a parse
/// error and keep serving.
pub(crate) async fn read_framed_json<R>(reader: &mut R) -> Result<Option<Frame>, std::io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut in_headers = false;

    loop {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            if !in_headers {
                return Ok(None);
            }
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "Unexpected EOF while reading MCP headers",
            ));
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if in_headers {
            if trimmed.is_empty() {
                break;
            }
            if let Some(len) = parse_content_length(trimmed)? {
                content_length = Some(len);
            }
            continue;
        }

        if trimmed.trim().is_empty() {
            continue;
        }
        if let Some(len) = parse_content_length(trimmed)? {
            content_length = Some(len);
            in_headers = true;
            continue;
        }
        return Ok(Some((serde_json::from_str(trimmed), Framing::Line)));
    }

    let content_length = content_length.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        )
    })?;
    let mut payload = vec![0_u8; content_length];
    reader.read_exact(&mut payload).await?;

    Ok(Some((serde_json::from_slice(&payload), Framing::ContentLength)))
}

fn parse_content_length(line: &str) -> Result<Option<usize>, std::io::Error> {
    if !line.to_ascii_lowercase().starts_with("content-length:") {
        return Ok(None);
    }
    let raw_len = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_default();
    raw_len.parse::<usize>().map(Some).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Invalid Content-Length header",
        )
    })
}

pub(crate) async fn write_framed_json<W>(
    writer: &mut W,
    value: &Value,
    framing: Framing,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(value).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to serialize JSON: {e}"),
        )
    })?;
    match framing {
        Framing::ContentLength => {
            let header = format!(
                "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n",
                body.len()
            );
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(&body).await?;
        }
        Framing::Line => {
            writer.write_all(&body).await?;
            writer.write_all(b"\n").await?;
        }
    }
    writer.flush().await?;
    Ok(())
}
