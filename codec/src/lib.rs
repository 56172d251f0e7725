//! Content-Length framing for Debug Adapter Protocol streams.
//!
//! The decoder yields the raw frame body so a relay can forward bytes
//! unmodified; interpreting the body is someone else's job.

use bytes::{Buf, Bytes};
use tokio_util::codec::Decoder;

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("invalid utf8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("invalid integer")]
    InvalidInteger(#[from] std::num::ParseIntError),
    #[error("missing content-length header")]
    MissingContentLengthHeader,
    #[error("io error")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default)]
pub struct DapDecoder {}

impl Decoder for DapDecoder {
    type Item = Bytes;

    type Error = CodecError;

    fn decode(&mut self, src: &mut bytes::BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // skip to the start of the first header
        let Some(start_pos) = src
            .windows("Content-Length".len())
            .position(|s| s == b"Content-Length")
        else {
            return Ok(None);
        };

        src.advance(start_pos);

        let Some(split_point) = src.windows(4).position(|s| s == b"\r\n\r\n") else {
            return Ok(None);
        };

        let headers = &src[..split_point];
        let header_len = headers.len();
        let content_length = 'cl: {
            let headers_str = std::str::from_utf8(headers)?;
            for header_str in headers_str.split("\r\n") {
                let mut raw_key_and_value = header_str.splitn(2, ':');
                let key = raw_key_and_value.next().unwrap_or_default().trim();
                let value = raw_key_and_value.next().unwrap_or_default().trim();
                if key == "Content-Length" {
                    break 'cl value.parse::<usize>()?;
                }
            }
            return Err(CodecError::MissingContentLengthHeader);
        };

        // check the buffer has enough bytes (including \r\n\r\n)
        if src.len() < header_len + 4 + content_length {
            return Ok(None);
        }

        src.advance(header_len + 4);
        Ok(Some(src.split_to(content_length).freeze()))
    }
}

/// Wraps a frame body in the wire framing.
pub fn encode_frame(body: &[u8]) -> Vec<u8> {
    let mut frame = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    frame.extend_from_slice(body);
    frame
}

#[cfg(test)]
mod tests {
    use bytes::BufMut;
    use futures::prelude::*;
    use tokio_util::codec::FramedRead;

    use super::*;

    async fn read_all(input: &[u8]) -> Vec<Bytes> {
        let mut frames = Vec::new();
        let mut framed_read = FramedRead::new(input, DapDecoder::default());
        while let Some(frame) = framed_read.next().await {
            frames.push(frame.unwrap());
        }
        frames
    }

    #[tokio::test]
    async fn single_frame() {
        let input = encode_frame(br#"{"seq":1,"type":"event","event":"initialized"}"#);
        let frames = read_all(&input).await;
        assert_eq!(frames.len(), 1);
        assert_eq!(
            &frames[0][..],
            br#"{"seq":1,"type":"event","event":"initialized"}"#
        );
    }

    #[tokio::test]
    async fn consecutive_frames() {
        let mut input = encode_frame(b"{\"seq\":1}");
        input.extend(encode_frame(b"{\"seq\":2}"));
        let frames = read_all(&input).await;
        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[1][..], b"{\"seq\":2}");
    }

    #[tokio::test]
    async fn leading_noise_is_skipped() {
        let mut input = b"WARNING: something\r\n".to_vec();
        input.extend(encode_frame(b"{\"seq\":1}"));
        let frames = read_all(&input).await;
        assert_eq!(frames.len(), 1);
    }

    #[tokio::test]
    async fn incomplete_body_waits_for_more_input() {
        let full = encode_frame(b"{\"seq\":1}");
        let mut buffer = bytes::BytesMut::new();
        buffer.put(&full[..full.len() - 3]);

        let mut decoder = DapDecoder::default();
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.put(&full[full.len() - 3..]);
        let frame = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&frame[..], b"{\"seq\":1}");
    }

    #[tokio::test]
    async fn extra_headers_are_tolerated() {
        let body = b"{\"seq\":1}";
        let input = format!(
            "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n",
            body.len()
        )
        .into_bytes()
        .into_iter()
        .chain(body.iter().copied())
        .collect::<Vec<_>>();
        let frames = read_all(&input).await;
        assert_eq!(frames.len(), 1);
    }
}
