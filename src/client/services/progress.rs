use bytes::Bytes;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::{self, StreamExt};

const CHUNK_SIZE: usize = 64 * 1024;

/// Bytes of the file part handed to the transport so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn percent(&self) -> u8 {
        let total = self.total.max(1) as f64;
        ((self.sent as f64 * 100.0 / total).round() as u64).min(100) as u8
    }

    pub fn fraction(&self) -> f32 {
        self.percent() as f32 / 100.0
    }
}

pub type ProgressSender = UnboundedSender<UploadProgress>;
pub type ProgressReceiver = UnboundedReceiver<UploadProgress>;

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded()
}

/// Wrap a payload in a streaming body that reports progress as each chunk is polled.
pub fn progress_body(payload: Bytes, progress: Option<ProgressSender>) -> reqwest::Body {
    let total = payload.len() as u64;
    let mut sent = 0u64;
    let chunks = split_chunks(payload);
    let body = stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        let update = UploadProgress { sent, total };
        log::debug!("Upload progress: {}%", update.percent());
        if let Some(tx) = &progress {
            // receiver may be gone; the upload carries on regardless
            let _ = tx.unbounded_send(update);
        }
        Ok::<Bytes, std::io::Error>(chunk)
    });
    reqwest::Body::wrap_stream(body)
}

fn split_chunks(payload: Bytes) -> Vec<Bytes> {
    let len = payload.len();
    (0..len)
        .step_by(CHUNK_SIZE)
        .map(|start| payload.slice(start..(start + CHUNK_SIZE).min(len)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_and_survives_empty_total() {
        assert_eq!(UploadProgress { sent: 0, total: 0 }.percent(), 0);
        assert_eq!(UploadProgress { sent: 1, total: 3 }.percent(), 33);
        assert_eq!(UploadProgress { sent: 2, total: 3 }.percent(), 67);
        assert_eq!(UploadProgress { sent: 3, total: 3 }.percent(), 100);
    }

    #[test]
    fn fraction_follows_percent_and_caps_at_one() {
        assert_eq!(UploadProgress { sent: 0, total: 0 }.fraction(), 0.0);
        assert_eq!(UploadProgress { sent: 1, total: 4 }.fraction(), 0.25);
        assert_eq!(UploadProgress { sent: 9, total: 4 }.fraction(), 1.0);
    }

    #[test]
    fn chunks_cover_payload_in_order() {
        let payload = Bytes::from(vec![7u8; CHUNK_SIZE * 2 + 10]);
        let chunks = split_chunks(payload);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 10);
        assert!(split_chunks(Bytes::new()).is_empty());
    }
}
