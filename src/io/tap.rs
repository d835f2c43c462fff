//! Audio tap - copies of the rendered output for visualisation and capture
//!
//! The audio callback owns the producer half and must never block, so a full
//! ring drops the rest of the block instead of waiting for the reader.

use rtrb::{Consumer, Producer, PushError, RingBuffer};

/// Writer half, attached to a [`Voice`](crate::synth::Voice).
pub struct AudioTap {
    tx: Producer<f32>,
    dropped: u64,
}

/// Reader half, drained by the UI thread.
pub struct TapReader {
    rx: Consumer<f32>,
}

/// Create a tap able to buffer `capacity` samples between drains.
pub fn audio_tap(capacity: usize) -> (AudioTap, TapReader) {
    let (tx, rx) = RingBuffer::<f32>::new(capacity);
    (AudioTap { tx, dropped: 0 }, TapReader { rx })
}

impl AudioTap {
    pub fn push_block(&mut self, block: &[f32]) {
        for (i, &s) in block.iter().enumerate() {
            if let Err(PushError::Full(_)) = self.tx.push(s) {
                self.dropped += (block.len() - i) as u64;
                break;
            }
        }
    }

    /// Samples lost to a full ring since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl TapReader {
    /// Move everything currently buffered into `out`, returning the count.
    pub fn drain_into(&mut self, out: &mut Vec<f32>) -> usize {
        let mut n = 0;
        while let Ok(sample) = self.rx.pop() {
            out.push(sample);
            n += 1;
        }
        n
    }

    pub fn available(&self) -> usize {
        self.rx.slots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_samples_through_in_order() {
        let (mut tap, mut reader) = audio_tap(16);
        tap.push_block(&[0.1, 0.2, 0.3]);
        assert_eq!(reader.available(), 3);

        let mut out = Vec::new();
        assert_eq!(reader.drain_into(&mut out), 3);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn full_ring_drops_instead_of_blocking() {
        let (mut tap, mut reader) = audio_tap(4);
        tap.push_block(&[1.0; 6]);
        assert_eq!(tap.dropped(), 2);

        let mut out = Vec::new();
        reader.drain_into(&mut out);
        assert_eq!(out.len(), 4);
    }
}
