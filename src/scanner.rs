//! Camera-stream boundary: planar luminance frames and a scanner that keeps
//! at most one decode in flight, dropping frames offered while busy.

use crate::config::DecodeOptions;
use crate::error::{QrError, Result};
use crate::models::QRCode;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// Borrowed 8-bit luminance plane, rows `stride` bytes apart
/// (the Y plane of a YUV camera frame)
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> Frame<'a> {
    /// Tightly packed plane
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::with_stride(data, width, height, width)
    }

    /// Plane whose rows start `stride` bytes apart
    pub fn with_stride(data: &'a [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(QrError::InvalidInput(format!(
                "frame must be non-empty, got {width}x{height}"
            )));
        }
        if stride < width {
            return Err(QrError::InvalidInput(format!(
                "stride {stride} is shorter than width {width}"
            )));
        }
        let needed = stride * (height - 1) + width;
        if data.len() < needed {
            return Err(QrError::InvalidInput(format!(
                "{} byte frame buffer, {width}x{height} at stride {stride} needs {needed}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes between row starts
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixels of row `y`
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Packed `width * height` luminance, borrowed when already packed
    pub fn luma(&self) -> Cow<'a, [u8]> {
        if self.stride == self.width {
            return Cow::Borrowed(&self.data[..self.width * self.height]);
        }
        let mut packed = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            packed.extend_from_slice(self.row(y));
        }
        Cow::Owned(packed)
    }
}

/// Result of offering a frame to a [`FrameScanner`]
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Another decode was in flight; the frame was dropped
    Skipped,
    /// A symbol was decoded
    Decoded(QRCode),
    /// The frame was processed without a result
    Failed(QrError),
}

/// Clears the busy flag when the decode finishes, including by panic
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Per-stream back-pressure around [`crate::decode_frame_with`]
#[derive(Debug, Default)]
pub struct FrameScanner {
    busy: AtomicBool,
    options: DecodeOptions,
}

impl FrameScanner {
    /// Scanner with default decode options
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner decoding with `options`
    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            busy: AtomicBool::new(false),
            options,
        }
    }

    /// True while a decode is running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Decode `frame` unless a decode is already running on this scanner
    pub fn offer(&self, frame: &Frame<'_>) -> ScanOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("scanner busy, frame dropped");
            return ScanOutcome::Skipped;
        }
        let _guard = BusyGuard(&self.busy);
        match crate::decode_frame_with(frame, &self.options) {
            Ok(qr) => ScanOutcome::Decoded(qr),
            Err(err) => ScanOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_validation() {
        let data = vec![0u8; 100];
        assert!(Frame::new(&data, 10, 10).is_ok());
        assert!(Frame::new(&data, 10, 11).is_err());
        assert!(Frame::with_stride(&data, 12, 5, 10).is_err());
        assert!(Frame::new(&data, 0, 10).is_err());
        // Last row needs only `width` bytes
        assert!(Frame::with_stride(&data, 8, 10, 10).is_ok());
    }

    #[test]
    fn test_strided_luma_is_packed() {
        let data: Vec<u8> = (0..12).collect();
        let frame = Frame::with_stride(&data, 3, 3, 4).unwrap();
        assert_eq!(frame.row(1), &[4, 5, 6]);
        assert_eq!(frame.luma().as_ref(), &[0, 1, 2, 4, 5, 6, 8, 9, 10]);

        let packed = Frame::new(&data, 4, 3).unwrap();
        assert!(matches!(packed.luma(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_busy_scanner_skips() {
        let data = vec![128u8; 64 * 64];
        let frame = Frame::new(&data, 64, 64).unwrap();
        let scanner = FrameScanner::new();

        scanner.busy.store(true, Ordering::Release);
        assert_eq!(scanner.offer(&frame), ScanOutcome::Skipped);

        scanner.busy.store(false, Ordering::Release);
        assert_eq!(scanner.offer(&frame), ScanOutcome::Failed(QrError::NotFound));
        assert!(!scanner.is_busy());
    }
}
