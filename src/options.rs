use crate::{Error, ImageHeader, Result};

/// limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
	/// largest `width * height` that will be decoded.
	pub max_pixels: u64,
	/// memory the PNG parser may allocate for its own buffers, in bytes.
	pub max_bytes: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_pixels: 40_000_000,
			max_bytes: 160 * 1024 * 1024,
		}
	}
}

impl DecodeOptions {
	/// set [`Self::max_pixels`]
	pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
		self.max_pixels = max_pixels;
		self
	}

	/// set [`Self::max_bytes`]
	pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
		self.max_bytes = max_bytes;
		self
	}

	pub(crate) fn check(&self, header: &ImageHeader) -> Result<()> {
		if header.pixel_count() > self.max_pixels {
			log::debug!(
				"{}x{} image is over the {} pixel limit",
				header.width(),
				header.height(),
				self.max_pixels
			);
			return Err(Error::LimitsExceeded);
		}
		Ok(())
	}
}
