//! image metadata: color type, bit depth and dimensions.

use crate::{Error, Result};

/// color bit depth
///
/// note that [`Self::One`], [`Self::Two`], [`Self::Four`] are only used with
/// indexed and grayscale images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BitDepth {
	/// 1 bit per sample
	One = 1,
	/// 2 bits per sample
	Two = 2,
	/// 4 bits per sample
	Four = 4,
	/// 8 bits per sample (most common)
	Eight = 8,
	/// 16 bits per sample, stored big-endian
	Sixteen = 16,
}

impl BitDepth {
	/// number of bits per sample
	pub fn bits(self) -> u8 {
		self as u8
	}

	fn from_byte(x: u8) -> Option<Self> {
		Some(match x {
			1 => Self::One,
			2 => Self::Two,
			4 => Self::Four,
			8 => Self::Eight,
			16 => Self::Sixteen,
			_ => return None,
		})
	}
}

/// color format of the encoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
	/// grayscale
	Gray,
	/// grayscale + alpha
	GrayAlpha,
	/// RGB
	Rgb,
	/// RGBA
	Rgba,
	/// indexed color (each sample is an index into the PLTE chunk)
	Indexed,
}

impl ColorType {
	fn from_byte(x: u8) -> Option<Self> {
		Some(match x {
			0 => Self::Gray,
			2 => Self::Rgb,
			3 => Self::Indexed,
			4 => Self::GrayAlpha,
			6 => Self::Rgba,
			_ => return None,
		})
	}

	/// number of samples per pixel
	pub fn channels(self) -> u8 {
		match self {
			Self::Gray | Self::Indexed => 1,
			Self::GrayAlpha => 2,
			Self::Rgb => 3,
			Self::Rgba => 4,
		}
	}

	/// whether the pixels carry their own alpha sample
	pub fn has_alpha(self) -> bool {
		matches!(self, Self::GrayAlpha | Self::Rgba)
	}

	/// whether PNG allows this color type at `bit_depth`
	pub fn supports(self, bit_depth: BitDepth) -> bool {
		match self {
			Self::Gray => true,
			Self::Indexed => bit_depth != BitDepth::Sixteen,
			Self::Rgb | Self::GrayAlpha | Self::Rgba => {
				matches!(bit_depth, BitDepth::Eight | BitDepth::Sixteen)
			}
		}
	}
}

/// image metadata found at the start of the PNG file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
	width: u32,
	height: u32,
	bit_depth: BitDepth,
	color_type: ColorType,
}

impl ImageHeader {
	/// validate and build a header.
	///
	/// fails with [`Error::Unsupported`] for color type/bit depth combinations
	/// PNG doesn't allow, and with [`Error::LimitsExceeded`] if a single row or
	/// the decoded RGBA buffer wouldn't be addressable.
	pub fn new(
		width: u32,
		height: u32,
		bit_depth: BitDepth,
		color_type: ColorType,
	) -> Result<Self> {
		if width == 0 || height == 0 {
			return Err(Error::Malformed(format!(
				"image dimensions {width}x{height} are empty"
			)));
		}
		if !color_type.supports(bit_depth) {
			return Err(Error::Unsupported {
				color_type,
				bit_depth,
			});
		}

		let bits_per_pixel = usize::from(bit_depth.bits()) * usize::from(color_type.channels());
		let row_fits = usize::try_from(width)
			.ok()
			.and_then(|w| w.checked_mul(bits_per_pixel))
			.and_then(|bits| bits.checked_add(7))
			.is_some();
		let rgba_fits = usize::try_from(width)
			.ok()
			.zip(usize::try_from(height).ok())
			.and_then(|(w, h)| w.checked_mul(h))
			.and_then(|area| area.checked_mul(4))
			.is_some();
		if !row_fits || !rgba_fits {
			return Err(Error::LimitsExceeded);
		}

		Ok(Self {
			width,
			height,
			bit_depth,
			color_type,
		})
	}

	/// width of image in pixels
	pub fn width(&self) -> u32 {
		self.width
	}
	/// height of image in pixels
	pub fn height(&self) -> u32 {
		self.height
	}
	/// bits per sample of image
	pub fn bit_depth(&self) -> BitDepth {
		self.bit_depth
	}
	/// number and type of color channels
	pub fn color_type(&self) -> ColorType {
		self.color_type
	}

	/// `width * height`
	pub fn pixel_count(&self) -> u64 {
		u64::from(self.width) * u64::from(self.height)
	}

	/// number of bytes in a single raw (undecoded) row of pixels
	pub fn bytes_per_row(&self) -> usize {
		(self.width as usize
			* usize::from(self.bit_depth.bits())
			* usize::from(self.color_type.channels())
			+ 7) / 8
	}

	/// number of bytes the decoded image occupies, at 4 bytes per pixel
	pub fn required_bytes_rgba8(&self) -> usize {
		4 * self.width as usize * self.height as usize
	}
}

/// reject color type/bit depth combinations PNG doesn't allow.
///
/// `bytes` is whatever follows the signature. only a complete IHDR with a
/// known color type and bit depth is judged here; anything else is left for
/// the PNG parser to report.
pub(crate) fn check_ihdr(bytes: &[u8]) -> Result<()> {
	// length (4), "IHDR", width (4), height (4), bit depth, color type
	let Some(ihdr) = bytes.get(..18) else {
		return Ok(());
	};
	if &ihdr[4..8] != b"IHDR" {
		return Ok(());
	}
	let (Some(bit_depth), Some(color_type)) =
		(BitDepth::from_byte(ihdr[16]), ColorType::from_byte(ihdr[17]))
	else {
		return Ok(());
	};
	if !color_type.supports(bit_depth) {
		return Err(Error::Unsupported {
			color_type,
			bit_depth,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bytes_per_row() {
		let h = ImageHeader::new(3, 1, BitDepth::One, ColorType::Gray).unwrap();
		assert_eq!(h.bytes_per_row(), 1);
		let h = ImageHeader::new(9, 1, BitDepth::One, ColorType::Gray).unwrap();
		assert_eq!(h.bytes_per_row(), 2);
		let h = ImageHeader::new(5, 2, BitDepth::Four, ColorType::Indexed).unwrap();
		assert_eq!(h.bytes_per_row(), 3);
		let h = ImageHeader::new(5, 2, BitDepth::Sixteen, ColorType::Rgba).unwrap();
		assert_eq!(h.bytes_per_row(), 40);
		assert_eq!(h.required_bytes_rgba8(), 40);
	}

	#[test]
	fn test_unsupported_combinations() {
		for (bit_depth, color_type) in [
			(BitDepth::Four, ColorType::Rgb),
			(BitDepth::Two, ColorType::GrayAlpha),
			(BitDepth::One, ColorType::Rgba),
			(BitDepth::Sixteen, ColorType::Indexed),
		] {
			let err = ImageHeader::new(4, 4, bit_depth, color_type).unwrap_err();
			assert!(matches!(err, Error::Unsupported { .. }), "{err}");
		}
	}

	fn ihdr(bit_depth: u8, color_type: u8) -> Vec<u8> {
		let mut chunk = vec![0, 0, 0, 13];
		chunk.extend_from_slice(b"IHDR");
		chunk.extend_from_slice(&[0, 0, 0, 2, 0, 0, 0, 1, bit_depth, color_type, 0, 0, 0]);
		chunk
	}

	#[test]
	fn test_check_ihdr() {
		let err = check_ihdr(&ihdr(4, 2)).unwrap_err();
		assert!(matches!(
			err,
			Error::Unsupported {
				color_type: ColorType::Rgb,
				bit_depth: BitDepth::Four
			}
		));
		assert!(check_ihdr(&ihdr(8, 2)).is_ok());
		assert!(check_ihdr(&ihdr(16, 0)).is_ok());
		// values with no meaning at all are the parser's business
		assert!(check_ihdr(&ihdr(3, 2)).is_ok());
		assert!(check_ihdr(&ihdr(8, 5)).is_ok());
		assert!(check_ihdr(&ihdr(4, 2)[..10]).is_ok());
	}

	#[test]
	fn test_empty_dimensions() {
		let err = ImageHeader::new(0, 4, BitDepth::Eight, ColorType::Rgb).unwrap_err();
		assert!(matches!(err, Error::Malformed(_)));
	}
}
