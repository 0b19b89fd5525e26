//! conversion of raw scanlines into 8-bit RGBA.
//!
//! every color type and bit depth goes through the same steps: samples are
//! read at their source depth, 16-bit samples keep their high byte, palette
//! indices are looked up, low-depth gray is scaled up to 0..=255, the tRNS
//! chunk (if any) turns into alpha, opaque formats get alpha 255, and gray is
//! copied into red, green and blue.

use log::warn;

use crate::{BitDepth, ColorType, Error, ImageHeader, Result, Rgba8};

type Palette = [Rgba8; 256];

/// the color that tRNS marks fully transparent, compared at source depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorKey {
	None,
	Gray(u16),
	Rgb([u16; 3]),
}

/// turns raw rows of one image into RGBA rows.
#[derive(Debug)]
pub(crate) struct RowConverter {
	header: ImageHeader,
	palette: Palette,
	palette_len: usize,
	key: ColorKey,
	warned_index: bool,
}

impl RowConverter {
	/// `plte` and `trns` are the raw contents of the PLTE and tRNS chunks.
	pub(crate) fn new(
		header: &ImageHeader,
		plte: Option<&[u8]>,
		trns: Option<&[u8]>,
	) -> Result<Self> {
		let mut palette = [[0, 0, 0, 255]; 256];
		let mut palette_len = 0;
		if header.color_type() == ColorType::Indexed {
			let Some(plte) = plte else {
				return Err(Error::Malformed("missing PLTE chunk".into()));
			};
			if plte.is_empty() || plte.len() % 3 != 0 || plte.len() > 3 * palette.len() {
				return Err(Error::Malformed(format!(
					"bad PLTE chunk length {}",
					plte.len()
				)));
			}
			for (entry, rgb) in palette.iter_mut().zip(plte.chunks_exact(3)) {
				entry[..3].copy_from_slice(rgb);
			}
			palette_len = plte.len() / 3;
		}

		let key = match trns {
			Some(trns) => read_transparency(header, trns, &mut palette[..palette_len]),
			None => ColorKey::None,
		};

		Ok(Self {
			header: *header,
			palette,
			palette_len,
			key,
			warned_index: false,
		})
	}

	/// convert one raw row into `out`, which holds exactly `width` pixels.
	pub(crate) fn convert_row(&mut self, raw: &[u8], out: &mut [Rgba8]) -> Result<()> {
		let expected = self.header.bytes_per_row();
		if raw.len() < expected {
			return Err(Error::Malformed(format!(
				"scanline has {} bytes, expected {expected}",
				raw.len()
			)));
		}
		debug_assert_eq!(out.len(), self.header.width() as usize);

		let depth = self.header.bit_depth();
		match self.header.color_type() {
			ColorType::Gray => {
				for (x, pixel) in out.iter_mut().enumerate() {
					let gray = sample(raw, x, depth);
					let l = to_u8(gray, depth);
					*pixel = [l, l, l, self.alpha_for(ColorKey::Gray(gray))];
				}
			}
			ColorType::GrayAlpha => {
				for (x, pixel) in out.iter_mut().enumerate() {
					let l = to_u8(sample(raw, 2 * x, depth), depth);
					let a = to_u8(sample(raw, 2 * x + 1, depth), depth);
					*pixel = [l, l, l, a];
				}
			}
			ColorType::Rgb => {
				for (x, pixel) in out.iter_mut().enumerate() {
					let rgb = [
						sample(raw, 3 * x, depth),
						sample(raw, 3 * x + 1, depth),
						sample(raw, 3 * x + 2, depth),
					];
					*pixel = [
						to_u8(rgb[0], depth),
						to_u8(rgb[1], depth),
						to_u8(rgb[2], depth),
						self.alpha_for(ColorKey::Rgb(rgb)),
					];
				}
			}
			ColorType::Rgba => {
				for (x, pixel) in out.iter_mut().enumerate() {
					for (c, channel) in pixel.iter_mut().enumerate() {
						*channel = to_u8(sample(raw, 4 * x + c, depth), depth);
					}
				}
			}
			ColorType::Indexed => {
				for (x, pixel) in out.iter_mut().enumerate() {
					// bit depth is at most 8, so this is always in the table
					let index = usize::from(sample(raw, x, depth));
					if index >= self.palette_len && !self.warned_index {
						warn!(
							"palette index {index} out of range for {} entries, using opaque black",
							self.palette_len
						);
						self.warned_index = true;
					}
					*pixel = self.palette[index];
				}
			}
		}
		Ok(())
	}

	fn alpha_for(&self, color: ColorKey) -> u8 {
		if self.key == color {
			0
		} else {
			255
		}
	}
}

fn read_transparency(header: &ImageHeader, trns: &[u8], palette: &mut [Rgba8]) -> ColorKey {
	match header.color_type() {
		ColorType::Indexed => {
			if trns.len() > palette.len() {
				warn!(
					"tRNS chunk has {} entries for {} palette colors, ignoring the rest",
					trns.len(),
					palette.len()
				);
			}
			// entries past the end of tRNS stay opaque
			for (entry, &alpha) in palette.iter_mut().zip(trns) {
				entry[3] = alpha;
			}
			ColorKey::None
		}
		ColorType::Gray if trns.len() == 2 => {
			ColorKey::Gray(u16::from_be_bytes([trns[0], trns[1]]))
		}
		ColorType::Rgb if trns.len() == 6 => ColorKey::Rgb([
			u16::from_be_bytes([trns[0], trns[1]]),
			u16::from_be_bytes([trns[2], trns[3]]),
			u16::from_be_bytes([trns[4], trns[5]]),
		]),
		color_type if color_type.has_alpha() => {
			warn!("ignoring tRNS chunk on {color_type:?} image, it already has alpha");
			ColorKey::None
		}
		color_type => {
			warn!(
				"ignoring tRNS chunk of {} bytes on {color_type:?} image",
				trns.len()
			);
			ColorKey::None
		}
	}
}

/// sample number `index` of a raw row, as a value in `0..1 << bit_depth`
fn sample(row: &[u8], index: usize, bit_depth: BitDepth) -> u16 {
	match bit_depth {
		BitDepth::Eight => u16::from(row[index]),
		BitDepth::Sixteen => u16::from_be_bytes([row[2 * index], row[2 * index + 1]]),
		BitDepth::One | BitDepth::Two | BitDepth::Four => {
			let bits = usize::from(bit_depth.bits());
			let bit = index * bits;
			// NOTE: PNG packs samples most-significant-bit first
			let shift = 8 - bits - bit % 8;
			let mask = (1u8 << bits) - 1;
			u16::from((row[bit / 8] >> shift) & mask)
		}
	}
}

/// scale a sample to 0..=255.
///
/// 16-bit samples keep their high byte; low depths are replicated so that the
/// maximum maps to 255.
fn to_u8(sample: u16, bit_depth: BitDepth) -> u8 {
	match bit_depth {
		BitDepth::Sixteen => (sample >> 8) as u8,
		BitDepth::Eight => sample as u8,
		BitDepth::Four => sample as u8 * 0x11,
		BitDepth::Two => sample as u8 * 0x55,
		BitDepth::One => sample as u8 * 0xff,
	}
}
