//! where raw scanlines come from.
//!
//! the PNG container format (chunks, CRCs, zlib, filters, interlacing) is
//! handled by the [`png`] crate. this crate only asks it for unconverted rows
//! and does the RGBA conversion itself.

use std::io::Read;

use crate::{BitDepth, ColorType, DecodeOptions, Error, ImageHeader, Result};

/// a decoder that yields raw, unfiltered, deinterlaced scanlines.
///
/// rows are in the encoded format described by [`Self::header`]:
/// samples packed at their bit depth, 16-bit samples big-endian.
pub trait ScanlineReader {
	/// image metadata
	fn header(&self) -> &ImageHeader;

	/// contents of the PLTE chunk (RGB triples), if there was one
	fn palette(&self) -> Option<&[u8]>;

	/// contents of the tRNS chunk, if there was one
	fn transparency(&self) -> Option<&[u8]>;

	/// the next row, top to bottom, or `None` after the last one.
	///
	/// each row must be at least [`ImageHeader::bytes_per_row`] bytes long.
	fn next_scanline(&mut self) -> Result<Option<&[u8]>>;

	/// consume whatever follows the image data.
	///
	/// called once after every row has been read.
	fn finish(&mut self) -> Result<()> {
		Ok(())
	}
}

/// [`ScanlineReader`] backed by [`png::Reader`].
pub struct PngScanlines<R: Read> {
	reader: png::Reader<R>,
	header: ImageHeader,
	interlaced: bool,
	row: Vec<u8>,
	frame: Option<Frame>,
}

/// a whole deinterlaced image, for sources that can't be streamed row by row.
struct Frame {
	data: Vec<u8>,
	line_size: usize,
	next: usize,
}

impl<R: Read> PngScanlines<R> {
	/// read the PNG header (and every chunk up to the image data) from `reader`.
	///
	/// `reader` must start at the PNG signature.
	pub fn new(reader: R, options: &DecodeOptions) -> Result<Self> {
		let mut limits = png::Limits::default();
		limits.bytes = options.max_bytes;
		let mut decoder = png::Decoder::new_with_limits(reader, limits);
		decoder.set_transformations(png::Transformations::IDENTITY);
		let reader = decoder.read_info()?;

		let info = reader.info();
		let header = ImageHeader::new(
			info.width,
			info.height,
			info.bit_depth.into(),
			info.color_type.into(),
		)?;
		let interlaced = info.interlaced;

		Ok(Self {
			reader,
			header,
			interlaced,
			row: Vec::new(),
			frame: None,
		})
	}

	fn next_streamed(&mut self) -> Result<Option<&[u8]>> {
		match self.reader.next_row()? {
			Some(row) => {
				self.row.clear();
				self.row.extend_from_slice(row.data());
			}
			None => return Ok(None),
		}
		Ok(Some(&self.row))
	}

	fn next_buffered(&mut self) -> Result<Option<&[u8]>> {
		if self.frame.is_none() {
			let mut data = vec![0; self.reader.output_buffer_size()];
			let output = self.reader.next_frame(&mut data)?;
			self.frame = Some(Frame {
				data,
				line_size: output.line_size,
				next: 0,
			});
		}
		let Some(frame) = self.frame.as_mut() else {
			return Ok(None);
		};

		let start = frame.next * frame.line_size;
		let end = start + frame.line_size;
		if end > frame.data.len() {
			return Ok(None);
		}
		frame.next += 1;
		Ok(Some(&frame.data[start..end]))
	}
}

impl<R: Read> ScanlineReader for PngScanlines<R> {
	fn header(&self) -> &ImageHeader {
		&self.header
	}

	fn palette(&self) -> Option<&[u8]> {
		self.reader.info().palette.as_deref()
	}

	fn transparency(&self) -> Option<&[u8]> {
		self.reader.info().trns.as_deref()
	}

	fn next_scanline(&mut self) -> Result<Option<&[u8]>> {
		if self.interlaced {
			self.next_buffered()
		} else {
			self.next_streamed()
		}
	}

	fn finish(&mut self) -> Result<()> {
		self.reader.finish()?;
		Ok(())
	}
}

impl From<png::DecodingError> for Error {
	fn from(err: png::DecodingError) -> Self {
		match err {
			png::DecodingError::IoError(err) => Self::Io(err),
			png::DecodingError::LimitsExceeded => Self::LimitsExceeded,
			err => Self::Malformed(err.to_string()),
		}
	}
}

impl From<png::BitDepth> for BitDepth {
	fn from(depth: png::BitDepth) -> Self {
		match depth {
			png::BitDepth::One => Self::One,
			png::BitDepth::Two => Self::Two,
			png::BitDepth::Four => Self::Four,
			png::BitDepth::Eight => Self::Eight,
			png::BitDepth::Sixteen => Self::Sixteen,
		}
	}
}

impl From<png::ColorType> for ColorType {
	fn from(color_type: png::ColorType) -> Self {
		match color_type {
			png::ColorType::Grayscale => Self::Gray,
			png::ColorType::GrayscaleAlpha => Self::GrayAlpha,
			png::ColorType::Rgb => Self::Rgb,
			png::ColorType::Rgba => Self::Rgba,
			png::ColorType::Indexed => Self::Indexed,
		}
	}
}
