#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

mod convert;
mod header;
mod image;
mod options;
mod source;

pub use header::{BitDepth, ColorType, ImageHeader};
pub use image::{DecodedImage, Rgba8};
pub use options::DecodeOptions;
pub use source::{PngScanlines, ScanlineReader};

use convert::RowConverter;

/// the 8 bytes every PNG file starts with
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// IHDR chunk header plus data, everything but its CRC
const IHDR_PREFIX_LEN: usize = 8 + 13;

/// decoding error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// this file is not a PNG file (missing PNG signature).
	#[error("not a png file")]
	NotPng,
	/// the source couldn't be read, or ended early
	#[error("i/o error: {0}")]
	Io(#[from] io::Error),
	/// bad chunk, checksum, zlib stream, or missing image data (invalid PNG file)
	#[error("malformed png: {0}")]
	Malformed(String),
	/// color type/bit depth combination that can't be converted to RGBA
	#[error("unsupported format: {color_type:?} at {} bits per sample", .bit_depth.bits())]
	Unsupported {
		/// color type from the header
		color_type: ColorType,
		/// bit depth from the header
		bit_depth: BitDepth,
	},
	/// the image is larger than [`DecodeOptions`] allows, or than memory can address
	#[error("image exceeds decode limits")]
	LimitsExceeded,
}

/// alias for `Result<T, Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// decode image metadata.
///
/// this only reads the chunks in front of the image data.
pub fn decode_png_header(bytes: &[u8]) -> Result<ImageHeader> {
	read_signature(&mut &bytes[..])?;
	header::check_ihdr(&bytes[PNG_SIGNATURE.len()..])?;
	let source = PngScanlines::new(bytes, &DecodeOptions::default())?;
	Ok(*source.header())
}

/// decode an in-memory PNG file to 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage> {
	decode_png_reader(bytes, &DecodeOptions::default())
}

/// open and decode the PNG file at `path`.
///
/// the file is closed before this returns, whether decoding succeeded or not.
pub fn decode_png_file(path: impl AsRef<Path>) -> Result<DecodedImage> {
	let path = path.as_ref();
	let file = File::open(path)?;
	log::debug!("decoding {}", path.display());
	decode_png_reader(file, &DecodeOptions::default())
}

/// decode a PNG stream to 8-bit RGBA.
///
/// the signature is checked before anything else is read, so a non-PNG
/// source fails with [`Error::NotPng`] after at most 8 bytes.
pub fn decode_png_reader<R: Read>(
	mut reader: R,
	options: &DecodeOptions,
) -> Result<DecodedImage> {
	let signature = read_signature(&mut reader)?;
	let mut ihdr = Vec::with_capacity(IHDR_PREFIX_LEN);
	reader
		.by_ref()
		.take(IHDR_PREFIX_LEN as u64)
		.read_to_end(&mut ihdr)?;
	header::check_ihdr(&ihdr)?;

	let prefix = io::Cursor::new(signature).chain(io::Cursor::new(ihdr));
	let source = PngScanlines::new(prefix.chain(reader), options)?;
	options.check(source.header())?;
	decode_scanlines(source)
}

/// convert every row `source` yields into an RGBA image.
///
/// this is the whole decoder minus the PNG container parsing, so any
/// [`ScanlineReader`] can be plugged in. either every row converts or
/// nothing is returned.
pub fn decode_scanlines<S: ScanlineReader>(mut source: S) -> Result<DecodedImage> {
	let header = *source.header();
	log::debug!(
		"decoding {}x{} {:?} image at {} bits per sample",
		header.width(),
		header.height(),
		header.color_type(),
		header.bit_depth().bits()
	);
	let mut converter = RowConverter::new(&header, source.palette(), source.transparency())?;

	let width = header.width() as usize;
	let height = header.height() as usize;
	let mut pixels = vec![[0; 4]; width * height];
	for (y, out) in pixels.chunks_exact_mut(width).enumerate() {
		let Some(row) = source.next_scanline()? else {
			return Err(Error::Malformed(format!(
				"image data ends after {y} of {height} rows"
			)));
		};
		converter.convert_row(row, out)?;
	}
	source.finish()?;

	Ok(DecodedImage::new(header.width(), header.height(), pixels))
}

fn read_signature<R: Read>(reader: &mut R) -> Result<[u8; 8]> {
	let mut signature = [0; 8];
	match reader.read_exact(&mut signature) {
		Ok(()) => {}
		Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Err(Error::NotPng),
		Err(err) => return Err(err.into()),
	}
	if signature != PNG_SIGNATURE {
		return Err(Error::NotPng);
	}
	Ok(signature)
}
