use core::slice::ChunksExact;

/// one decoded pixel: red, green, blue, alpha
pub type Rgba8 = [u8; 4];

/// a fully decoded image, 8 bits per channel RGBA, rows top-to-bottom.
///
/// the pixel buffer is owned; nothing here points back into the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
	width: u32,
	height: u32,
	pixels: Vec<Rgba8>,
}

impl DecodedImage {
	/// `pixels.len()` must be `width * height`.
	pub(crate) fn new(width: u32, height: u32, pixels: Vec<Rgba8>) -> Self {
		debug_assert_eq!(pixels.len(), width as usize * height as usize);
		Self {
			width,
			height,
			pixels,
		}
	}

	/// image width in pixels
	pub fn width(&self) -> u32 {
		self.width
	}

	/// image height in pixels
	pub fn height(&self) -> u32 {
		self.height
	}

	/// all pixels, row-major.
	pub fn pixels(&self) -> &[Rgba8] {
		&self.pixels
	}

	/// pixel at column `x`, row `y` (row 0 is the top).
	///
	/// returns `None` if the position is outside the image.
	pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels
			.get(y as usize * self.width as usize + x as usize)
			.copied()
	}

	/// iterate over rows, top to bottom.
	pub fn rows(&self) -> ChunksExact<'_, Rgba8> {
		self.pixels.chunks_exact(self.width as usize)
	}

	/// pixels as a flat byte slice (`R G B A R G B A ...`), ready for a texture upload.
	pub fn as_bytes(&self) -> &[u8] {
		self.pixels.as_flattened()
	}

	/// take the pixel buffer.
	pub fn into_pixels(self) -> Vec<Rgba8> {
		self.pixels
	}

	/// take the pixel buffer as flat bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.pixels.into_flattened()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn checkerboard() -> DecodedImage {
		let black = [0, 0, 0, 255];
		let white = [255, 255, 255, 255];
		DecodedImage::new(3, 2, vec![black, white, black, white, black, white])
	}

	#[test]
	fn test_pixel_lookup() {
		let image = checkerboard();
		assert_eq!(image.pixel(0, 0), Some([0, 0, 0, 255]));
		assert_eq!(image.pixel(0, 1), Some([255, 255, 255, 255]));
		assert_eq!(image.pixel(3, 0), None);
		assert_eq!(image.pixel(0, 2), None);
	}

	#[test]
	fn test_rows_and_bytes() {
		let image = checkerboard();
		assert_eq!(image.rows().count(), 2);
		assert!(image.rows().all(|row| row.len() == 3));
		assert_eq!(image.as_bytes().len(), 24);
		assert_eq!(&image.as_bytes()[4..8], &[255, 255, 255, 255]);
		assert_eq!(image.into_bytes().len(), 24);
	}
}
