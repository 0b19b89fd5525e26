//! print the size and top-left pixel of a PNG file.
//!
//! `RUST_LOG=debug cargo run --example info -- image.png`

fn main() {
	env_logger::init();

	let Some(path) = std::env::args_os().nth(1) else {
		eprintln!("usage: info <file.png>");
		std::process::exit(2);
	};
	let image = match rgbapng::decode_png_file(&path) {
		Ok(image) => image,
		Err(err) => {
			eprintln!("{}: {err}", path.to_string_lossy());
			std::process::exit(1);
		}
	};

	println!("{}×{} image", image.width(), image.height());
	println!("need {} bytes of texture memory", image.as_bytes().len());
	let [r, g, b, a] = image.pixels()[0];
	println!("top-left pixel is #{r:02x}{g:02x}{b:02x}{a:02x}");
	let transparent = image.pixels().iter().filter(|p| p[3] == 0).count();
	println!("{transparent} fully transparent pixels");
}
