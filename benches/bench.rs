use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// noisy RGB image, so zlib has something to do
fn make_png(width: u32, height: u32, color: png::ColorType) -> Vec<u8> {
	let channels = match color {
		png::ColorType::Rgb => 3,
		png::ColorType::Rgba => 4,
		_ => 1,
	};
	let mut state = 0x2545_f491_u32;
	let data: Vec<u8> = (0..width * height * channels)
		.map(|_| {
			state ^= state << 13;
			state ^= state >> 17;
			state ^= state << 5;
			(state >> 24) as u8
		})
		.collect();

	let mut out = Vec::new();
	let mut encoder = png::Encoder::new(&mut out, width, height);
	encoder.set_color(color);
	encoder.set_depth(png::BitDepth::Eight);
	if color == png::ColorType::Indexed {
		encoder.set_palette((0..=255u8).flat_map(|i| [i, 255 - i, i / 2]).collect::<Vec<_>>());
	}
	let mut writer = encoder.write_header().unwrap();
	writer.write_image_data(&data).unwrap();
	writer.finish().unwrap();
	out
}

fn run_benches(c: &mut Criterion) {
	let large_image = black_box(make_png(1920, 1080, png::ColorType::Rgb));
	let small_image = black_box(make_png(64, 64, png::ColorType::Rgb));
	let indexed_image = black_box(make_png(512, 512, png::ColorType::Indexed));

	let mut group = c.benchmark_group("large-image");
	group.sample_size(50);

	group.bench_function("rgbapng", |b| {
		b.iter(|| {
			let image = rgbapng::decode_png(&large_image).unwrap();
			black_box(image);
		})
	});

	group.bench_function("png", |b| {
		b.iter(|| {
			let mut decoder = png::Decoder::new(&large_image[..]);
			decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::ALPHA);
			let mut reader = decoder.read_info().unwrap();
			let mut png_buf = vec![0; reader.output_buffer_size()];
			reader.next_frame(&mut png_buf).unwrap();
			black_box(png_buf);
		})
	});
	group.finish();

	let mut group = c.benchmark_group("small-image");
	group.sample_size(1000);
	group.bench_function("rgbapng", |b| {
		b.iter(|| {
			let image = rgbapng::decode_png(&small_image).unwrap();
			black_box(image);
		})
	});
	group.bench_function("png", |b| {
		b.iter(|| {
			let mut decoder = png::Decoder::new(&small_image[..]);
			decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::ALPHA);
			let mut reader = decoder.read_info().unwrap();
			let mut png_buf = vec![0; reader.output_buffer_size()];
			reader.next_frame(&mut png_buf).unwrap();
			black_box(png_buf);
		})
	});
	group.finish();

	let mut group = c.benchmark_group("indexed-image");
	group.bench_function("rgbapng", |b| {
		b.iter(|| {
			let image = rgbapng::decode_png(&indexed_image).unwrap();
			black_box(image);
		})
	});
	group.finish();
}

criterion_group!(benches, run_benches);
criterion_main!(benches);
