//! Print the palette and dominant color of an image.
//!
//! Usage:
//!   cargo run --example extract --release -- <image> [colors] [quality]

use mmcq::{QuantizeConfig, SampleFilter};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let input = args.get(1).expect("usage: extract <image> [colors] [quality]");
    let colors: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(6);
    let quality: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);

    let img = image::open(input).unwrap().to_rgba8();
    let (w, h) = img.dimensions();
    let pixels: Vec<rgb::RGBA<u8>> = img
        .pixels()
        .map(|p| rgb::RGBA { r: p.0[0], g: p.0[1], b: p.0[2], a: p.0[3] })
        .collect();

    let samples = SampleFilter::new().quality(quality).sample(&pixels).unwrap();
    let config = QuantizeConfig::new().max_colors(colors);
    let map = match mmcq::quantize(&samples, &config) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("{input}: {e}");
            std::process::exit(1);
        }
    };

    eprintln!(
        "{input} ({w}x{h}, {} samples) -> {} colors",
        samples.len(),
        map.len()
    );
    for entry in map.entries() {
        let c = entry.color;
        println!(
            "#{:02x}{:02x}{:02x}  {:>8} samples  volume {}",
            c.r,
            c.g,
            c.b,
            entry.population,
            entry.bounds.volume()
        );
    }

    let dominant = mmcq::dominant_color(&pixels, &SampleFilter::new().quality(quality));
    match dominant {
        Ok(c) => println!("dominant: #{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        Err(e) => eprintln!("dominant: {e}"),
    }
}
