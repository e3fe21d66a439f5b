use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use palette::Srgb;
use paint_by_numbers_wasm::{
    LabelMap, Outcome, Palette, PipelineConfig, PixelBuffer, QuantizeOptions, RegionOptions,
    RenderOptions, RenderStyle, Session, classify, discover_regions, paint_by_numbers_bytes,
    quantize, render, run,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Cursor;

fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

/// Four colored blocks, each 60x60.
fn blocks() -> RgbImage {
    RgbImage::from_fn(120, 120, |x, y| match (x < 60, y < 60) {
        (true, true) => Rgb([220, 40, 40]),
        (false, true) => Rgb([40, 200, 60]),
        (true, false) => Rgb([30, 50, 210]),
        (false, false) => Rgb([245, 240, 230]),
    })
}

#[test]
fn red_quadrant_scenario() {
    let mut pixels = vec![Srgb::new(0, 0, 255); 16];
    for i in [0, 1, 4, 5] {
        pixels[i] = Srgb::new(255, 0, 0);
    }
    let buffer = PixelBuffer::new(4, 4, pixels).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    let palette = quantize(&buffer, 2, &QuantizeOptions::default(), &mut rng).unwrap();
    let red = palette.nearest(Srgb::new(255, 0, 0));
    let blue = palette.nearest(Srgb::new(0, 0, 255));
    assert_ne!(red, blue);
    assert_eq!(palette.get(red), Some(Srgb::new(255, 0, 0)));
    assert_eq!(palette.get(blue), Some(Srgb::new(0, 0, 255)));

    let labels = classify(&buffer, &palette);
    for y in 0..4 {
        for x in 0..4 {
            let expected = if x < 2 && y < 2 { red } else { blue };
            assert_eq!(labels.get(x, y), expected);
        }
    }

    // both components are far below the default minimum
    assert!(discover_regions(&labels, &RegionOptions::default()).is_empty());
}

#[test]
fn solid_color_scenario() {
    let color = Srgb::new(90, 160, 30);
    let buffer = PixelBuffer::new(100, 100, vec![color; 10_000]).unwrap();
    let mut rng = StdRng::seed_from_u64(8);

    let palette = quantize(&buffer, 4, &QuantizeOptions::default(), &mut rng).unwrap();
    assert_eq!(palette.colors(), &[color; 4]);

    let labels = classify(&buffer, &palette);
    assert!(labels.labels().iter().all(|&l| l == labels.labels()[0]));

    let regions = discover_regions(&labels, &RegionOptions::default());
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].size, 10_000);
}

#[test]
fn label_map_halves_draw_one_border_column() {
    let labels: Vec<usize> = (0..40)
        .flat_map(|_| (0..30).map(|x| usize::from(x >= 15)))
        .collect();
    let map = LabelMap::new(30, 40, labels).unwrap();
    let palette = Palette::new(vec![Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)]);
    let opts = RenderOptions {
        style: RenderStyle::Outline,
        numbers: false,
        ..RenderOptions::default()
    };
    let img = render(&map, &palette, &[], &opts);
    let inked: Vec<u32> = img
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0 == [0, 0, 0])
        .map(|(x, _, _)| x)
        .collect();
    assert_eq!(inked.len(), 40);
    assert!(inked.iter().all(|&x| x == 14));
}

#[test]
fn every_present_color_gets_a_number() {
    let config = PipelineConfig {
        palette_size: 4,
        ..PipelineConfig::default()
    };
    let image = DynamicImage::ImageRgb8(blocks());
    let mut rng = StdRng::seed_from_u64(77);
    let art = run(&image, &config, &mut rng).unwrap();

    assert_eq!(art.palette.len(), 4);
    // blocks sharing a label may merge, so between one and four regions
    assert!((1..=4).contains(&art.regions.len()));
    for r in &art.regions {
        assert!(r.size > 100);
        assert!(r.palette_index < art.palette.len());
        assert_eq!(art.labels.get(r.x, r.y), r.palette_index);
    }
    let mut present: Vec<usize> = art.labels.labels().to_vec();
    present.sort_unstable();
    present.dedup();
    for label in present {
        assert!(art.regions.iter().any(|r| r.palette_index == label), "label {label}");
    }
    assert_eq!(art.original, blocks());
}

#[test]
fn regions_are_disjoint() {
    let config = PipelineConfig::default();
    let image = DynamicImage::ImageRgb8(blocks());
    let art = run(&image, &config, &mut StdRng::seed_from_u64(3)).unwrap();
    let total: usize = art.regions.iter().map(|r| r.size).sum();
    assert!(total <= 120 * 120);
}

#[test]
fn native_bytes_api_returns_png_and_legend() {
    let config = PipelineConfig {
        palette_size: 5,
        order: paint_by_numbers_wasm::PaletteOrder::Brightness,
        ..PipelineConfig::default()
    };
    let (png, legend) = paint_by_numbers_bytes(&png_bytes(&blocks()), &config, Some(1)).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (120, 120));
    assert_eq!(legend.len(), 5);
    assert_eq!(legend.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    let brightness: Vec<f32> = legend
        .iter()
        .map(|(_, c)| paint_by_numbers_wasm::color::brightness(*c))
        .collect();
    assert!(brightness.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn same_seed_same_artwork() {
    let bytes = png_bytes(&blocks());
    let config = PipelineConfig::default();
    let a = paint_by_numbers_bytes(&bytes, &config, Some(99)).unwrap();
    let b = paint_by_numbers_bytes(&bytes, &config, Some(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn saved_file_matches_rendered_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artwork.png");
    let art = run(
        &DynamicImage::ImageRgb8(blocks()),
        &PipelineConfig::default(),
        &mut StdRng::seed_from_u64(4),
    )
    .unwrap();
    art.save_png(&path).unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, art.to_png().unwrap());
    assert_eq!(image::open(&path).unwrap().to_rgb8(), art.rendered);
}

#[test]
fn session_keeps_last_good_artwork() {
    let session = Session::new();
    let config = PipelineConfig::default();
    let mut rng = StdRng::seed_from_u64(10);

    let Outcome::Shown(first) = session.run(&png_bytes(&blocks()), &config, &mut rng) else {
        panic!("valid image should render");
    };
    let failed = session.run(b"\x89PNG but broken", &config, &mut rng);
    assert!(matches!(failed, Outcome::Failed { previous: Some(_), .. }));
    assert_eq!(session.current().unwrap().rendered, first.rendered);

    let bad_k = PipelineConfig {
        palette_size: 0,
        ..PipelineConfig::default()
    };
    assert!(matches!(
        session.run(&png_bytes(&blocks()), &bad_k, &mut rng),
        Outcome::Failed { .. }
    ));
    assert!(session.current().is_some());
}
