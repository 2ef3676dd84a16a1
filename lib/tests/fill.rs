use resynthesizer as rs;
use rs::{geometry::Rect, image::RgbaImage};
use std::collections::HashSet;

/// Diagonal stripes with a bit of hashed noise, so there is structure to
/// continue and no two neighborhoods are quite the same
fn stripes(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let band = ((x + 2 * y) / 5) % 3;
        let noise = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663)) % 24;
        let base = [40, 120, 200][band as usize] + noise;
        rs::image::Rgba([base as u8, (255 - base) as u8, (base / 2) as u8, 255])
    })
}

fn contains(rects: &[Rect], x: u32, y: u32) -> bool {
    rects
        .iter()
        .any(|r| r.contains(rs::geometry::Point::new(x as i32, y as i32)))
}

macro_rules! fill_runs {
    ($name:ident, $rects:expr, $builder:expr) => {
        #[test]
        fn $name() {
            let image = stripes(64, 48);
            let rects: Vec<Rect> = $rects;

            let run = || {
                let mut session = $builder
                    .build(image.clone(), rs::Selection::from_rects(rects.clone()))
                    .unwrap();

                match session.run(None, &rs::CancelToken::new()).unwrap() {
                    rs::RunOutcome::Filled(filled) => filled,
                    rs::RunOutcome::Canceled => panic!("nothing canceled the run"),
                }
            };

            let filled = run();
            let source_rect = filled.source_rect();
            let palette: HashSet<_> = image.pixels().map(|p| p.0).collect();

            let mut targets = HashSet::new();
            for (target, source) in filled.sources() {
                assert!(targets.insert(*target), "{:?} filled twice", target);
                assert!(source_rect.contains(*source));
                assert!(!contains(&rects, source.x as u32, source.y as u32));
            }

            let output = filled.into_image();
            assert_eq!(output.dimensions(), image.dimensions());

            let mut selected = 0;
            for (x, y, p) in output.enumerate_pixels() {
                if contains(&rects, x, y) {
                    selected += 1;
                    assert!(palette.contains(&p.0), "({}, {}) is not a copied color", x, y);
                } else {
                    assert_eq!(p, image.get_pixel(x, y));
                }
            }
            assert_eq!(selected, targets.len());

            // A fixed seed always gives the same image
            assert_eq!(run().into_image().as_raw(), output.as_raw());
        }
    };
}

fill_runs!(random_all_around, vec![Rect::new(24, 16, 12, 10)], {
    rs::Session::builder().sample_size(10).seed(1_198_472)
});

fill_runs!(inward_all_around, vec![Rect::new(24, 16, 12, 10)], {
    rs::Session::builder()
        .sample_size(10)
        .fill_direction(rs::FillDirection::InwardToCenter)
        .seed(7)
});

fill_runs!(outward_sides, vec![Rect::new(20, 10, 8, 20)], {
    rs::Session::builder()
        .sample_size(12)
        .sample_from(rs::SampleFrom::Sides)
        .fill_direction(rs::FillDirection::OutwardFromCenter)
        .seed(99)
});

fill_runs!(inward_top_and_bottom, vec![Rect::new(10, 20, 30, 6)], {
    rs::Session::builder()
        .sample_size(8)
        .sample_from(rs::SampleFrom::TopAndBottom)
        .fill_direction(rs::FillDirection::InwardToCenter)
        .seed(3)
});

fill_runs!(
    two_separate_holes,
    vec![Rect::new(4, 4, 6, 6), Rect::new(40, 30, 10, 8)],
    {
        rs::Session::builder()
            .sample_size(6)
            .fill_direction(rs::FillDirection::OutwardFromCenter)
            .seed(12)
    }
);

fill_runs!(hole_touching_the_edge, vec![Rect::new(0, 0, 16, 12)], {
    rs::Session::builder().sample_size(5).seed(4)
});

fill_runs!(
    l_shaped_hole,
    vec![Rect::new(20, 10, 6, 20), Rect::new(26, 24, 14, 6)],
    {
        rs::Session::builder()
            .parameters(rs::Parameters {
                sample_size: 8,
                sample_from: rs::SampleFrom::AllAround,
                fill_direction: rs::FillDirection::InwardToCenter,
                seed: Some(21),
            })
    }
);

#[test]
fn mask_file_selection() {
    let mut mask = rs::image::GrayImage::new(64, 48);
    for y in 10..20 {
        for x in 30..(30 + y) {
            mask.put_pixel(x, y, rs::image::Luma([255]));
        }
    }

    let selection = rs::Selection::from_mask(&mask);
    let selected = mask.pixels().filter(|p| p[0] != 0).count();
    let covered: u32 = selection.scans().iter().map(|r| r.width * r.height).sum();
    assert_eq!(covered as usize, selected);

    let mut session = rs::Session::builder()
        .sample_size(6)
        .seed(8)
        .build(stripes(64, 48), selection)
        .unwrap();

    match session.run(None, &rs::CancelToken::new()).unwrap() {
        rs::RunOutcome::Filled(filled) => assert_eq!(filled.sources().len(), selected),
        rs::RunOutcome::Canceled => panic!("nothing canceled the run"),
    }
}
