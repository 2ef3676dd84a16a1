use resynthesizer as rs;
use rs::geometry::Rect;

fn main() -> Result<(), rs::Error> {
    // A brick wall, with a hole punched in it further down
    let wall = rs::image::RgbaImage::from_fn(160, 120, |x, y| {
        let row = y / 12;
        let shift = if row % 2 == 0 { 0 } else { 12 };
        let mortar = y % 12 == 0 || (x + shift) % 24 == 0;
        if mortar {
            rs::image::Rgba([200, 200, 190, 255])
        } else {
            let grain = ((x * 7 + y * 13) % 17) as u8;
            rs::image::Rgba([150 + grain, 60 + grain / 2, 40, 255])
        }
    });
    std::fs::create_dir_all("out")?;
    wall.save("out/01_input.png")?;

    let mut session = rs::Session::builder()
        // only look 30 pixels around the hole for bricks to copy
        .sample_size(30)
        // rebuild the wall from the edges of the hole toward its center
        .fill_direction(rs::FillDirection::InwardToCenter)
        .seed(42)
        .build(
            wall,
            rs::Selection::from_rects(vec![Rect::new(60, 50, 40, 30)]),
        )?;

    // print the progress as the passes go by
    let mut progress = |stat: rs::ProgressStat| println!("{}%", stat.percent());

    match session.run(Some(&mut progress), &rs::CancelToken::new())? {
        rs::RunOutcome::Filled(filled) => {
            // where each filled pixel was copied from
            filled.save_debug("out/01_debug")?;
            filled.save("out/01.png")
        }
        rs::RunOutcome::Canceled => Ok(()),
    }
}
