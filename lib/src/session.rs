use crate::{
    context::{FillDirection, MatchContext, SampleFrom},
    geometry::{Point, Rect},
    progress::{CancelToken, FillProgress, ProgressStat},
    resynthesizer::{FillOutcome, Resynthesizer},
    selection::{render_mask, Selection},
    errors::SizeMismatch,
    utils::{crop, load_image, load_mask},
    Error, ImageSource,
};
use image::{GrayImage, Rgba, RgbaImage};
use log::{debug, info};
use std::{path::Path, sync::mpsc};

/// The user facing knobs of a fill
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameters {
    /// How far around the selection, in pixels, source pixels are sampled
    pub sample_size: u32,
    pub sample_from: SampleFrom,
    pub fill_direction: FillDirection,
    /// `None` picks a different seed for every run
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            sample_size: 50,
            sample_from: SampleFrom::AllAround,
            fill_direction: FillDirection::Random,
            seed: None,
        }
    }
}

impl Parameters {
    pub fn match_context(&self) -> MatchContext {
        MatchContext::from_policy(self.sample_from, self.fill_direction)
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// The masks only depend on the selection and the sample size, so they are
/// kept around between runs
struct Masks {
    sample_size: u32,
    target: GrayImage,
    source: GrayImage,
}

/// The result of a `Session::run()`
pub enum RunOutcome {
    Filled(FilledImage),
    /// The run was canceled, the input image is left as is
    Canceled,
}

/// Content aware fill session.
///
/// A session owns the image and the selection to fill. Calling `run()` fills
/// a copy of the image, the session can be run again, eg with different
/// parameters, and only rebuilds its masks when the sample size or the
/// selection changes.
///
/// # Example
/// ```no_run
/// use resynthesizer::{geometry::Rect, Selection, CancelToken, RunOutcome};
///
/// let mut session = resynthesizer::Session::builder()
///     .sample_size(30)
///     .seed(10)
///     .build(&"imgs/beach.jpg", Selection::from_rects(vec![Rect::new(40, 40, 20, 10)]))
///     .expect("failed to build session");
///
/// if let RunOutcome::Filled(filled) = session.run(None, &CancelToken::new()).unwrap() {
///     filled.save("beach_filled.png").expect("failed to save image");
/// }
/// ```
pub struct Session {
    image: RgbaImage,
    selection: Selection,
    params: Parameters,
    masks: Option<Masks>,
    mask_builds: usize,
}

impl Session {
    /// Creates a new session with default parameters.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn parameters(&self) -> Parameters {
        self.params
    }

    /// Changes the parameters used by the next run
    pub fn set_parameters(&mut self, params: Parameters) {
        self.params = params;
    }

    /// Replaces the selection, the cached masks are discarded
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), Error> {
        check_selection(&self.image, &selection)?;
        self.selection = selection;
        self.masks = None;
        Ok(())
    }

    /// The part of the image handed to the engine: the selection bounds
    /// grown by the sample size, only along the axis being sampled from.
    pub fn source_rect(&self) -> Rect {
        let image_rect = Rect::new(0, 0, self.image.width(), self.image.height());
        let selected = self.selection.bounds().intersect(&image_rect);
        let expanded = selected
            .inflate(self.sample_reach())
            .intersect(&image_rect);

        match self.params.sample_from {
            SampleFrom::AllAround => expanded,
            SampleFrom::Sides => Rect::new(expanded.x, selected.y, expanded.width, selected.height),
            SampleFrom::TopAndBottom => {
                Rect::new(selected.x, expanded.y, selected.width, expanded.height)
            }
        }
    }

    /// The sample size in pixels, larger values can't reach any further
    /// than the image itself
    fn sample_reach(&self) -> i32 {
        let (width, height) = self.image.dimensions();
        self.params.sample_size.min(width.max(height)) as i32
    }

    fn masks(&mut self) -> &Masks {
        let sample_size = self.params.sample_size;
        let reach = self.sample_reach();

        let masks = match self.masks.take() {
            Some(masks) if masks.sample_size == sample_size => masks,
            _ => {
                let (width, height) = self.image.dimensions();
                let scans = self.selection.scans();

                debug!(
                    "building masks for {} scans with a sample size of {}",
                    scans.len(),
                    sample_size
                );

                self.mask_builds += 1;
                Masks {
                    sample_size,
                    target: render_mask(width, height, scans, 0, &[]),
                    source: render_mask(width, height, scans, reach, scans),
                }
            }
        };

        self.masks.get_or_insert(masks)
    }

    /// Fills the selection on a worker thread, forwarding progress updates to
    /// `progress` on the calling thread until the fill is done.
    pub fn run(
        &mut self,
        progress: Option<&mut dyn FillProgress>,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, Error> {
        let crop_rect = self.source_rect();
        let context = self.params.match_context();
        let seed = self.params.seed.unwrap_or_else(clock_seed);

        let (target_mask, source_mask) = {
            let masks = self.masks();
            (crop(&masks.target, crop_rect), crop(&masks.source, crop_rect))
        };
        let cropped = crop(&self.image, crop_rect);

        debug!(
            "running {} fill on {:?} with seed {}",
            context, crop_rect, seed
        );

        let engine = Resynthesizer::new(
            cropped.clone(),
            target_mask,
            cropped,
            source_mask,
            context,
            seed,
        )?;

        let (tx, rx) = mpsc::channel::<ProgressStat>();

        let joined = crossbeam_utils::thread::scope(|s| {
            let handle = s.spawn(move |_| {
                let mut engine = engine;
                let mut send = |stat| {
                    // The receiver only goes away once we're done
                    let _ = tx.send(stat);
                };
                let outcome = engine.content_aware_fill(&mut send, cancel);
                (engine, outcome)
            });

            if let Some(progress) = progress {
                for stat in rx.iter() {
                    progress.update(stat);
                }
            }

            handle.join()
        });

        let (engine, outcome) = match joined {
            Ok(Ok(res)) => res,
            Ok(Err(panic)) | Err(panic) => std::panic::resume_unwind(panic),
        };

        match outcome? {
            FillOutcome::Canceled => Ok(RunOutcome::Canceled),
            FillOutcome::Completed {
                passes,
                betterments,
            } => {
                info!(
                    "filled selection in {} passes with {} betterments",
                    passes, betterments
                );

                let origin = Point::new(crop_rect.x, crop_rect.y);
                let mut image = self.image.clone();
                let mut sources = Vec::new();

                for (target, source) in engine.assignments() {
                    let color = *engine.target().get_pixel(target.x as u32, target.y as u32);
                    let target = target + origin;
                    image.put_pixel(target.x as u32, target.y as u32, color);
                    sources.push((target, source + origin));
                }

                Ok(RunOutcome::Filled(FilledImage {
                    image,
                    sources,
                    source_rect: crop_rect,
                }))
            }
        }
    }
}

fn check_selection(image: &RgbaImage, selection: &Selection) -> Result<(), Error> {
    let image_rect = Rect::new(0, 0, image.width(), image.height());

    if selection.is_empty() || selection.bounds().intersect(&image_rect).is_empty() {
        return Err(Error::EmptySelection);
    }

    Ok(())
}

/// Builds a session by setting parameters, calling `build` loads the image
/// and checks that there is something to fill
#[derive(Default)]
pub struct SessionBuilder {
    params: Parameters,
}

impl SessionBuilder {
    /// Creates a new `SessionBuilder`, can also be created via
    /// `Session::builder()`
    pub fn new() -> Self {
        Self::default()
    }

    /// How many pixels around the selection are sampled from.
    ///
    /// Default: 50
    pub fn sample_size(mut self, pixels: u32) -> Self {
        self.params.sample_size = pixels;
        self
    }

    /// Which side of the selection is sampled from.
    ///
    /// Default: [`SampleFrom::AllAround`]
    pub fn sample_from(mut self, sample_from: SampleFrom) -> Self {
        self.params.sample_from = sample_from;
        self
    }

    /// The order the selected pixels are filled in.
    ///
    /// Default: [`FillDirection::Random`]
    pub fn fill_direction(mut self, fill_direction: FillDirection) -> Self {
        self.params.fill_direction = fill_direction;
        self
    }

    /// A seed makes runs reproducible, the same image, selection and
    /// parameters always give the same output.
    ///
    /// Default: a new seed is picked for every run
    pub fn seed(mut self, value: u64) -> Self {
        self.params.seed = Some(value);
        self
    }

    /// Replaces all of the parameters at once
    pub fn parameters(mut self, params: Parameters) -> Self {
        self.params = params;
        self
    }

    /// Loads the image and creates a `Session`, fails if the selection
    /// doesn't cover any pixel of the image
    pub fn build<'a, I: Into<ImageSource<'a>>>(
        self,
        image: I,
        selection: Selection,
    ) -> Result<Session, Error> {
        let image = load_image(image.into())?;
        check_selection(&image, &selection)?;

        Ok(Session {
            image,
            selection,
            params: self.params,
            masks: None,
            mask_builds: 0,
        })
    }

    /// Like `build`, but the selection is read from a mask image of the same
    /// size, where every non-black, non-transparent pixel is selected
    pub fn build_masked<'a, 'm, I: Into<ImageSource<'a>>, M: Into<ImageSource<'m>>>(
        self,
        image: I,
        mask: M,
    ) -> Result<Session, Error> {
        let image = load_image(image.into())?;
        let mask = load_mask(mask.into())?;

        if image.dimensions() != mask.dimensions() {
            return Err(Error::SizeMismatch(SizeMismatch {
                image: image.dimensions(),
                mask: mask.dimensions(),
            }));
        }

        self.build(image, Selection::from_mask(&mask))
    }
}

/// An image filled by a `Session::run()`
pub struct FilledImage {
    image: RgbaImage,
    sources: Vec<(Point, Point)>,
    source_rect: Rect,
}

impl FilledImage {
    /// Saves the filled image to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent_path) = path.parent() {
            std::fs::create_dir_all(&parent_path)?;
        }

        self.image.save(&path)?;
        Ok(())
    }

    /// Writes the filled image to the specified stream
    pub fn write<W: std::io::Write>(
        self,
        writer: &mut W,
        fmt: image::ImageOutputFormat,
    ) -> Result<(), Error> {
        let dyn_img = image::DynamicImage::ImageRgba8(self.into_image());
        Ok(dyn_img.write_to(writer, fmt)?)
    }

    /// Each filled pixel, in image coordinates, with the pixel of the input
    /// image it was copied from
    pub fn sources(&self) -> &[(Point, Point)] {
        &self.sources
    }

    /// The part of the input image that was sampled from
    pub fn source_rect(&self) -> Rect {
        self.source_rect
    }

    /// An image the size of the output where every filled pixel encodes the
    /// location it was copied from, x in red and y in green, relative to the
    /// sampled area. Pixels that weren't filled are transparent.
    pub fn source_map(&self) -> RgbaImage {
        let mut map = RgbaImage::new(self.image.width(), self.image.height());
        let scale = |v: i32, origin: i32, extent: u32| {
            ((v - origin) as u64 * 255 / u64::from(extent.max(2) - 1)).min(255) as u8
        };

        for (target, source) in &self.sources {
            map.put_pixel(
                target.x as u32,
                target.y as u32,
                Rgba([
                    scale(source.x, self.source_rect.x, self.source_rect.width),
                    scale(source.y, self.source_rect.y, self.source_rect.height),
                    0,
                    255,
                ]),
            );
        }

        map
    }

    /// Saves the source map, see `source_map`
    pub fn save_debug<P: AsRef<Path>>(&self, dir: P) -> Result<(), Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(&dir)?;

        self.source_map().save(&dir.join("source_map.png"))?;

        Ok(())
    }

    /// Returns the filled image
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl AsRef<RgbaImage> for FilledImage {
    fn as_ref(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    fn pattern(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 8 % 256) as u8, (y * 8 % 256) as u8, ((x ^ y) * 4 % 256) as u8, 255])
        })
    }

    fn session(sel: Rect, params: Parameters) -> Session {
        Session::builder()
            .parameters(params)
            .build(pattern(32, 24), Selection::from_rects(vec![sel]))
            .unwrap()
    }

    fn seeded(sample_size: u32, sample_from: SampleFrom) -> Parameters {
        Parameters {
            sample_size,
            sample_from,
            fill_direction: FillDirection::InwardToCenter,
            seed: Some(1_198_472),
        }
    }

    fn filled(outcome: RunOutcome) -> FilledImage {
        match outcome {
            RunOutcome::Filled(f) => f,
            RunOutcome::Canceled => panic!("run was canceled"),
        }
    }

    #[test]
    fn mask_must_match_the_image() {
        let mask = image::DynamicImage::ImageLuma8(GrayImage::new(8, 9));
        let res = Session::builder().build_masked(pattern(8, 8), mask);

        assert!(matches!(res, Err(Error::SizeMismatch(_))));

        let mut mask = GrayImage::new(8, 8);
        mask.put_pixel(3, 4, image::Luma([255]));
        let s = Session::builder()
            .build_masked(pattern(8, 8), image::DynamicImage::ImageLuma8(mask))
            .unwrap();
        assert_eq!(s.selection().bounds(), Rect::new(3, 4, 1, 1));
    }

    #[test]
    fn rejects_empty_selections() {
        let empty = Session::builder().build(pattern(8, 8), Selection::default());
        assert!(matches!(empty, Err(Error::EmptySelection)));

        let outside = Session::builder().build(
            pattern(8, 8),
            Selection::from_rects(vec![Rect::new(10, 10, 4, 4)]),
        );
        assert!(matches!(outside, Err(Error::EmptySelection)));
    }

    #[test]
    fn source_rect_per_policy() {
        let sel = Rect::new(12, 8, 6, 4);

        let s = session(sel, seeded(3, SampleFrom::AllAround));
        assert_eq!(s.source_rect(), Rect::new(9, 5, 12, 10));

        let s = session(sel, seeded(3, SampleFrom::Sides));
        assert_eq!(s.source_rect(), Rect::new(9, 8, 12, 4));

        let s = session(sel, seeded(3, SampleFrom::TopAndBottom));
        assert_eq!(s.source_rect(), Rect::new(12, 5, 6, 10));

        // clipped to the image
        let s = session(Rect::new(0, 0, 4, 4), seeded(5, SampleFrom::AllAround));
        assert_eq!(s.source_rect(), Rect::new(0, 0, 9, 9));
    }

    #[test]
    fn fills_only_the_selection() {
        let sel = Rect::new(12, 8, 6, 4);
        let mut s = session(sel, seeded(4, SampleFrom::AllAround));
        let original = s.image().clone();

        let out = filled(s.run(None, &CancelToken::new()).unwrap());
        assert_eq!(out.sources().len(), 24);

        let sample_area = Rect::new(8, 4, 14, 12);
        for (target, source) in out.sources() {
            assert!(sel.contains(*target));
            assert!(sample_area.contains(*source) && !sel.contains(*source));
            assert_eq!(
                out.as_ref().get_pixel(target.x as u32, target.y as u32),
                original.get_pixel(source.x as u32, source.y as u32)
            );
        }

        let img = out.into_image();
        assert_eq!(img.dimensions(), original.dimensions());
        for (x, y, p) in img.enumerate_pixels() {
            if !sel.contains(Point::new(x as i32, y as i32)) {
                assert_eq!(p, original.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn sides_only_samples_beside_the_selection() {
        let sel = Rect::new(12, 8, 6, 4);
        let mut s = session(sel, seeded(4, SampleFrom::Sides));

        let out = filled(s.run(None, &CancelToken::new()).unwrap());
        for (_, source) in out.sources() {
            assert!(source.y >= sel.y && source.y < sel.bottom());
            assert!(source.x < sel.x || source.x >= sel.right());
        }
    }

    #[test]
    fn same_seed_same_image() {
        let sel = Rect::new(10, 6, 8, 8);
        let mut a = session(sel, seeded(6, SampleFrom::AllAround));
        let mut b = session(sel, seeded(6, SampleFrom::AllAround));

        let a = filled(a.run(None, &CancelToken::new()).unwrap()).into_image();
        let b = filled(b.run(None, &CancelToken::new()).unwrap()).into_image();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn masks_are_cached_per_sample_size() {
        let sel = Rect::new(10, 6, 4, 4);
        let mut s = session(sel, seeded(3, SampleFrom::AllAround));
        let cancel = CancelToken::new();

        filled(s.run(None, &cancel).unwrap());
        filled(s.run(None, &cancel).unwrap());
        assert_eq!(s.mask_builds, 1);

        s.set_parameters(Parameters {
            fill_direction: FillDirection::OutwardFromCenter,
            sample_from: SampleFrom::TopAndBottom,
            ..s.parameters()
        });
        filled(s.run(None, &cancel).unwrap());
        assert_eq!(s.mask_builds, 1);

        s.set_parameters(seeded(5, SampleFrom::AllAround));
        filled(s.run(None, &cancel).unwrap());
        assert_eq!(s.mask_builds, 2);

        s.set_selection(Selection::from_rects(vec![Rect::new(2, 2, 3, 3)]))
            .unwrap();
        filled(s.run(None, &cancel).unwrap());
        assert_eq!(s.mask_builds, 3);

        assert!(matches!(
            s.set_selection(Selection::default()),
            Err(Error::EmptySelection)
        ));
    }

    #[test]
    fn huge_sample_sizes_cover_the_image() {
        let sel = Rect::new(12, 8, 6, 4);

        let s = session(sel, seeded(1 << 31, SampleFrom::AllAround));
        assert_eq!(s.source_rect(), Rect::new(0, 0, 32, 24));

        let mut s = session(sel, seeded(u32::MAX, SampleFrom::Sides));
        assert_eq!(s.source_rect(), Rect::new(0, 8, 32, 4));

        let out = filled(s.run(None, &CancelToken::new()).unwrap());
        assert_eq!(out.sources().len(), 24);
        for (_, source) in out.sources() {
            assert!(!sel.contains(*source));
        }
    }

    #[test]
    fn no_sample_area_is_an_error() {
        let mut s = session(Rect::new(0, 0, 32, 24), seeded(0, SampleFrom::AllAround));

        assert!(matches!(
            s.run(None, &CancelToken::new()),
            Err(Error::NoSourcePoints)
        ));
    }

    #[test]
    fn canceled_before_starting() {
        let mut s = session(Rect::new(10, 6, 4, 4), seeded(3, SampleFrom::AllAround));
        let cancel = CancelToken::new();
        cancel.cancel();

        assert!(matches!(
            s.run(None, &cancel),
            Ok(RunOutcome::Canceled)
        ));
    }

    #[test]
    fn progress_is_forwarded() {
        let mut s = session(Rect::new(10, 6, 6, 6), seeded(4, SampleFrom::AllAround));
        let mut updates = Vec::new();
        let mut on_progress = |stat: ProgressStat| updates.push(stat.percent());

        filled(s.run(Some(&mut on_progress), &CancelToken::new()).unwrap());

        assert!(!updates.is_empty());
        assert_eq!(updates.last(), Some(&100));
        assert!(updates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn source_map_marks_filled_pixels() {
        let sel = Rect::new(12, 8, 3, 3);
        let mut s = session(sel, seeded(4, SampleFrom::AllAround));
        let out = filled(s.run(None, &CancelToken::new()).unwrap());

        let map = out.source_map();
        assert_eq!(map.dimensions(), (32, 24));

        let opaque: HashSet<_> = map
            .enumerate_pixels()
            .filter(|(_, _, p)| p[3] == 255)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(opaque.len(), 9);
        assert!(opaque.contains(&(12, 8)));

        let mut png = Vec::new();
        out.write(&mut png, image::ImageOutputFormat::Png).unwrap();
        assert!(!png.is_empty());
    }
}
