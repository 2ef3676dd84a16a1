mod logger;
mod progress_bar;

use structopt::StructOpt;

use progress_bar::FillProgressBar;
use resynthesizer::{
    image::ImageOutputFormat as ImgFmt, CancelToken, Error, FillDirection, FillProgress,
    ImageSource, RunOutcome, SampleFrom, Session,
};
use std::path::PathBuf;

fn parse_img_fmt(input: &str) -> Result<ImgFmt, Error> {
    let fmt = match input {
        "png" => ImgFmt::Png,
        "jpg" => ImgFmt::Jpeg(75),
        "bmp" => ImgFmt::Bmp,
        other => return Err(Error::UnsupportedOutputFormat(other.to_owned())),
    };

    Ok(fmt)
}

#[derive(StructOpt)]
#[structopt(
    name = "resynth",
    about = "Fills the masked area of an image with texture from its surroundings",
    rename_all = "kebab-case"
)]
struct Opt {
    /// The image to fill
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// A mask the size of the input image, every pixel that isn't black or
    /// transparent is filled
    #[structopt(long, parse(from_os_str))]
    mask: PathBuf,
    /// The path to save the filled image to, the file extensions of the path determines
    /// the image format used. You may use `-` for stdout.
    #[structopt(long = "out", short, parse(from_os_str))]
    output_path: PathBuf,
    /// The format to save the filled image as.
    ///
    /// NOTE: this will only apply when stdout is specified via `-o -`, otherwise the image
    /// format is determined by the file extension of the path provided to `-o`
    #[structopt(
        long,
        default_value = "png",
        parse(try_from_str = parse_img_fmt)
    )]
    out_fmt: ImgFmt,
    /// How many pixels around the masked area texture is taken from
    #[structopt(long, default_value = "50")]
    sample_size: u32,
    /// Where texture is taken from: 'all-around', 'sides' or 'top-and-bottom'
    #[structopt(long, default_value = "all-around")]
    sample_from: SampleFrom,
    /// The order pixels are filled in: 'random', 'inward' or 'outward'
    #[structopt(long, default_value = "random")]
    fill_direction: FillDirection,
    /// A seed value for the random generator, the same seed always gives the
    /// same result. A new one is picked for every run if not specified
    #[structopt(long)]
    seed: Option<u64>,
    /// Don't show a progress bar
    #[structopt(long)]
    no_progress: bool,
    /// A directory into which debug images are also saved.
    ///
    /// * `source_map.png` - Where each filled pixel was copied from, x in red and y in green
    #[structopt(long, parse(from_os_str))]
    debug_out_dir: Option<PathBuf>,
    /// Log more details to stderr, can be repeated
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() {
    if let Err(e) = real_main() {
        if atty::is(atty::Stream::Stderr) {
            eprintln!("\x1b[31merror\x1b[0m: {}", e);
        } else {
            eprintln!("error: {}", e);
        }

        std::process::exit(1);
    }
}

fn real_main() -> Result<(), Error> {
    let args = Opt::from_args();

    logger::init(args.verbose);

    // Check that the extension for the path supplied by the user is one of the ones we support
    {
        match args.output_path.extension().and_then(|ext| ext.to_str()) {
            Some("png") | Some("jpg") | Some("bmp") => {}
            None => {}
            Some(other) => return Err(Error::UnsupportedOutputFormat(other.to_owned())),
        }
    }

    let mut sb = Session::builder()
        .sample_size(args.sample_size)
        .sample_from(args.sample_from)
        .fill_direction(args.fill_direction);

    if let Some(seed) = args.seed {
        sb = sb.seed(seed);
    }

    let mut session = sb.build_masked(&args.input, ImageSource::from_path(&args.mask))?;

    let mut progress = if args.no_progress {
        None
    } else {
        Some(FillProgressBar::new())
    };

    let outcome = session.run(
        progress.as_mut().map(|p| p as &mut dyn FillProgress),
        &CancelToken::new(),
    )?;
    drop(progress);

    let filled = match outcome {
        RunOutcome::Filled(filled) => filled,
        RunOutcome::Canceled => {
            log::warn!("the fill was canceled, nothing was written");
            return Ok(());
        }
    };

    if let Some(ref dir) = args.debug_out_dir {
        filled.save_debug(dir)?;
    }

    if args.output_path.to_str() == Some("-") {
        let out = std::io::stdout();
        let mut out = out.lock();
        filled.write(&mut out, args.out_fmt)?;
    } else {
        filled.save(&args.output_path)?;
    }

    Ok(())
}
