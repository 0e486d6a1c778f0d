use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mailslice::debug_ui;
use mailslice::desc::{SliceDesc, load_slice_desc};
use mailslice::error::Result;
use mailslice::logging;
use mailslice::session::{EditSession, Overrides};
use mailslice::slicer::{SourceImage, slice_raster, write_slices};

/// Slice a tall email design into stacked PNG bands.
#[derive(Debug, Parser)]
#[command(name = "mailslice", version)]
struct Args {
    /// Design image (PNG)
    #[arg(required = true)]
    image: PathBuf,

    /// Job description JSON (cut lines, footer, blocks, per-slice alt text and links)
    #[arg(long)]
    desc: Option<PathBuf>,

    /// Cut line in percent of image height; repeatable. Replaces the description's cuts.
    #[arg(long = "cut", value_name = "PCT")]
    cuts: Vec<f64>,

    /// Footer cutoff in percent of image height; everything below is dropped
    #[arg(long, value_name = "PCT")]
    footer: Option<f64>,

    /// Output directory
    #[arg(long, short, default_value = "slices")]
    out: PathBuf,

    /// Keep base64 data URLs in the manifest instead of file names
    #[arg(long)]
    inline: bool,

    /// Open the preview window before writing
    #[arg(long)]
    show: bool,
}

fn run(args: Args) -> Result<()> {
    let desc = match &args.desc {
        Some(path) => load_slice_desc(path)?,
        None => SliceDesc::default(),
    };

    let source = SourceImage::open(&args.image)?;
    tracing::info!(
        path = %args.image.display(),
        w = source.natural_w(),
        h = source.natural_h(),
        "loaded design"
    );

    let mut session = EditSession::from_desc(source, &desc)?;
    session.apply_overrides(&Overrides {
        footer_pct: args.footer,
        cut_pcts: args.cuts.clone(),
    })?;

    if args.show {
        debug_ui::init("mailslice preview");
        let src = session.source().im();
        let regions = session.regions();
        debug_ui::add_slice_preview("design", src, session.cut_lines(), &desc.blocks, desc.analyzed);
        for (i, band) in slice_raster(src, &regions).iter().enumerate() {
            debug_ui::add_rgba(&format!("initial slice {i}"), band);
        }
        match debug_ui::show() {
            Ok(Some(edited)) => {
                tracing::info!(cuts = edited.len(), footer_pct = edited.footer_pct(), "using geometry edited in preview");
                session.set_cut_lines(edited);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "preview window failed"),
        }
    }

    let mut slices = session.process_with_meta(&desc)?;
    let manifest = write_slices(&mut slices, &args.out, args.inline)?;
    println!("{} slices -> {}", slices.len(), manifest.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init() {
        eprintln!("{e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "slicing failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
