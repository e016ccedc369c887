use std::{
    fs::File,
    hint::black_box,
    io::BufWriter,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context;
use pf2::{Atlas, Pf2FontLoader};

#[cfg(feature = "window")]
use minifb::{Key, Window, WindowOptions};

const USAGE: &str = "usage: pf2 <font.pf2> [--png <out.png>] [--bench <iterations>]";

#[derive(Debug)]
struct Args {
    font: PathBuf,
    png: Option<PathBuf>,
    bench: Option<u32>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut font = None;
        let mut png = None;
        let mut bench = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--png" => {
                    png = Some(PathBuf::from(args.next().context(USAGE)?));
                }
                "--bench" => {
                    let iterations = args.next().context(USAGE)?;
                    bench = Some(
                        iterations
                            .parse()
                            .with_context(|| format!("invalid iteration count {:?}", iterations))?,
                    );
                }
                "-h" | "--help" => anyhow::bail!(USAGE),
                _ if font.is_none() => font = Some(PathBuf::from(arg)),
                _ => anyhow::bail!("unexpected argument {:?}\n{}", arg, USAGE),
            }
        }

        Ok(Self {
            font: font.context(USAGE)?,
            png,
            bench,
        })
    }
}

fn write_png(atlas: &Atlas, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    atlas.write_png(BufWriter::new(file))?;

    log::info!("Saved font atlas image to {}", path.display());

    Ok(())
}

/// Loads the font `iterations` times, each with a fresh loader
fn bench(name: &str, data: &[u8], iterations: u32) {
    let start = Instant::now();

    for _ in 0..iterations {
        let font = Pf2FontLoader::new(name, black_box(data)).load();
        black_box(font.atlas.pixels().len() * font.glyphs.len());
    }

    let elapsed = start.elapsed();
    println!(
        "Font loading time: {} us",
        elapsed.as_micros() / u128::from(iterations.max(1))
    );
}

#[cfg(feature = "window")]
fn preview(atlas: &Atlas) -> anyhow::Result<()> {
    if atlas.is_empty() {
        return Ok(());
    }

    let (width, height) = (atlas.width() as usize, atlas.height() as usize);
    let buffer = atlas.to_argb();

    let mut window = Window::new("PF2 atlas", width, height, WindowOptions::default())
        .map_err(|err| anyhow::anyhow!("{}", err))?;
    window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|err| anyhow::anyhow!("{}", err))?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse(std::env::args().skip(1))?;

    let data =
        std::fs::read(&args.font).with_context(|| format!("reading {}", args.font.display()))?;
    let name = args
        .font
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("font");

    let font = Pf2FontLoader::new(name, &data).load();

    println!(
        "{}: {} glyph(s), {}x{} atlas, point size {}, ascent {}, descent {}",
        name,
        font.glyphs.len(),
        font.atlas.width(),
        font.atlas.height(),
        font.metadata.point_size,
        font.metadata.ascent,
        font.metadata.descent
    );

    if let Some(path) = &args.png {
        write_png(&font.atlas, path)?;
    }

    if let Some(iterations) = args.bench {
        bench(name, &data, iterations);
    }

    #[cfg(feature = "window")]
    preview(&font.atlas)?;

    Ok(())
}
