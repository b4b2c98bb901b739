use clap::{Parser, Subcommand};
use qr_codec::{DecodeOptions, ECLevel, EncodeOptions, QrColor, Renderer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "Encode and decode QR codes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text into a PNG image
    Encode {
        #[arg(long)]
        text: String,
        #[arg(long)]
        out: PathBuf,
        /// Error correction level: L, M, Q or H
        #[arg(long, default_value = "M")]
        ec: ECLevel,
        /// Pixels per module
        #[arg(long, default_value_t = 8)]
        scale: u32,
        /// Render into a square of this many pixels instead of using --scale
        #[arg(long)]
        size: Option<u32>,
        /// black, blue, red, dark-green or #RRGGBB
        #[arg(long, default_value = "black")]
        color: String,
    },
    /// Decode the first QR code found in an image
    Decode {
        #[arg(long)]
        image: PathBuf,
    },
}

fn encode_cmd(
    text: &str,
    out: &Path,
    ec: ECLevel,
    scale: u32,
    size: Option<u32>,
    color: &str,
) -> Result<(), String> {
    let dark = QrColor::parse(color).ok_or_else(|| format!("unknown color '{color}'"))?;
    let symbol = qr_codec::encode_symbol(text, &EncodeOptions::new(ec)).map_err(|e| e.to_string())?;
    let renderer = Renderer {
        scale,
        ..Renderer::with_color(dark)
    };
    let image = match size {
        Some(side) => renderer.fit_rgb(&symbol.matrix, side),
        None => renderer.to_rgb(&symbol.matrix),
    };
    image
        .save(out)
        .map_err(|e| format!("failed to write {}: {e}", out.display()))?;
    println!(
        "Wrote {} ({}x{}): version={}, error_correction={:?}, mask={:?}",
        out.display(),
        image.width(),
        image.height(),
        symbol.version,
        symbol.ec_level,
        symbol.mask
    );
    Ok(())
}

fn decode_cmd(image: &Path) -> Result<(), String> {
    let img = image::open(image)
        .map_err(|e| format!("failed to load image {}: {e}", image.display()))?
        .to_luma8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let qr = qr_codec::decode_with(img.as_raw(), width, height, &DecodeOptions::from_env())
        .map_err(|e| e.to_string())?;
    println!("Image: {} ({}x{})", image.display(), width, height);
    println!(
        "version={}, error_correction={:?}, mask={:?}, mirrored={}",
        qr.version, qr.error_correction, qr.mask_pattern, qr.mirrored
    );
    println!("{}", qr.content);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Encode {
            text,
            out,
            ec,
            scale,
            size,
            color,
        } => encode_cmd(&text, &out, ec, scale, size, &color),
        Command::Decode { image } => decode_cmd(&image),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
