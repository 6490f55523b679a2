//! Radiance HDR (RGBE / XYZE) format support.
//!
//! Reads flat and RLE scanlines, writes RLE when the width allows it.
//! `FORMAT=32-bit_rle_xyze` files decode to [`Color::Xyz`] pixels, anything
//! else to linear [`Color::Rgb`].
//!
//! Pixel values are returned as stored. An `EXPOSURE` header is kept in
//! [`HdrHeader::exposure`]; dividing by it recovers the original radiance.

use crate::{IoError, IoResult};
use hdrtone_core::{Color, Image};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

const HDR_MAGIC: &str = "#?";

/// Widths eligible for new-style RLE scanlines.
const RLE_WIDTHS: std::ops::RangeInclusive<usize> = 8..=0x7fff;

/// Pixel encoding named by the `FORMAT` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// `32-bit_rle_rgbe`: linear RGB mantissas.
    #[default]
    Rgbe,
    /// `32-bit_rle_xyze`: CIE XYZ mantissas.
    Xyze,
}

impl Encoding {
    /// Value written to the `FORMAT` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rgbe => "32-bit_rle_rgbe",
            Self::Xyze => "32-bit_rle_xyze",
        }
    }

    fn parse(value: &str) -> IoResult<Self> {
        let lower = value.to_ascii_lowercase();
        if lower.contains("xyze") {
            Ok(Self::Xyze)
        } else if lower.contains("rgbe") {
            Ok(Self::Rgbe)
        } else {
            Err(IoError::UnsupportedFormat(format!("HDR pixel format {value}")))
        }
    }

    fn color(&self, v: [f64; 3]) -> Color {
        match self {
            Self::Rgbe => Color::rgb(v[0], v[1], v[2]),
            Self::Xyze => Color::from_xyz(v),
        }
    }
}

/// Parsed HDR header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HdrHeader {
    /// Pixel encoding.
    pub encoding: Encoding,
    /// Product of all `EXPOSURE` lines, if any.
    pub exposure: Option<f64>,
    /// `SOFTWARE` line, if any.
    pub software: Option<String>,
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
}

/// A decoded HDR file.
#[derive(Debug, Clone)]
pub struct HdrFile {
    /// Header fields.
    pub header: HdrHeader,
    /// Pixels, top row first.
    pub image: Image,
}

/// Reads an HDR file.
///
/// # Errors
///
/// [`IoError::Io`] for unreadable or truncated files,
/// [`IoError::InvalidFile`] for malformed headers or scanlines.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<HdrFile> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let hdr = read_from(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        width = hdr.header.width,
        height = hdr.header.height,
        encoding = hdr.header.encoding.as_str(),
        exposure = ?hdr.header.exposure,
        "Read HDR"
    );
    Ok(hdr)
}

/// Reads an HDR stream.
pub fn read_from<R: BufRead>(mut reader: R) -> IoResult<HdrFile> {
    let (header, orientation) = read_header(&mut reader)?;
    let width = header.width as usize;
    let height = header.height as usize;
    let rgbe = read_pixels(&mut reader, width, height)?;

    let mut data: Vec<Color> = rgbe
        .chunks_exact(4)
        .map(|p| header.encoding.color(rgbe_to_f64(p[0], p[1], p[2], p[3])))
        .collect();
    orientation.to_top_down(&mut data, width);

    let image = Image::from_data(header.width, header.height, data)?;
    Ok(HdrFile { header, image })
}

/// Writes `image` as an HDR file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image, encoding: Encoding) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, image, encoding)?;
    writer.flush()?;
    Ok(())
}

/// Writes `image` to an HDR stream, top row first.
pub fn write_to<W: Write>(writer: &mut W, image: &Image, encoding: Encoding) -> IoResult<()> {
    writeln!(writer, "{}RADIANCE", HDR_MAGIC)?;
    writeln!(writer, "FORMAT={}", encoding.as_str())?;
    writeln!(writer)?;
    writeln!(writer, "-Y {} +X {}", image.height(), image.width())?;

    let width = image.width() as usize;
    let use_rle = RLE_WIDTHS.contains(&width);
    let mut scanline = vec![0u8; width * 4];
    for y in 0..image.height() {
        for (px, c) in scanline.chunks_exact_mut(4).zip(image.row(y)) {
            let v = match encoding {
                Encoding::Rgbe => c.to_rgb(),
                Encoding::Xyze => c.to_xyz(),
            };
            px.copy_from_slice(&f64_to_rgbe(v));
        }

        if use_rle {
            writer.write_all(&[2, 2, (width >> 8) as u8, (width & 0xff) as u8])?;
            encode_rle_scanline(writer, width, &scanline)?;
        } else {
            writer.write_all(&scanline)?;
        }
    }
    Ok(())
}

/// Scanline order given by the resolution line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Orientation {
    bottom_up: bool,
    right_to_left: bool,
}

impl Orientation {
    fn to_top_down(self, data: &mut [Color], width: usize) {
        if self.right_to_left {
            for row in data.chunks_exact_mut(width) {
                row.reverse();
            }
        }
        if self.bottom_up {
            let height = data.len() / width;
            for y in 0..height / 2 {
                let (top, bottom) = data.split_at_mut((height - 1 - y) * width);
                top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
            }
        }
    }
}

fn read_header<R: BufRead>(reader: &mut R) -> IoResult<(HdrHeader, Orientation)> {
    let mut header = HdrHeader::default();
    let mut line = String::new();

    reader.read_line(&mut line)?;
    if !trim_line(&line).starts_with(HDR_MAGIC) {
        return Err(IoError::InvalidFile("HDR magic not found".into()));
    }

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(IoError::InvalidFile("Missing HDR resolution line".into()));
        }
        let line = trim_line(&line);

        if line.starts_with('+') || line.starts_with('-') {
            let (w, h, orientation) = parse_resolution(line)
                .ok_or_else(|| IoError::InvalidFile(format!("Invalid HDR resolution line: {line}")))?;
            header.width = w;
            header.height = h;
            return Ok((header, orientation));
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            match key.trim().to_ascii_uppercase().as_str() {
                "FORMAT" => header.encoding = Encoding::parse(value)?,
                // Multiple EXPOSURE lines accumulate.
                "EXPOSURE" => {
                    if let Ok(v) = value.parse::<f64>() {
                        header.exposure = Some(header.exposure.unwrap_or(1.0) * v);
                    }
                }
                "SOFTWARE" => header.software = Some(value.to_string()),
                _ => {}
            }
        }
    }
}

/// Parses `-Y h +X w` and its flipped variants.
fn parse_resolution(line: &str) -> Option<(u32, u32, Orientation)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [y_axis, h, x_axis, w] = parts.as_slice() else {
        return None;
    };
    let bottom_up = match *y_axis {
        "-Y" => false,
        "+Y" => true,
        _ => return None,
    };
    let right_to_left = match *x_axis {
        "+X" => false,
        "-X" => true,
        _ => return None,
    };
    let width: u32 = w.parse().ok()?;
    let height: u32 = h.parse().ok()?;
    (width > 0 && height > 0).then_some((
        width,
        height,
        Orientation {
            bottom_up,
            right_to_left,
        },
    ))
}

fn read_pixels<R: Read>(reader: &mut R, width: usize, height: usize) -> IoResult<Vec<u8>> {
    let len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| IoError::InvalidFile(format!("HDR size {width}x{height} overflows")))?;
    let mut rgbe = Vec::new();
    rgbe.try_reserve_exact(len)
        .map_err(|e| IoError::InvalidFile(format!("HDR size {width}x{height}: {e}")))?;

    let mut first = [0u8; 4];
    reader.read_exact(&mut first)?;

    let use_rle = RLE_WIDTHS.contains(&width)
        && first[0] == 2
        && first[1] == 2
        && (((first[2] as usize) << 8) | first[3] as usize) == width;

    if use_rle {
        let mut header = first;
        let mut scanline = vec![0u8; width * 4];
        for y in 0..height {
            if y > 0 {
                reader.read_exact(&mut header)?;
            }
            decode_rle_scanline(reader, width, &mut scanline, header)?;
            rgbe.extend_from_slice(&scanline);
        }
    } else {
        rgbe.extend_from_slice(&first);
        reader.take((len - 4) as u64).read_to_end(&mut rgbe)?;
        if rgbe.len() != len {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }
    }
    Ok(rgbe)
}

fn decode_rle_scanline<R: Read>(
    reader: &mut R,
    width: usize,
    out: &mut [u8],
    header: [u8; 4],
) -> IoResult<()> {
    if header[0] != 2 || header[1] != 2 {
        return Err(IoError::InvalidFile("HDR RLE header invalid".into()));
    }
    if (((header[2] as usize) << 8) | header[3] as usize) != width {
        return Err(IoError::InvalidFile("HDR RLE width mismatch".into()));
    }

    let mut channel = vec![0u8; width];
    for c in 0..4 {
        let mut idx = 0usize;
        while idx < width {
            let mut count = [0u8; 1];
            reader.read_exact(&mut count)?;
            let (run, repeat) = match count[0] as usize {
                n if n > 128 => (n - 128, true),
                n => (n, false),
            };
            if run == 0 || run > width - idx {
                return Err(IoError::InvalidFile("HDR RLE run out of range".into()));
            }
            if repeat {
                let mut value = [0u8; 1];
                reader.read_exact(&mut value)?;
                channel[idx..idx + run].fill(value[0]);
            } else {
                reader.read_exact(&mut channel[idx..idx + run])?;
            }
            idx += run;
        }

        for (px, &v) in out.chunks_exact_mut(4).zip(&channel) {
            px[c] = v;
        }
    }
    Ok(())
}

fn encode_rle_scanline<W: Write>(writer: &mut W, width: usize, scanline: &[u8]) -> IoResult<()> {
    let mut channel = vec![0u8; width];
    for c in 0..4 {
        for (dst, px) in channel.iter_mut().zip(scanline.chunks_exact(4)) {
            *dst = px[c];
        }
        writer.write_all(&encode_rle_channel(&channel))?;
    }
    Ok(())
}

fn encode_rle_channel(data: &[u8]) -> Vec<u8> {
    let run_at = |i: usize| {
        let mut run = 1usize;
        while i + run < data.len() && run < 127 && data[i] == data[i + run] {
            run += 1;
        }
        run
    };

    let mut out = Vec::with_capacity(data.len() * 2);
    let mut i = 0usize;
    while i < data.len() {
        let run = run_at(i);
        if run >= 4 {
            out.push((128 + run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        while i < data.len() && i - start < 128 && run_at(i) < 4 {
            i += 1;
        }
        out.push((i - start) as u8);
        out.extend_from_slice(&data[start..i]);
    }
    out
}

/// Shared-exponent encoding of three non-negative values.
pub fn f64_to_rgbe(v: [f64; 3]) -> [u8; 4] {
    let [r, g, b] = v.map(|c| if c.is_finite() { c.max(0.0) } else { 0.0 });
    let max = r.max(g).max(b);
    if max < 1.0e-32 {
        return [0, 0, 0, 0];
    }

    let (m, e) = frexp(max);
    let scale = m * 256.0 / max;
    [
        (r * scale).clamp(0.0, 255.0) as u8,
        (g * scale).clamp(0.0, 255.0) as u8,
        (b * scale).clamp(0.0, 255.0) as u8,
        (e + 128).clamp(0, 255) as u8,
    ]
}

/// Decodes one RGBE/XYZE pixel.
pub fn rgbe_to_f64(r: u8, g: u8, b: u8, e: u8) -> [f64; 3] {
    if e == 0 {
        return [0.0; 3];
    }
    let f = 2.0_f64.powi(e as i32 - 136);
    [r as f64 * f, g as f64 * f, b as f64 * f]
}

fn frexp(x: f64) -> (f64, i32) {
    let e = x.abs().log2().floor() as i32 + 1;
    (x / 2.0_f64.powi(e), e)
}

fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
