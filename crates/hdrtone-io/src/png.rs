//! PNG output for tone-mapped rasters.
//!
//! Writes [`Rgba16Image`] as 16-bit RGBA with an sRGB chunk. Samples are
//! stored big-endian as the format requires.

use crate::{IoError, IoResult};
use hdrtone_core::Rgba16Image;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes a 16-bit RGBA PNG file.
///
/// # Example
///
/// ```rust,ignore
/// use hdrtone_io::png;
///
/// png::write_rgba16("output.png", &ldr)?;
/// ```
pub fn write_rgba16<P: AsRef<Path>>(path: P, image: &Rgba16Image) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_rgba16_to(&mut writer, image)?;
    writer.flush()?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "Wrote PNG");
    Ok(())
}

/// Writes a 16-bit RGBA PNG stream.
pub fn write_rgba16_to<W: Write>(writer: W, image: &Rgba16Image) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Sixteen);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&u16_to_bytes(image.data()))
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

/// Converts u16 samples to big-endian bytes.
fn u16_to_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_big_endian() {
        assert_eq!(u16_to_bytes(&[0x1234, 0xffff]), vec![0x12, 0x34, 0xff, 0xff]);
    }

    #[test]
    fn test_write_and_decode() {
        let (w, h) = (7u32, 5u32);
        let mut img = Rgba16Image::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, [(x * 9000) as u16, (y * 12000) as u16, 300, u16::MAX]);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_rgba16(&path, &img).unwrap();

        let decoder = png::Decoder::new(BufReader::new(File::open(&path).unwrap()));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0u8; reader.output_buffer_size().unwrap()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (w, h));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(info.bit_depth, png::BitDepth::Sixteen);

        let samples: Vec<u16> = buf[..info.buffer_size()]
            .chunks_exact(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, img.data());
    }
}
