//! Reading the captured stream.

use std::io::Read;

use anyhow::{bail, Context, Result};

/// Reads `path` (or stdin for `-`), decoding hex text when `hex` is set.
pub fn read_input(path: &str, hex: bool) -> Result<Vec<u8>> {
    let raw = if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read input file: {}", path))?
    };

    if !hex {
        return Ok(raw);
    }
    let text = String::from_utf8(raw).context("Hex input is not valid UTF-8")?;
    parse_hex(&text).with_context(|| format!("Failed to parse hex input: {}", path))
}

/// Parses hex digits, ignoring whitespace and `#` comments to end of line.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() / 2);
    let mut high: Option<u8> = None;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        for c in line.chars().filter(|c| !c.is_whitespace()) {
            let Some(nibble) = c.to_digit(16) else {
                bail!("invalid hex digit {:?} on line {}", c, line_no + 1);
            };
            let nibble = nibble as u8;
            match high.take() {
                Some(h) => out.push((h << 4) | nibble),
                None => high = Some(nibble),
            }
        }
    }

    if high.is_some() {
        bail!("odd number of hex digits");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_hex_ignores_layout() {
        let text = "# settings\n02 04 0102\n\n  0300 # DATA header\nabCD ef\n";
        assert_eq!(
            parse_hex(text).unwrap(),
            vec![0x02, 0x04, 0x01, 0x02, 0x03, 0x00, 0xab, 0xcd, 0xef]
        );
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        assert!(parse_hex("0g").unwrap_err().to_string().contains("line 1"));
        assert!(parse_hex("abc").is_err());
    }

    #[test]
    fn test_read_input_raw_and_hex() {
        let mut raw = tempfile::NamedTempFile::new().unwrap();
        raw.write_all(&[0x00, 0x00, 0xff]).unwrap();
        let raw_path = raw.path().to_str().unwrap();
        assert_eq!(read_input(raw_path, false).unwrap(), vec![0x00, 0x00, 0xff]);

        let mut hex = tempfile::NamedTempFile::new().unwrap();
        writeln!(hex, "0000 ff").unwrap();
        let hex_path = hex.path().to_str().unwrap();
        assert_eq!(read_input(hex_path, true).unwrap(), vec![0x00, 0x00, 0xff]);
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.bin");
        let err = read_input(path.to_str().unwrap(), false).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }
}
