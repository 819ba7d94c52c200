use std::path::Path;
use thiserror::Error;

const NES_MAGIC_BYTES: &[u8; 4] = b"NES\x1A";
const HEADER_SIZE: usize = 16;

pub const PRG_ROM_BANK_SIZE: usize = 0x4000;
pub const CHR_ROM_BANK_SIZE: usize = 0x2000;

#[derive(Debug, Error)]
pub enum RomError {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("failed to read cartridge image: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed cartridge image: flat two-bank PRG/CHR layout, no mapper
/// hardware. Consumed at boot when the streams are copied into the CPU
/// and PPU address spaces.
pub struct Rom {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub prg_banks: u8,
    pub chr_banks: u8,
}

impl Rom {
    /// Parse a raw cartridge image: 16-byte header (magic, PRG bank count
    /// in 16KB units, CHR bank count in 8KB units) followed by the PRG
    /// stream and then the CHR stream.
    pub fn parse(raw: &[u8]) -> Result<Rom, RomError> {
        if raw.len() < HEADER_SIZE || &raw[0..4] != NES_MAGIC_BYTES {
            return Err(RomError::InvalidFormat("not an iNES image".into()));
        }

        let prg_banks = raw[4];
        let chr_banks = raw[5];

        let prg_rom_size = prg_banks as usize * PRG_ROM_BANK_SIZE;
        let chr_rom_size = chr_banks as usize * CHR_ROM_BANK_SIZE;

        let prg_rom_start = HEADER_SIZE;
        let chr_rom_start = prg_rom_start + prg_rom_size;

        if raw.len() < chr_rom_start + chr_rom_size {
            return Err(RomError::InvalidFormat(format!(
                "image truncated: header promises {} PRG + {} CHR bytes, got {}",
                prg_rom_size,
                chr_rom_size,
                raw.len() - HEADER_SIZE
            )));
        }

        log::info!(
            "cartridge: {} PRG bank(s), {} CHR bank(s)",
            prg_banks,
            chr_banks
        );

        Ok(Rom {
            prg_rom: raw[prg_rom_start..chr_rom_start].to_vec(),
            chr_rom: raw[chr_rom_start..(chr_rom_start + chr_rom_size)].to_vec(),
            prg_banks,
            chr_banks,
        })
    }

    /// Read and parse a cartridge image from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Rom, RomError> {
        let raw = std::fs::read(path)?;
        Rom::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_image(prg_banks: u8, chr_banks: u8) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(NES_MAGIC_BYTES);
        raw.extend_from_slice(&[prg_banks, chr_banks]);
        raw.resize(HEADER_SIZE, 0);
        raw.resize(
            HEADER_SIZE
                + prg_banks as usize * PRG_ROM_BANK_SIZE
                + chr_banks as usize * CHR_ROM_BANK_SIZE,
            0,
        );
        raw
    }

    #[test]
    fn parses_single_bank_image() {
        let mut raw = build_image(1, 1);
        raw[HEADER_SIZE] = 0xAA; // first PRG byte
        raw[HEADER_SIZE + PRG_ROM_BANK_SIZE] = 0xBB; // first CHR byte

        let rom = Rom::parse(&raw).unwrap();
        assert_eq!(rom.prg_banks, 1);
        assert_eq!(rom.chr_banks, 1);
        assert_eq!(rom.prg_rom.len(), PRG_ROM_BANK_SIZE);
        assert_eq!(rom.chr_rom.len(), CHR_ROM_BANK_SIZE);
        assert_eq!(rom.prg_rom[0], 0xAA);
        assert_eq!(rom.chr_rom[0], 0xBB);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut raw = build_image(1, 1);
        raw[0] = b'X';
        assert!(matches!(
            Rom::parse(&raw),
            Err(RomError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_truncated_image() {
        let mut raw = build_image(2, 1);
        raw.truncate(HEADER_SIZE + PRG_ROM_BANK_SIZE); // half the promised PRG
        assert!(matches!(
            Rom::parse(&raw),
            Err(RomError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_short_header() {
        assert!(matches!(
            Rom::parse(b"NES\x1a"),
            Err(RomError::InvalidFormat(_))
        ));
    }
}
