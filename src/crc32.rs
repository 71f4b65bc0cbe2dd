use crate::crc32_tables::{CRC32_SLICE1_TABLE, CRC32_SLICE8_TABLE};

pub fn crc32_slice1(mut crc: u32, p: &[u8]) -> u32 {
    for &b in p {
        crc = (crc >> 8) ^ CRC32_SLICE1_TABLE[(crc as u8 ^ b) as usize];
    }
    crc
}

#[inline]
pub fn crc32_slice8(mut crc: u32, p: &[u8]) -> u32 {
    let mut chunks = p.chunks_exact(8);
    for chunk in &mut chunks {
        let v = u64::from_le_bytes(chunk.try_into().unwrap());
        let v1 = (v as u32) ^ crc;
        let v2 = (v >> 32) as u32;

        crc = CRC32_SLICE8_TABLE[0x700 + (v1 as u8) as usize]
            ^ CRC32_SLICE8_TABLE[0x600 + ((v1 >> 8) as u8) as usize]
            ^ CRC32_SLICE8_TABLE[0x500 + ((v1 >> 16) as u8) as usize]
            ^ CRC32_SLICE8_TABLE[0x400 + ((v1 >> 24) as u8) as usize]
            ^ CRC32_SLICE8_TABLE[0x300 + (v2 as u8) as usize]
            ^ CRC32_SLICE8_TABLE[0x200 + ((v2 >> 8) as u8) as usize]
            ^ CRC32_SLICE8_TABLE[0x100 + ((v2 >> 16) as u8) as usize]
            ^ CRC32_SLICE8_TABLE[((v2 >> 24) as u8) as usize];
    }

    crc32_slice1(crc, chunks.remainder())
}

#[inline]
pub fn crc32(crc: u32, slice: &[u8]) -> u32 {
    !crc32_slice8(!crc, slice)
}
