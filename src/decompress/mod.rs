pub mod bitreader;
pub mod huffman;

use self::bitreader::BitReader;
use self::huffman::Huffman;
use crate::adler32::adler32;
use crate::common::*;
use crate::crc32::crc32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "Decompression result must be checked for errors"]
pub enum DecompressResult {
    Success,
    BadData,
    InsufficientSpace,
}

// Base values and extra bit counts for length codes 257..285
const LENGTH_BASE: [u32; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
const LENGTH_BITS: [u32; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

// Base values and extra bit counts for offset codes 0..29
const OFFSET_BASE: [u32; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
const OFFSET_BITS: [u32; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

// Order in which the precode's own code lengths are stored
const PRECODE_PERMUTATION: [usize; DEFLATE_NUM_PRECODE_SYMS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

pub struct Decompressor {
    litlen_tree: Huffman,
    offset_tree: Huffman,
    lens: [u8; DEFLATE_NUM_LITLEN_SYMS + DEFLATE_NUM_OFFSET_SYMS],
}

impl Decompressor {
    pub fn new() -> Self {
        Self {
            litlen_tree: Huffman::new(),
            offset_tree: Huffman::new(),
            lens: [0; DEFLATE_NUM_LITLEN_SYMS + DEFLATE_NUM_OFFSET_SYMS],
        }
    }

    pub fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> (DecompressResult, usize, usize) {
        let mut reader = BitReader::new(input);
        let mut out_idx = 0;

        loop {
            let is_final_block = reader.getbits(1) != 0;
            let block_type = reader.getbits(2) as u8;

            let res = match block_type {
                DEFLATE_BLOCKTYPE_UNCOMPRESSED => {
                    Self::decompress_uncompressed_block(&mut reader, output, &mut out_idx)
                }
                DEFLATE_BLOCKTYPE_STATIC_HUFFMAN => {
                    self.litlen_tree.set_fixed_litlen();
                    self.offset_tree.set_fixed_offset();
                    self.decompress_huffman_block(&mut reader, output, &mut out_idx)
                }
                DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN => {
                    let res = self.read_dynamic_huffman_header(&mut reader);
                    if res == DecompressResult::Success {
                        self.decompress_huffman_block(&mut reader, output, &mut out_idx)
                    } else {
                        res
                    }
                }
                _ => DecompressResult::BadData,
            };

            if res != DecompressResult::Success {
                return (res, reader.bytes_read(), 0);
            }

            if is_final_block {
                break;
            }
        }

        if reader.overflowed() {
            return (DecompressResult::BadData, reader.bytes_read(), 0);
        }

        (DecompressResult::Success, reader.bytes_read(), out_idx)
    }

    fn read_dynamic_huffman_header(&mut self, reader: &mut BitReader) -> DecompressResult {
        let num_litlen_syms = reader.getbits_base(5, 257) as usize;
        let num_offset_syms = reader.getbits_base(5, 1) as usize;
        let num_precode_syms = reader.getbits_base(4, 4) as usize;

        // HLIT 287-288 and HDIST 31-32 are encodable but name symbols no
        // conforming stream can produce; refuse them outright.
        if num_litlen_syms > 286 || num_offset_syms > 30 {
            return DecompressResult::BadData;
        }

        self.lens[..DEFLATE_NUM_PRECODE_SYMS].fill(0);
        for i in 0..num_precode_syms {
            self.lens[PRECODE_PERMUTATION[i]] = reader.getbits(3) as u8;
        }

        // The precode tree is only needed while the length arrays are
        // read, so it borrows the literal/length tree's storage.
        if self
            .litlen_tree
            .build(&self.lens[..DEFLATE_NUM_PRECODE_SYMS])
            .is_err()
        {
            return DecompressResult::BadData;
        }
        if self.litlen_tree.max_sym == -1 {
            return DecompressResult::BadData;
        }

        let total_syms = num_litlen_syms + num_offset_syms;
        let mut i = 0;
        while i < total_syms {
            let presym = self.litlen_tree.decode(reader);

            if presym as i32 > self.litlen_tree.max_sym {
                return DecompressResult::BadData;
            }

            let (len, rep_count) = match presym {
                16 => {
                    // Repeat the previous length 3-6 times
                    if i == 0 {
                        return DecompressResult::BadData;
                    }
                    (self.lens[i - 1], reader.getbits_base(2, 3) as usize)
                }
                // Repeat zero 3-10 times
                17 => (0, reader.getbits_base(3, 3) as usize),
                // Repeat zero 11-138 times
                18 => (0, reader.getbits_base(7, 11) as usize),
                _ => (presym as u8, 1),
            };

            if rep_count > total_syms - i {
                return DecompressResult::BadData;
            }

            self.lens[i..i + rep_count].fill(len);
            i += rep_count;
        }

        // A block whose end-of-block symbol cannot be coded has no way
        // to terminate
        if self.lens[DEFLATE_END_OF_BLOCK] == 0 {
            return DecompressResult::BadData;
        }

        if self
            .litlen_tree
            .build(&self.lens[..num_litlen_syms])
            .is_err()
        {
            return DecompressResult::BadData;
        }
        if self
            .offset_tree
            .build(&self.lens[num_litlen_syms..total_syms])
            .is_err()
        {
            return DecompressResult::BadData;
        }

        DecompressResult::Success
    }

    fn decompress_huffman_block(
        &self,
        reader: &mut BitReader,
        output: &mut [u8],
        out_idx: &mut usize,
    ) -> DecompressResult {
        loop {
            let sym = self.litlen_tree.decode(reader) as usize;

            // A truncated stream feeds the decoder zero bits forever;
            // the sticky flag catches it once per symbol.
            if reader.overflowed() {
                return DecompressResult::BadData;
            }

            if sym == DEFLATE_END_OF_BLOCK {
                return DecompressResult::Success;
            }

            if sym < DEFLATE_NUM_LITERALS {
                if *out_idx == output.len() {
                    return DecompressResult::InsufficientSpace;
                }
                output[*out_idx] = sym as u8;
                *out_idx += 1;
                continue;
            }

            if sym as i32 > self.litlen_tree.max_sym
                || sym - DEFLATE_FIRST_LEN_SYM > 28
                || self.offset_tree.max_sym == -1
            {
                return DecompressResult::BadData;
            }
            let len_sym = sym - DEFLATE_FIRST_LEN_SYM;
            let length =
                reader.getbits_base(LENGTH_BITS[len_sym], LENGTH_BASE[len_sym]) as usize;

            let offset_sym = self.offset_tree.decode(reader) as usize;
            if offset_sym as i32 > self.offset_tree.max_sym || offset_sym > 29 {
                return DecompressResult::BadData;
            }
            let offset =
                reader.getbits_base(OFFSET_BITS[offset_sym], OFFSET_BASE[offset_sym]) as usize;

            // A match may only reference bytes already produced
            if offset > *out_idx {
                return DecompressResult::BadData;
            }
            if output.len() - *out_idx < length {
                return DecompressResult::InsufficientSpace;
            }

            // Byte at a time, left to right: an overlapping match must
            // observe its own writes (offset < length is the run-length
            // case).
            for i in *out_idx..*out_idx + length {
                output[i] = output[i - offset];
            }
            *out_idx += length;
        }
    }

    fn decompress_uncompressed_block(
        reader: &mut BitReader,
        output: &mut [u8],
        out_idx: &mut usize,
    ) -> DecompressResult {
        reader.realign();

        let src = reader.remaining();
        if src.len() < 4 {
            return DecompressResult::BadData;
        }

        let len = u16::from_le_bytes([src[0], src[1]]) as usize;
        let nlen = u16::from_le_bytes([src[2], src[3]]) as usize;

        if len != (!nlen & 0xFFFF) {
            return DecompressResult::BadData;
        }

        if src.len() - 4 < len {
            return DecompressResult::BadData;
        }
        if output.len() - *out_idx < len {
            return DecompressResult::InsufficientSpace;
        }

        output[*out_idx..*out_idx + len].copy_from_slice(&src[4..4 + len]);
        *out_idx += len;
        reader.advance(4 + len);

        DecompressResult::Success
    }

    pub fn decompress_zlib(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> (DecompressResult, usize, usize) {
        if input.len() < ZLIB_MIN_OVERHEAD {
            return (DecompressResult::BadData, 0, 0);
        }

        let hdr = u16::from_be_bytes([input[0], input[1]]);
        if hdr % 31 != 0 {
            return (DecompressResult::BadData, 0, 0);
        }
        if ((hdr >> 8) & 0xF) as u8 != ZLIB_CM_DEFLATE {
            return (DecompressResult::BadData, 0, 0);
        }
        if ((hdr >> 12) & 0xF) as u8 > ZLIB_CINFO_32K_WINDOW {
            return (DecompressResult::BadData, 0, 0);
        }
        // Preset dictionaries are not supported
        if input[1] & ZLIB_FDICT != 0 {
            return (DecompressResult::BadData, 0, 0);
        }

        let payload = &input[ZLIB_MIN_HEADER_SIZE..input.len() - ZLIB_FOOTER_SIZE];
        let (res, in_consumed, out_produced) = self.decompress(payload, output);
        if res != DecompressResult::Success {
            return (res, ZLIB_MIN_HEADER_SIZE + in_consumed, 0);
        }

        let trailer = &input[input.len() - ZLIB_FOOTER_SIZE..];
        let expected_adler = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        if adler32(1, &output[..out_produced]) != expected_adler {
            return (DecompressResult::BadData, input.len(), 0);
        }

        (DecompressResult::Success, input.len(), out_produced)
    }

    pub fn decompress_gzip(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> (DecompressResult, usize, usize) {
        if input.len() < GZIP_MIN_OVERHEAD {
            return (DecompressResult::BadData, 0, 0);
        }

        if input[0] != GZIP_ID1 || input[1] != GZIP_ID2 || input[2] != GZIP_CM_DEFLATE {
            return (DecompressResult::BadData, 0, 0);
        }

        let flg = input[3];
        if flg & GZIP_FRESERVED != 0 {
            return (DecompressResult::BadData, 0, 0);
        }

        let payload_end = input.len() - GZIP_FOOTER_SIZE;
        let mut in_idx = GZIP_MIN_HEADER_SIZE;

        if flg & GZIP_FEXTRA != 0 {
            if payload_end - in_idx < 2 {
                return (DecompressResult::BadData, in_idx, 0);
            }
            let xlen = u16::from_le_bytes([input[in_idx], input[in_idx + 1]]) as usize;
            in_idx += 2;
            if payload_end - in_idx < xlen {
                return (DecompressResult::BadData, in_idx, 0);
            }
            in_idx += xlen;
        }

        if flg & GZIP_FNAME != 0 {
            in_idx = match skip_zero_terminated(input, in_idx, payload_end) {
                Some(next) => next,
                None => return (DecompressResult::BadData, in_idx, 0),
            };
        }

        if flg & GZIP_FCOMMENT != 0 {
            in_idx = match skip_zero_terminated(input, in_idx, payload_end) {
                Some(next) => next,
                None => return (DecompressResult::BadData, in_idx, 0),
            };
        }

        if flg & GZIP_FHCRC != 0 {
            if payload_end - in_idx < 2 {
                return (DecompressResult::BadData, in_idx, 0);
            }
            let expected = u16::from_le_bytes([input[in_idx], input[in_idx + 1]]);
            if crc32(0, &input[..in_idx]) & 0xFFFF != u32::from(expected) {
                return (DecompressResult::BadData, in_idx, 0);
            }
            in_idx += 2;
        }

        let (res, in_consumed, out_produced) =
            self.decompress(&input[in_idx..payload_end], output);
        if res != DecompressResult::Success {
            return (res, in_idx + in_consumed, 0);
        }

        let trailer = &input[payload_end..];
        let expected_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        if crc32(0, &output[..out_produced]) != expected_crc {
            return (DecompressResult::BadData, input.len(), 0);
        }

        // ISIZE is the decompressed length mod 2^32
        let expected_isize =
            u32::from_le_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);
        if out_produced as u32 != expected_isize {
            return (DecompressResult::BadData, input.len(), 0);
        }

        (DecompressResult::Success, input.len(), out_produced)
    }
}

fn skip_zero_terminated(input: &[u8], start: usize, end: usize) -> Option<usize> {
    input[start..end]
        .iter()
        .position(|&b| b == 0)
        .map(|n| start + n + 1)
}
