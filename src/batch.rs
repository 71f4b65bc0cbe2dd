use crate::decompress::{DecompressResult, Decompressor};
use rayon::prelude::*;

pub struct BatchDecompressor;

impl BatchDecompressor {
    pub fn new() -> Self {
        Self
    }

    pub fn decompress_batch(
        &self,
        inputs: &[&[u8]],
        max_out_sizes: &[usize],
    ) -> Vec<Option<Vec<u8>>> {
        inputs
            .par_iter()
            .zip(max_out_sizes.par_iter())
            .map_init(Decompressor::new, |decompressor, (&input, &max_size)| {
                let mut output = vec![0u8; max_size];
                let (res, _, size) = decompressor.decompress(input, &mut output);
                if res == DecompressResult::Success {
                    output.truncate(size);
                    Some(output)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn decompress_gzip_batch(
        &self,
        inputs: &[&[u8]],
        max_out_sizes: &[usize],
    ) -> Vec<Option<Vec<u8>>> {
        inputs
            .par_iter()
            .zip(max_out_sizes.par_iter())
            .map_init(Decompressor::new, |decompressor, (&input, &max_size)| {
                let mut output = vec![0u8; max_size];
                let (res, _, size) = decompressor.decompress_gzip(input, &mut output);
                if res == DecompressResult::Success {
                    output.truncate(size);
                    Some(output)
                } else {
                    None
                }
            })
            .collect()
    }
}
