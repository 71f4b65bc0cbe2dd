use crate::decompress::{DecompressResult, Decompressor as InternalDecompressor};
use std::io::{self};

pub struct Decompressor {
    inner: InternalDecompressor,
    max_memory_limit: usize,
    limit_ratio: usize,
}

impl Decompressor {
    pub fn new() -> Self {
        Self {
            inner: InternalDecompressor::new(),
            max_memory_limit: usize::MAX,
            limit_ratio: 2000,
        }
    }

    pub fn set_max_memory_limit(&mut self, limit: usize) {
        self.max_memory_limit = limit;
    }

    pub fn set_limit_ratio(&mut self, ratio: usize) {
        self.limit_ratio = ratio;
    }

    pub fn decompress_deflate(&mut self, data: &[u8], expected_size: usize) -> io::Result<Vec<u8>> {
        self.decompress_helper(data, expected_size, |d, data, out| d.decompress(data, out))
    }

    pub fn decompress_deflate_into(&mut self, data: &[u8], output: &mut [u8]) -> io::Result<usize> {
        self.decompress_into_helper(data, output, |d, data, out| d.decompress(data, out))
    }

    pub fn decompress_zlib(&mut self, data: &[u8], expected_size: usize) -> io::Result<Vec<u8>> {
        self.decompress_helper(data, expected_size, |d, data, out| {
            d.decompress_zlib(data, out)
        })
    }

    pub fn decompress_zlib_into(&mut self, data: &[u8], output: &mut [u8]) -> io::Result<usize> {
        self.decompress_into_helper(data, output, |d, data, out| d.decompress_zlib(data, out))
    }

    pub fn decompress_gzip(&mut self, data: &[u8], expected_size: usize) -> io::Result<Vec<u8>> {
        self.decompress_helper(data, expected_size, |d, data, out| {
            d.decompress_gzip(data, out)
        })
    }

    pub fn decompress_gzip_into(&mut self, data: &[u8], output: &mut [u8]) -> io::Result<usize> {
        self.decompress_into_helper(data, output, |d, data, out| d.decompress_gzip(data, out))
    }

    fn decompress_helper<F>(
        &mut self,
        data: &[u8],
        expected_size: usize,
        f: F,
    ) -> io::Result<Vec<u8>>
    where
        F: FnOnce(
            &mut InternalDecompressor,
            &[u8],
            &mut [u8],
        ) -> (DecompressResult, usize, usize),
    {
        // Security check: prevent massive allocations for small inputs (Zip bomb prevention)
        // Max compression ratio for Deflate is ~1032:1. We use a generous limit of 2000:1 + overhead.
        // This prevents allocating GBs of memory for small inputs.
        let limit = data.len().saturating_mul(self.limit_ratio).saturating_add(4096);
        if expected_size > limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Expected size {} exceeds safety limit for input size {}",
                    expected_size,
                    data.len()
                ),
            ));
        }

        if expected_size > self.max_memory_limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Expected size {} exceeds maximum memory limit {}",
                    expected_size, self.max_memory_limit
                ),
            ));
        }

        let mut output = Vec::new();
        output
            .try_reserve_exact(expected_size)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        output.resize(expected_size, 0);

        let (res, _, size) = f(&mut self.inner, data, &mut output);
        match res {
            DecompressResult::Success => {
                output.truncate(size);
                Ok(output)
            }
            DecompressResult::InsufficientSpace => {
                Err(io::Error::new(io::ErrorKind::Other, "Insufficient space"))
            }
            DecompressResult::BadData => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Decompression failed",
            )),
        }
    }

    fn decompress_into_helper<F>(
        &mut self,
        data: &[u8],
        output: &mut [u8],
        f: F,
    ) -> io::Result<usize>
    where
        F: FnOnce(
            &mut InternalDecompressor,
            &[u8],
            &mut [u8],
        ) -> (DecompressResult, usize, usize),
    {
        if slices_overlap(data, output) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Input and output buffers overlap",
            ));
        }

        let (res, _, size) = f(&mut self.inner, data, output);
        match res {
            DecompressResult::Success => Ok(size),
            DecompressResult::InsufficientSpace => {
                Err(io::Error::new(io::ErrorKind::Other, "Insufficient space"))
            }
            DecompressResult::BadData => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Decompression failed",
            )),
        }
    }
}

fn slices_overlap(a: &[u8], b: &[u8]) -> bool {
    let a_start = a.as_ptr() as usize;
    let b_start = b.as_ptr() as usize;
    a_start < b_start + b.len() && b_start < a_start + a.len()
}
