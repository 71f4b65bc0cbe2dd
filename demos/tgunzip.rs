use miniflate::common::MINIFLATE_VERSION_STRING;
use miniflate::Decompressor;
use std::env;
use std::fs;
use std::process::ExitCode;

fn read_le32(p: &[u8]) -> u32 {
    u32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

fn main() -> ExitCode {
    println!("tgunzip {} - gzip decompressor example\n", MINIFLATE_VERSION_STRING);

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!(
            "usage: tgunzip INFILE OUTFILE\n\n\
             Both input and output are kept in memory, so do not use this on huge files."
        );
        return ExitCode::FAILURE;
    }

    let source = match fs::read(&args[1]) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("tgunzip: unable to read input file '{}': {}", args[1], e);
            return ExitCode::FAILURE;
        }
    };

    if source.len() < 18 {
        eprintln!("tgunzip: input too small to be gzip");
        return ExitCode::FAILURE;
    }

    // The trailing ISIZE field sizes the output buffer
    let dlen = read_le32(&source[source.len() - 4..]) as usize;

    let mut decompressor = Decompressor::new();
    let dest = match decompressor.decompress_gzip(&source, dlen) {
        Ok(dest) => dest,
        Err(e) => {
            eprintln!("tgunzip: decompression failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("decompressed {} bytes", dest.len());

    if let Err(e) = fs::write(&args[2], &dest) {
        eprintln!("tgunzip: unable to write output file '{}': {}", args[2], e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
