use miniflate::decompress::bitreader::BitReader;

#[test]
fn test_getbits_lsb_first() {
    // 0xB4 = 0b10110100
    let data = [0xB4, 0xFF];
    let mut r = BitReader::new(&data);

    assert_eq!(r.getbits(3), 0b100);
    assert_eq!(r.getbits(5), 0b10110);
    assert_eq!(r.getbits(8), 0xFF);
    assert!(!r.overflowed());
}

#[test]
fn test_getbits_across_byte_boundary() {
    let data = [0x34, 0x12];
    let mut r = BitReader::new(&data);

    assert_eq!(r.getbits(16), 0x1234);
    assert!(!r.overflowed());
}

#[test]
fn test_getbits_base() {
    let data = [0b0000_0101];
    let mut r = BitReader::new(&data);

    // Zero extra bits must not touch the stream
    assert_eq!(r.getbits_base(0, 42), 42);
    assert_eq!(r.getbits_base(2, 10), 11);
    assert_eq!(r.getbits_base(2, 3), 4);
}

#[test]
fn test_overflow_is_sticky() {
    let data = [0xAB];
    let mut r = BitReader::new(&data);

    assert_eq!(r.getbits(8), 0xAB);
    assert!(!r.overflowed());

    // Past the end the reader serves zero bits and latches the flag
    assert_eq!(r.getbits(8), 0);
    assert!(r.overflowed());
    assert_eq!(r.getbits(4), 0);
    assert!(r.overflowed());
}

#[test]
fn test_realign_discards_partial_byte() {
    let data = [0xFF, 0x42, 0x99];
    let mut r = BitReader::new(&data);

    assert_eq!(r.getbits(3), 0b111);
    r.realign();

    assert_eq!(r.remaining(), &[0x42, 0x99]);
    r.advance(1);
    assert_eq!(r.getbits(8), 0x99);
    assert_eq!(r.bytes_read(), 3);
}

#[test]
fn test_bytes_read_tracks_source_cursor() {
    let data = [0x01, 0x02, 0x03];
    let mut r = BitReader::new(&data);

    assert_eq!(r.bytes_read(), 0);
    r.getbits(1);
    assert_eq!(r.bytes_read(), 1);
    r.getbits(8);
    assert_eq!(r.bytes_read(), 2);
}
