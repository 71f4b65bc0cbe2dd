pub struct BitReader<'a> {
    source: &'a [u8],
    pos: usize,
    tag: u32,
    bitcount: u32,
    overflow: bool,
}

impl<'a> BitReader<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            pos: 0,
            tag: 0,
            bitcount: 0,
            overflow: false,
        }
    }

    // Top up the accumulator until at least num bits are buffered. Past
    // the end of the source, zero bytes are injected and the overflow
    // flag latches so the caller can detect the truncation afterwards.
    pub fn refill(&mut self, num: u32) {
        debug_assert!(num <= 32);

        while self.bitcount < num {
            if let Some(&byte) = self.source.get(self.pos) {
                self.tag |= (byte as u32) << self.bitcount;
                self.pos += 1;
            } else {
                self.overflow = true;
            }
            self.bitcount += 8;
        }

        debug_assert!(self.bitcount <= 32);
    }

    pub fn consume(&mut self, num: u32) -> u32 {
        debug_assert!(num <= self.bitcount);

        let bits = (self.tag as u64 & ((1u64 << num) - 1)) as u32;
        self.tag = (self.tag as u64 >> num) as u32;
        self.bitcount -= num;

        bits
    }

    pub fn getbits(&mut self, num: u32) -> u32 {
        self.refill(num);
        self.consume(num)
    }

    pub fn getbits_base(&mut self, num: u32, base: u32) -> u32 {
        if num == 0 {
            base
        } else {
            base + self.getbits(num)
        }
    }

    // Discard buffered bits so decoding continues at the next byte
    // boundary. Refill never buffers more than 7 bits beyond what a
    // getbits call consumes, so only padding from the current byte is
    // ever dropped here.
    pub fn realign(&mut self) {
        debug_assert!(self.bitcount < 8);
        self.tag = 0;
        self.bitcount = 0;
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.source[self.pos..]
    }

    pub fn advance(&mut self, num: usize) {
        debug_assert!(num <= self.source.len() - self.pos);
        self.pos += num;
    }

    pub fn bytes_read(&self) -> usize {
        self.pos
    }

    pub fn overflowed(&self) -> bool {
        self.overflow
    }
}
