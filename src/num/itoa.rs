//! Decimal formatting for the 32-bit integer variant.

/// Room for a sign and ten digits.
pub const I32_BUFFER_LEN: usize = 11;

pub(crate) static DIGIT_PAIRS: &[u8; 200] = b"00010203040506070809101112131415161718192021222324252627282930313233343536373839404142434445464748495051525354555657585960616263646566676869707172737475767778798081828384858687888990919293949596979899";

/// Write `value` in decimal into `buf`, two digits per lookup, and return
/// the byte length used.
pub fn i32toa(value: i32, buf: &mut [u8; I32_BUFFER_LEN]) -> usize {
    let mut n = 0;
    let mut u = value as u32;
    if value < 0 {
        buf[0] = b'-';
        n = 1;
        u = u.wrapping_neg();
    }
    n + u32toa(u, &mut buf[n..])
}

fn u32toa(u: u32, buf: &mut [u8]) -> usize {
    let lut = DIGIT_PAIRS;
    let mut n = 0;
    if u < 10_000 {
        let d1 = ((u / 100) << 1) as usize;
        let d2 = ((u % 100) << 1) as usize;
        if u >= 1000 {
            buf[n] = lut[d1];
            n += 1;
        }
        if u >= 100 {
            buf[n] = lut[d1 + 1];
            n += 1;
        }
        if u >= 10 {
            buf[n] = lut[d2];
            n += 1;
        }
        buf[n] = lut[d2 + 1];
        n + 1
    } else if u < 100_000_000 {
        // u = bbbbcccc
        let b = u / 10_000;
        let c = u % 10_000;
        let d1 = ((b / 100) << 1) as usize;
        let d2 = ((b % 100) << 1) as usize;
        let d3 = ((c / 100) << 1) as usize;
        let d4 = ((c % 100) << 1) as usize;
        if u >= 10_000_000 {
            buf[n] = lut[d1];
            n += 1;
        }
        if u >= 1_000_000 {
            buf[n] = lut[d1 + 1];
            n += 1;
        }
        if u >= 100_000 {
            buf[n] = lut[d2];
            n += 1;
        }
        for byte in [lut[d2 + 1], lut[d3], lut[d3 + 1], lut[d4], lut[d4 + 1]] {
            buf[n] = byte;
            n += 1;
        }
        n
    } else {
        // u = aabbbbcccc
        let a = u / 100_000_000; // 1 to 42
        let u = u % 100_000_000;
        if a >= 10 {
            let i = (a << 1) as usize;
            buf[n] = lut[i];
            buf[n + 1] = lut[i + 1];
            n += 2;
        } else {
            buf[n] = b'0' + a as u8;
            n += 1;
        }
        let b = u / 10_000;
        let c = u % 10_000;
        let d1 = ((b / 100) << 1) as usize;
        let d2 = ((b % 100) << 1) as usize;
        let d3 = ((c / 100) << 1) as usize;
        let d4 = ((c % 100) << 1) as usize;
        for byte in [
            lut[d1],
            lut[d1 + 1],
            lut[d2],
            lut[d2 + 1],
            lut[d3],
            lut[d3 + 1],
            lut[d4],
            lut[d4 + 1],
        ] {
            buf[n] = byte;
            n += 1;
        }
        n
    }
}
