//! Shortest round-trip decimal formatting for doubles, after Loitsch's
//! Grisu2: the value and its neighbour midpoints are scaled by a cached
//! power of ten into a narrow binary exponent window, digits are cut from
//! the integer and fractional halves, and the last digit is nudged toward
//! the scaled value while the result stays inside the rounding interval.

use crate::num::itoa::DIGIT_PAIRS;

/// Room for a sign, seventeen digits and an exponent suffix.
pub const F64_BUFFER_LEN: usize = 25;

const SIGNIFICAND_BITS: u32 = 52;
const EXPONENT_BIAS: i32 = 0x3FF + SIGNIFICAND_BITS as i32;
const MIN_EXPONENT: i32 = -EXPONENT_BIAS;
const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
const SIGNIFICAND_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;
const HIDDEN_BIT: u64 = 0x0010_0000_0000_0000;

#[derive(Clone, Copy)]
struct DiyFp {
    f: u64,
    e: i32,
}

impl DiyFp {
    fn from_f64(d: f64) -> Self {
        let bits = d.to_bits();
        let biased_e = ((bits & EXPONENT_MASK) >> SIGNIFICAND_BITS) as i32;
        let significand = bits & SIGNIFICAND_MASK;
        if biased_e != 0 {
            DiyFp {
                f: significand + HIDDEN_BIT,
                e: biased_e - EXPONENT_BIAS,
            }
        } else {
            DiyFp {
                f: significand,
                e: MIN_EXPONENT + 1,
            }
        }
    }

    fn sub(self, rhs: DiyFp) -> DiyFp {
        debug_assert!(self.e == rhs.e && self.f >= rhs.f);
        DiyFp {
            f: self.f - rhs.f,
            e: self.e,
        }
    }

    /// Truncating 64x64 multiply, rounded at bit 63 of the low half.
    fn mul(self, rhs: DiyFp) -> DiyFp {
        let p = self.f as u128 * rhs.f as u128;
        let mut h = (p >> 64) as u64;
        if p as u64 & (1 << 63) != 0 {
            h += 1;
        }
        DiyFp {
            f: h,
            e: self.e + rhs.e + 64,
        }
    }

    fn normalize(self) -> DiyFp {
        let s = self.f.leading_zeros() as i32;
        DiyFp {
            f: self.f << s,
            e: self.e - s,
        }
    }

    /// Midpoints toward the neighbouring doubles, both at the plus
    /// boundary's exponent. The minus gap is wider at a power of two.
    fn normalized_boundaries(self) -> (DiyFp, DiyFp) {
        let plus = DiyFp {
            f: (self.f << 1) + 1,
            e: self.e - 1,
        }
        .normalize();
        let mut minus = if self.f == HIDDEN_BIT {
            DiyFp {
                f: (self.f << 2) - 1,
                e: self.e - 2,
            }
        } else {
            DiyFp {
                f: (self.f << 1) - 1,
                e: self.e - 1,
            }
        };
        minus.f <<= minus.e - plus.e;
        minus.e = plus.e;
        (minus, plus)
    }
}

// 10^-348, 10^-340, ..., 10^340, significands and binary exponents.
#[rustfmt::skip]
static CACHED_POWERS_F: [u64; 87] = [
    0xfa8f_d5a0_081c_0288, 0xbaae_e17f_a23e_bf76, 0x8b16_fb20_3055_ac76, 0xcf42_894a_5dce_35ea,
    0x9a6b_b0aa_5565_3b2d, 0xe61a_cf03_3d1a_45df, 0xab70_fe17_c79a_c6ca, 0xff77_b1fc_bebc_dc4f,
    0xbe56_91ef_416b_d60c, 0x8dd0_1fad_907f_fc3c, 0xd351_5c28_3155_9a83, 0x9d71_ac8f_ada6_c9b5,
    0xea9c_2277_23ee_8bcb, 0xaecc_4991_4078_536d, 0x823c_1279_5db6_ce57, 0xc210_9436_4dfb_5637,
    0x9096_ea6f_3848_984f, 0xd774_85cb_2582_3ac7, 0xa086_cfcd_97bf_97f4, 0xef34_0a98_172a_ace5,
    0xb238_67fb_2a35_b28e, 0x84c8_d4df_d2c6_3f3b, 0xc5dd_4427_1ad3_cdba, 0x936b_9fce_bb25_c996,
    0xdbac_6c24_7d62_a584, 0xa3ab_6658_0d5f_daf6, 0xf3e2_f893_dec3_f126, 0xb5b5_ada8_aaff_80b8,
    0x8762_5f05_6c7c_4a8b, 0xc9bc_ff60_34c1_3053, 0x964e_858c_91ba_2655, 0xdff9_7724_7029_7ebd,
    0xa6df_bd9f_b8e5_b88f, 0xf8a9_5fcf_8874_7d94, 0xb944_7093_8fa8_9bcf, 0x8a08_f0f8_bf0f_156b,
    0xcdb0_2555_6531_31b6, 0x993f_e2c6_d07b_7fac, 0xe45c_10c4_2a2b_3b06, 0xaa24_2499_6973_92d3,
    0xfd87_b5f2_8300_ca0e, 0xbce5_0864_9211_1aeb, 0x8cbc_cc09_6f50_88cc, 0xd1b7_1758_e219_652c,
    0x9c40_0000_0000_0000, 0xe8d4_a510_0000_0000, 0xad78_ebc5_ac62_0000, 0x813f_3978_f894_0984,
    0xc097_ce7b_c907_15b3, 0x8f7e_32ce_7bea_5c70, 0xd5d2_38a4_abe9_8068, 0x9f4f_2726_179a_2245,
    0xed63_a231_d4c4_fb27, 0xb0de_6538_8cc8_ada8, 0x83c7_088e_1aab_65db, 0xc45d_1df9_4271_1d9a,
    0x924d_692c_a61b_e758, 0xda01_ee64_1a70_8dea, 0xa26d_a399_9aef_774a, 0xf209_787b_b47d_6b85,
    0xb454_e4a1_79dd_1877, 0x865b_8692_5b9b_c5c2, 0xc835_53c5_c896_5d3d, 0x952a_b45c_fa97_a0b3,
    0xde46_9fbd_99a0_5fe3, 0xa59b_c234_db39_8c25, 0xf6c6_9a72_a398_9f5c, 0xb7dc_bf53_54e9_bece,
    0x88fc_f317_f222_41e2, 0xcc20_ce9b_d35c_78a5, 0x9816_5af3_7b21_53df, 0xe2a0_b5dc_971f_303a,
    0xa8d9_d153_5ce3_b396, 0xfb9b_7cd9_a4a7_443c, 0xbb76_4c4c_a7a4_4410, 0x8bab_8eef_b640_9c1a,
    0xd01f_ef10_a657_842c, 0x9b10_a4e5_e991_3129, 0xe710_9bfb_a19c_0c9d, 0xac28_20d9_623b_f429,
    0x8044_4b5e_7aa7_cf85, 0xbf21_e440_03ac_dd2d, 0x8e67_9c2f_5e44_ff8f, 0xd433_179d_9c8c_b841,
    0x9e19_db92_b4e3_1ba9, 0xeb96_bf6e_badf_77d9, 0xaf87_023b_9bf0_ee6b,
];

#[rustfmt::skip]
static CACHED_POWERS_E: [i16; 87] = [
    -1220, -1193, -1166, -1140, -1113, -1087, -1060, -1034, -1007, -980,
    -954, -927, -901, -874, -847, -821, -794, -768, -741, -715,
    -688, -661, -635, -608, -582, -555, -529, -502, -475, -449,
    -422, -396, -369, -343, -316, -289, -263, -236, -210, -183,
    -157, -130, -103, -77, -50, -24, 3, 30, 56, 83,
    109, 136, 162, 189, 216, 242, 269, 295, 322, 348,
    375, 402, 428, 455, 481, 508, 534, 561, 588, 614,
    641, 667, 694, 720, 747, 774, 800, 827, 853, 880,
    907, 933, 960, 986, 1013, 1039, 1066,
];

/// Cached power of ten bringing `e` into the digit-cutting window, plus the
/// decimal exponent it stands for.
fn cached_power(e: i32) -> (DiyFp, i32) {
    let dk = (-61 - e) as f64 * 0.301_029_995_663_981_14 + 347.0;
    let mut k = dk as i32;
    if k as f64 != dk {
        k += 1;
    }
    let index = ((k >> 3) + 1) as usize;
    let decimal = -(-348 + ((index as i32) << 3));
    (
        DiyFp {
            f: CACHED_POWERS_F[index],
            e: CACHED_POWERS_E[index] as i32,
        },
        decimal,
    )
}

/// Pull the last digit down while the candidate moves closer to the scaled
/// value without leaving the rounding interval.
fn grisu_round(buffer: &mut [u8], len: usize, delta: u64, mut rest: u64, ten_kappa: u64, wp_w: u64) {
    while rest < wp_w
        && delta - rest >= ten_kappa
        && (rest + ten_kappa < wp_w || wp_w - rest > rest + ten_kappa - wp_w)
    {
        buffer[len - 1] -= 1;
        rest += ten_kappa;
    }
}

fn count_decimal_digits(n: u32) -> i32 {
    if n < 10 {
        return 1;
    }
    if n < 100 {
        return 2;
    }
    if n < 1_000 {
        return 3;
    }
    if n < 10_000 {
        return 4;
    }
    if n < 100_000 {
        return 5;
    }
    if n < 1_000_000 {
        return 6;
    }
    if n < 10_000_000 {
        return 7;
    }
    if n < 100_000_000 {
        return 8;
    }
    9
}

fn digit_gen(w: DiyFp, mp: DiyFp, mut delta: u64, buffer: &mut [u8], k: &mut i32) -> usize {
    static POW10_U32: [u32; 10] = [
        1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000, 100_000_000, 1_000_000_000,
    ];
    let shift = (-mp.e) as u32;
    let one_f = 1u64 << shift;
    let wp_w = mp.sub(w);
    let mut p1 = (mp.f >> shift) as u32;
    let mut p2 = mp.f & (one_f - 1);
    let mut kappa = count_decimal_digits(p1);
    let mut len = 0;

    while kappa > 0 {
        let power = POW10_U32[(kappa - 1) as usize];
        let d = p1 / power;
        p1 %= power;
        if d != 0 || len != 0 {
            buffer[len] = b'0' + d as u8;
            len += 1;
        }
        kappa -= 1;
        let rest = ((p1 as u64) << shift) + p2;
        if rest <= delta {
            *k += kappa;
            grisu_round(
                buffer,
                len,
                delta,
                rest,
                (POW10_U32[kappa as usize] as u64) << shift,
                wp_w.f,
            );
            return len;
        }
    }

    loop {
        p2 *= 10;
        delta *= 10;
        let d = (p2 >> shift) as u8;
        if d != 0 || len != 0 {
            buffer[len] = b'0' + d;
            len += 1;
        }
        p2 &= one_f - 1;
        kappa -= 1;
        if p2 < delta {
            *k += kappa;
            grisu_round(
                buffer,
                len,
                delta,
                p2,
                one_f,
                wp_w.f * POW10_U32[(-kappa) as usize] as u64,
            );
            return len;
        }
    }
}

fn grisu2(value: f64, buffer: &mut [u8], k: &mut i32) -> usize {
    let v = DiyFp::from_f64(value);
    let (w_m, w_p) = v.normalized_boundaries();
    let (c_mk, decimal) = cached_power(w_p.e);
    *k = decimal;
    let w = v.normalize().mul(c_mk);
    let mut wp = w_p.mul(c_mk);
    let mut wm = w_m.mul(c_mk);
    wm.f += 1;
    wp.f -= 1;
    digit_gen(w, wp, wp.f - wm.f, buffer, k)
}

fn write_exponent(mut k: i32, out: &mut [u8]) -> usize {
    let mut n = 0;
    if k < 0 {
        out[n] = b'-';
        n += 1;
        k = -k;
    }
    if k >= 100 {
        out[n] = b'0' + (k / 100) as u8;
        n += 1;
        let pair = ((k % 100) << 1) as usize;
        out[n] = DIGIT_PAIRS[pair];
        out[n + 1] = DIGIT_PAIRS[pair + 1];
        n + 2
    } else if k >= 10 {
        let pair = (k << 1) as usize;
        out[n] = DIGIT_PAIRS[pair];
        out[n + 1] = DIGIT_PAIRS[pair + 1];
        n + 2
    } else {
        out[n] = b'0' + k as u8;
        n + 1
    }
}

/// Lay the digit run out as plain decimal, leading-zero decimal, or
/// scientific, by where the decimal point lands.
fn prettify(buffer: &mut [u8], length: usize, k: i32) -> usize {
    let kk = length as i32 + k; // 10^(kk-1) <= v < 10^kk

    if length as i32 <= kk && kk <= 21 {
        // 1234e7 -> 12340000000
        for slot in buffer.iter_mut().take(kk as usize).skip(length) {
            *slot = b'0';
        }
        kk as usize
    } else if 0 < kk && kk <= 21 {
        // 1234e-2 -> 12.34
        buffer.copy_within(kk as usize..length, kk as usize + 1);
        buffer[kk as usize] = b'.';
        length + 1
    } else if -6 < kk && kk <= 0 {
        // 1234e-6 -> 0.001234
        let offset = (2 - kk) as usize;
        buffer.copy_within(0..length, offset);
        buffer[0] = b'0';
        buffer[1] = b'.';
        for slot in buffer.iter_mut().take(offset).skip(2) {
            *slot = b'0';
        }
        length + offset
    } else if length == 1 {
        // 1e30
        buffer[1] = b'e';
        2 + write_exponent(kk - 1, &mut buffer[2..])
    } else {
        // 1234e30 -> 1.234e33
        buffer.copy_within(1..length, 2);
        buffer[1] = b'.';
        buffer[length + 1] = b'e';
        length + 2 + write_exponent(kk - 1, &mut buffer[length + 2..])
    }
}

/// Format a finite double into `buf`, returning the byte length used.
/// Positive and negative zero both come out as `0`.
pub fn dtoa(value: f64, buf: &mut [u8; F64_BUFFER_LEN]) -> usize {
    debug_assert!(value.is_finite());
    if value == 0.0 {
        buf[0] = b'0';
        return 1;
    }
    let mut n = 0;
    let mut v = value;
    if v < 0.0 {
        buf[0] = b'-';
        n = 1;
        v = -v;
    }
    let mut k = 0;
    let length = grisu2(v, &mut buf[n..], &mut k);
    n + prettify(&mut buf[n..], length, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(value: f64) -> String {
        let mut buf = [0u8; F64_BUFFER_LEN];
        let n = dtoa(value, &mut buf);
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    #[rstest::rstest]
    #[case(0.0, "0")]
    #[case(-0.0, "0")]
    #[case(1.0, "1")]
    #[case(-1.0, "-1")]
    #[case(0.1, "0.1")]
    #[case(3.14, "3.14")]
    #[case(-3.14, "-3.14")]
    #[case(150.0, "150")]
    #[case(1e7, "10000000")]
    #[case(0.000001, "0.000001")]
    #[case(0.0000001, "1e-7")]
    #[case(1e100, "1e100")]
    #[case(1e30, "1e30")]
    #[case(1.234e33, "1.234e33")]
    #[case(5e-324, "5e-324")]
    #[case(2147483647.0, "2147483647")]
    fn test_known_shapes(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format(value), expected);
    }

    #[rstest::rstest]
    #[case(1.0 / 3.0)]
    #[case(2.0 / 3.0)]
    #[case(0.3)]
    #[case(123.456e78)]
    #[case(f64::MAX)]
    #[case(f64::MIN_POSITIVE)]
    #[case(5e-324)]
    #[case(1.2345678901234567e300)]
    #[case(std::f64::consts::PI)]
    #[case(std::f64::consts::E)]
    fn test_round_trips_bit_for_bit(#[case] value: f64) {
        let text = format(value);
        let back: f64 = text.parse().unwrap();
        assert_eq!(back.to_bits(), value.to_bits(), "{value} -> {text}");
        let neg = format(-value);
        let back: f64 = neg.parse().unwrap();
        assert_eq!(back.to_bits(), (-value).to_bits(), "-{value} -> {neg}");
    }

    #[rstest::rstest]
    fn test_round_trips_across_magnitudes() {
        let mut value = 1.0e-320f64;
        while value < 1.0e300 {
            let text = format(value);
            let back: f64 = text.parse().unwrap();
            assert_eq!(back.to_bits(), value.to_bits(), "{value} -> {text}");
            value *= 9.735;
        }
    }

    #[rstest::rstest]
    fn test_agrees_with_ryu_on_value() {
        // shapes differ, parsed values may not
        let mut ryu_buf = ryu::Buffer::new();
        for value in [0.1, 1.5, 1e23, 9.87e-20, 1234567.0, 4.9406564584124654e-324] {
            let ours: f64 = format(value).parse().unwrap();
            let theirs: f64 = ryu_buf.format(value).parse().unwrap();
            assert_eq!(ours.to_bits(), theirs.to_bits());
        }
    }
}
