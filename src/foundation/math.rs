pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Premultiplied source-over of `src` onto `dst`, in place. Both slices are RGBA8.
pub(crate) fn over_premul_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - u16::from(sa);
        for i in 0..4 {
            let v = u16::from(s[i]) + u16::from(mul_div255_u8(u16::from(d[i]), inv));
            d[i] = v.min(255) as u8;
        }
    }
}

/// Source-over of opaque black at `alpha` onto every premultiplied pixel.
pub(crate) fn fade_to_black_in_place(dst: &mut [u8], alpha: f64) {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u16;
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    for px in dst.chunks_exact_mut(4) {
        px[0] = mul_div255_u8(u16::from(px[0]), inv);
        px[1] = mul_div255_u8(u16::from(px[1]), inv);
        px[2] = mul_div255_u8(u16::from(px[2]), inv);
        let da = a + u16::from(mul_div255_u8(u16::from(px[3]), inv));
        px[3] = da.min(255) as u8;
    }
}
