/// Fixed 64-entry hardware palette, packed 0xAABBGGRR.
#[rustfmt::skip]
pub const SYSTEM_PALETTE: [u32; 64] = [
    0xff525252, 0xffb40000, 0xffa00000, 0xffb1003d, 0xff740069, 0xff00005b, 0xff00005f, 0xff001840,
    0xff002f10, 0xff08aa08, 0xff006700, 0xff124200, 0xff6d2800, 0xff000000, 0xff000000, 0xff000000,
    0xffc4d5e7, 0xffff4000, 0xffdc0e22, 0xffff476b, 0xffd7009f, 0xff680ad7, 0xff0019bc, 0xff0054b1,
    0xff006a5b, 0xff008c03, 0xff00ab00, 0xff2c8800, 0xffa47200, 0xff000000, 0xff000000, 0xff000000,
    0xfff8f8f8, 0xffffab3c, 0xffff7981, 0xffff5bc5, 0xffff48f2, 0xffdf49ff, 0xff476dff, 0xff00b4f7,
    0xff00e0ff, 0xff00e375, 0xff03f42b, 0xff78b82e, 0xffe5e218, 0xff787878, 0xff000000, 0xff000000,
    0xffffffff, 0xfffff2be, 0xfff8b8b8, 0xfff8b8d8, 0xffffb6ff, 0xffffc3ff, 0xffc7d1ff, 0xff9adaff,
    0xff88edf8, 0xff83ffdd, 0xffb8f8b8, 0xfff5f8ac, 0xffffffb0, 0xfff8d8f8, 0xff000000, 0xff000000,
];

/// Unpack a palette entry into RGBA bytes. Indices are masked to the
/// table size.
pub fn rgba(index: u8) -> [u8; 4] {
    let color = SYSTEM_PALETTE[(index & 0x3F) as usize];
    [
        color as u8,
        (color >> 8) as u8,
        (color >> 16) as u8,
        (color >> 24) as u8,
    ]
}
