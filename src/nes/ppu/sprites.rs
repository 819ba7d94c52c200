use super::{PPU, PpuCtrl, SPRITE_PALETTE_BASE};
use crate::nes::video::{FRAME_COLS, FRAME_ROWS};

impl PPU {
    /// Composite all 64 OAM entries into the frame. Runs once per frame
    /// after the visible region completes, not per scanline.
    pub fn composite_frame(&mut self) {
        let tall_sprites = self.ctrl.contains(PpuCtrl::SPRITE_SIZE);
        let sprite_table = self.ctrl.contains(PpuCtrl::SPRITE_PATTERN) as u16;

        for entry in 0..64 {
            let base = entry * 4;
            let y = self.oam[base] as u16 + 1;
            let mut tile = self.oam[base + 1];
            let attr_byte = self.oam[base + 2];
            let x = self.oam[base + 3] as u16;

            let attribute = attr_byte & 0x03;
            let behind = attr_byte & 0x20 != 0;
            let flip_h = attr_byte & 0x40 != 0;
            let flip_v = attr_byte & 0x80 != 0;

            let mut table = sprite_table;
            if tall_sprites {
                // 8x16 mode selects the pattern table from tile bit 0;
                // the second half-tile is not drawn.
                table = (tile & 1) as u16;
                tile &= 0xFE;
            }

            if y < 0xEF {
                self.draw_sprite_tile(x, y, table, tile, attribute, flip_h, flip_v, behind);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_sprite_tile(
        &mut self,
        x: u16,
        y: u16,
        table: u16,
        tile: u8,
        attribute: u8,
        flip_h: bool,
        flip_v: bool,
        behind: bool,
    ) {
        for row in 0..8u16 {
            let plane_row = if flip_v { 7 - row } else { row };
            for col in 0..8u16 {
                let plane_col = if flip_h { 7 - col } else { col };
                let bit = self.pattern_bit(table, tile, plane_col, plane_row);
                if bit == 0 {
                    // Color index 0 is transparent for sprites
                    continue;
                }

                let px = (x + col) as usize;
                let py = (y + row) as usize;
                if px >= FRAME_COLS || py >= FRAME_ROWS {
                    continue;
                }

                if behind {
                    // Behind-background sprites only show through the
                    // universal transparent/black color
                    let [r, g, b, _] = self.frame.pixel(px, py);
                    if r != 0 || g != 0 || b != 0 {
                        continue;
                    }
                }

                let color = self.resolve_color(SPRITE_PALETTE_BASE, attribute, bit);
                self.frame.set_pixel(px, py, color);
            }
        }
    }
}
