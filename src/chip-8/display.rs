use crate::error::{Error, Result};
use crate::quirks::SpriteEdges;

pub const FRAME_BUFFER_PIXEL_WIDTH: usize = 64;
pub const FRAME_BUFFER_PIXEL_HEIGHT: usize = 32;
const FRAME_BUFFER_SIZE: usize = FRAME_BUFFER_PIXEL_WIDTH * FRAME_BUFFER_PIXEL_HEIGHT;

/// The 64x32 monochrome screen. Each cell holds 0 or 1, row major.
///
/// The dirty flag is raised whenever the screen is cleared or drawn to and is
/// lowered by whoever renders the frame.
#[derive(Clone)]
pub struct Framebuffer {
    framebuffer: [u8; FRAME_BUFFER_SIZE],
    dirty: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            framebuffer: [0; FRAME_BUFFER_SIZE],
            dirty: false,
        }
    }
}

impl Framebuffer {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn pixels(&self) -> &[u8] {
        &self.framebuffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<bool> {
        if x >= FRAME_BUFFER_PIXEL_WIDTH || y >= FRAME_BUFFER_PIXEL_HEIGHT {
            return Err(Error::PixelOutOfRange { x, y });
        }

        Ok(self.framebuffer[y * FRAME_BUFFER_PIXEL_WIDTH + x] == 1)
    }

    pub fn cls(&mut self) {
        self.framebuffer = [0; FRAME_BUFFER_SIZE];
        self.dirty = true;
    }

    /// XOR an 8 pixel wide sprite onto the screen with its top left corner at
    /// `(x, y)`, one byte per row. Returns whether any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8], edges: SpriteEdges) -> bool {
        self.dirty = true;

        sprite
            .iter()
            .enumerate()
            .fold(false, |did_collide, (y_offset, row)| {
                let y_pos = y as usize + y_offset;
                let y_norm = match edges {
                    SpriteEdges::Wrap => y_pos % FRAME_BUFFER_PIXEL_HEIGHT,
                    SpriteEdges::Clip if y_pos < FRAME_BUFFER_PIXEL_HEIGHT => y_pos,
                    SpriteEdges::Clip => return did_collide,
                };

                let inner_collide = (0..8_usize).fold(false, |did_collide_inner, x_bit| {
                    let sprite_pixel = (row >> (7 - x_bit)) & 0x1;
                    if sprite_pixel == 0 {
                        return did_collide_inner;
                    }

                    let x_pos = x as usize + x_bit;
                    let x_norm = match edges {
                        SpriteEdges::Wrap => x_pos % FRAME_BUFFER_PIXEL_WIDTH,
                        SpriteEdges::Clip if x_pos < FRAME_BUFFER_PIXEL_WIDTH => x_pos,
                        SpriteEdges::Clip => return did_collide_inner,
                    };

                    let buffer_index = y_norm * FRAME_BUFFER_PIXEL_WIDTH + x_norm;
                    let previous_display_value = self.framebuffer[buffer_index];
                    self.framebuffer[buffer_index] = previous_display_value ^ sprite_pixel;

                    did_collide_inner || previous_display_value == 1
                });

                did_collide || inner_collide
            })
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.framebuffer.iter().filter(|&&p| p == 1).count();
        f.debug_struct("Framebuffer")
            .field("lit_pixels", &lit)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Framebuffer, FRAME_BUFFER_PIXEL_HEIGHT, FRAME_BUFFER_PIXEL_WIDTH};
    use crate::error::Error;
    use crate::quirks::SpriteEdges;

    #[test]
    fn test_default() {
        let fb = Framebuffer::default();

        assert_eq!(fb.is_dirty(), false);
        assert_eq!(fb.pixels().len(), 2048);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_draw_sprite() {
        let mut fb = Framebuffer::default();

        let collided = fb.draw_sprite(2, 1, &[0b1000_0001], SpriteEdges::Wrap);

        assert_eq!(collided, false);
        assert_eq!(fb.is_dirty(), true);
        assert_eq!(fb.pixel(2, 1), Ok(true));
        assert_eq!(fb.pixel(3, 1), Ok(false));
        assert_eq!(fb.pixel(9, 1), Ok(true));
    }

    #[test]
    fn test_draw_sprite_twice_collides() {
        let mut fb = Framebuffer::default();

        fb.draw_sprite(0, 0, &[0xFF, 0xFF], SpriteEdges::Wrap);
        let collided = fb.draw_sprite(0, 0, &[0xFF, 0xFF], SpriteEdges::Wrap);

        assert_eq!(collided, true);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_draw_sprite_wraps() {
        let mut fb = Framebuffer::default();

        fb.draw_sprite(62, 31, &[0b1110_0000, 0b1000_0000], SpriteEdges::Wrap);

        assert_eq!(fb.pixel(62, 31), Ok(true));
        assert_eq!(fb.pixel(63, 31), Ok(true));
        assert_eq!(fb.pixel(0, 31), Ok(true));
        assert_eq!(fb.pixel(62, 0), Ok(true));
    }

    #[test]
    fn test_draw_sprite_wraps_large_coordinates() {
        let mut fb = Framebuffer::default();

        fb.draw_sprite(255, 255, &[0x80], SpriteEdges::Wrap);

        assert_eq!(fb.pixel(63, 31), Ok(true));
    }

    #[test]
    fn test_draw_sprite_clips() {
        let mut fb = Framebuffer::default();

        fb.draw_sprite(62, 31, &[0b1110_0000, 0b1000_0000], SpriteEdges::Clip);

        assert_eq!(fb.pixel(62, 31), Ok(true));
        assert_eq!(fb.pixel(63, 31), Ok(true));
        assert_eq!(fb.pixel(0, 31), Ok(false));
        assert_eq!(fb.pixel(62, 0), Ok(false));
        assert_eq!(fb.pixels().iter().filter(|&&p| p == 1).count(), 2);
    }

    #[test]
    fn test_cls() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(10, 10, &[0xFF], SpriteEdges::Wrap);
        fb.clear_dirty();

        fb.cls();

        assert_eq!(fb.is_dirty(), true);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_pixel_out_of_range() {
        let fb = Framebuffer::default();

        assert_eq!(
            fb.pixel(FRAME_BUFFER_PIXEL_WIDTH, 0),
            Err(Error::PixelOutOfRange { x: 64, y: 0 })
        );
        assert_eq!(
            fb.pixel(0, FRAME_BUFFER_PIXEL_HEIGHT),
            Err(Error::PixelOutOfRange { x: 0, y: 32 })
        );
    }
}
