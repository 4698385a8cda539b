use crate::memory::{Memory, RAM_SIZE, SCREEN_BASE, SCREEN_SIZE};
use crate::palette::color_rgb;
use crate::{ConsoleError, Result};

/// The console context: flat memory, the fixed screen dimensions, and the
/// current pen color. Owned by the host and passed by reference into every
/// operation; no hidden globals, so multiple independent consoles can
/// coexist (and be unit tested).
pub struct Console {
    pub memory: Memory,
    width: i32,
    height: i32,
    pen: u8,
}

fn low_nibble(byte: u8) -> u8 {
    byte & 0x0F
}

fn high_nibble(byte: u8) -> u8 {
    byte >> 4
}

fn pack_nibbles(high: u8, low: u8) -> u8 {
    (high << 4) | (low & 0x0F)
}

impl Console {
    /// Create a console with the given screen dimensions. The dimensions are
    /// fixed for the lifetime of the console; all addressing math depends on
    /// that.
    ///
    /// Fails when the packed screen would not fit the 8k screen window, so
    /// the addressing math can never run off into the neighbouring regions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixels = width as usize * height as usize;
        if width == 0 || height == 0 || pixels.div_ceil(2) > SCREEN_SIZE {
            return Err(ConsoleError::OutOfRange(format!(
                "width, height must meet the condition: \
                 0 < width * height <= {}, were {width} {height}",
                SCREEN_SIZE * 2
            )));
        }
        Ok(Console {
            memory: Memory::new(),
            width: width as i32,
            height: height as i32,
            pen: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    // Row 0 is the bottom of the screen; the packed buffer stores rows
    // top-down, so the vertical axis flips here.
    fn pixel_index(&self, x: i32, y: i32) -> i64 {
        x as i64 + (self.height as i64 - y as i64 - 1) * self.width as i64
    }

    /// Read the color index of a pixel. No coordinate clamp: out-of-screen
    /// coordinates alias into the packed buffer or the neighbouring RAM
    /// regions, and fail with `OutOfRange` only once the computed byte
    /// address leaves RAM entirely.
    pub fn pget(&self, x: i32, y: i32) -> Result<u8> {
        let idx = self.pixel_index(x, y);
        let byte_addr = SCREEN_BASE as i64 + idx.div_euclid(2);
        let addr = usize::try_from(byte_addr).map_err(|_| {
            ConsoleError::OutOfRange(format!(
                "addr must meet the condition: 0 <= addr < {RAM_SIZE}, was {byte_addr}"
            ))
        })?;
        let byte = self.memory.peek(addr)?;
        if idx.rem_euclid(2) == 0 {
            Ok(low_nibble(byte))
        } else {
            Ok(high_nibble(byte))
        }
    }

    /// Write one pixel. Off-screen coordinates are silently ignored; this is
    /// the only bounds check in the drawing layer, and every primitive
    /// relies on it for clipping. Color indices outside `0..16` fall back to
    /// the current pen color.
    pub fn pset(&mut self, x: i32, y: i32, col: u8) {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return;
        }
        let col = self.resolve_color(col);
        // In range, so the index fits the screen window.
        let idx = self.pixel_index(x, y) as usize;
        let byte = &mut self.memory.screen_mut()[idx / 2];
        *byte = if idx % 2 == 0 {
            pack_nibbles(high_nibble(*byte), col)
        } else {
            pack_nibbles(col, low_nibble(*byte))
        };
    }

    /// Set the pen color consulted when a drawing call passes an invalid
    /// color index.
    pub fn color(&mut self, col: u8) -> Result<()> {
        if col < 16 {
            self.pen = col;
            Ok(())
        } else {
            Err(ConsoleError::InvalidColorIndex(col))
        }
    }

    pub fn pen(&self) -> u8 {
        self.pen
    }

    // Invalid indices silently degrade to the pen color rather than failing;
    // compatibility behavior that every primitive shares.
    fn resolve_color(&self, col: u8) -> u8 {
        if col < 16 { col } else { self.pen }
    }

    /// Clear the whole screen window to color 0.
    pub fn cls(&mut self) {
        self.memory.screen_mut().fill(0);
    }

    /// Bresenham line from `(x0, y0)` to `(x1, y1)`, both endpoints
    /// included. A zero-length line plots a single pixel.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: u8) {
        let col = self.resolve_color(col);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.pset(x, y, col);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rectangle outline, corners included.
    pub fn rect(&mut self, mut x0: i32, mut y0: i32, mut x1: i32, mut y1: i32, col: u8) {
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
        }
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
        }
        let col = self.resolve_color(col);
        for x in x0..=x1 {
            self.pset(x, y0, col);
            self.pset(x, y1, col);
        }
        for y in y0..=y1 {
            self.pset(x0, y, col);
            self.pset(x1, y, col);
        }
    }

    /// Filled rectangle over the half-open box `[x0, x1) x [y0, y1)`. The
    /// max edge is excluded, unlike [`Console::rect`]; kept that way for
    /// compatibility.
    pub fn rect_fill(&mut self, mut x0: i32, mut y0: i32, mut x1: i32, mut y1: i32, col: u8) {
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
        }
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
        }
        let col = self.resolve_color(col);
        for x in x0..x1 {
            for y in y0..y1 {
                self.pset(x, y, col);
            }
        }
    }

    /// Midpoint circle outline around `(cx, cy)`, plotting all eight octant
    /// points per step.
    pub fn circ(&mut self, cx: i32, cy: i32, r: i32, col: u8) {
        let col = self.resolve_color(col);
        let mut offx = r;
        let mut offy = 0;
        // Decision criterion divided by 2, evaluated at x=r, y=0.
        let mut decision = 1 - offx;
        while offy <= offx {
            self.pset(cx + offx, cy + offy, col);
            self.pset(cx + offy, cy + offx, col);
            self.pset(cx - offx, cy + offy, col);
            self.pset(cx - offy, cy + offx, col);
            self.pset(cx - offx, cy - offy, col);
            self.pset(cx - offy, cy - offx, col);
            self.pset(cx + offx, cy - offy, col);
            self.pset(cx + offy, cy - offx, col);
            offy += 1;
            if decision <= 0 {
                decision += 2 * offy + 1;
            } else {
                offx -= 1;
                decision += 2 * (offy - offx) + 1;
            }
        }
    }

    /// Filled circle: same midpoint stepping as [`Console::circ`], but
    /// drawing four horizontal spans per step instead of plotting points.
    pub fn circ_fill(&mut self, cx: i32, cy: i32, r: i32, col: u8) {
        let col = self.resolve_color(col);
        let mut offx = r;
        let mut offy = 0;
        let mut decision = 1 - offx;
        while offy <= offx {
            self.line(cx + offx, cy + offy, cx - offx, cy + offy, col);
            self.line(cx + offy, cy + offx, cx - offy, cy + offx, col);
            self.line(cx - offx, cy - offy, cx + offx, cy - offy, col);
            self.line(cx - offy, cy - offx, cx + offy, cy - offx, col);
            offy += 1;
            if decision <= 0 {
                decision += 2 * offy + 1;
            } else {
                offx -= 1;
                decision += 2 * (offy - offx) + 1;
            }
        }
    }

    /// Number of bytes [`Console::flip`] writes: `width * height * 3`.
    pub fn frame_size(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Expand the packed screen into a flat RGB byte buffer for upload to a
    /// display surface. Rows come out bottom-first, matching the vertical
    /// flip of the framebuffer addressing.
    pub fn flip(&self, frame: &mut [u8]) -> Result<()> {
        if frame.len() < self.frame_size() {
            return Err(ConsoleError::OutOfRange(format!(
                "frame must meet the condition: len >= {}, was {}",
                self.frame_size(),
                frame.len()
            )));
        }
        for x in 0..self.width {
            for y in 0..self.height {
                let offset = self.pixel_index(x, y) as usize * 3;
                let rgb = color_rgb(self.pget(x, y)?);
                frame[offset..offset + 3].copy_from_slice(&rgb);
            }
        }
        Ok(())
    }
}
