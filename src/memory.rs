use crate::{ConsoleError, Result};

pub const RAM_SIZE: usize = 32 * 1024; // 32 KB
pub const ROM_SIZE: usize = 0x4300;

// Base RAM layout. Only the screen window is interpreted by this crate; the
// remaining regions share the flat address space and its bounds contract.
//
//   0x0000 gfx
//   0x1000 gfx2/map2 (shared)
//   0x2000 map
//   0x3000 gfx props
//   0x3100 song
//   0x3200 sfx
//   0x4300 user data
//   0x5e00 persistent cart data
//   0x5f00 draw state (+ unused)
//   0x6000 screen (8k, two pixels per byte)
pub const GFX_BASE: usize = 0x0000;
pub const GFX2_BASE: usize = 0x1000;
pub const MAP_BASE: usize = 0x2000;
pub const GFX_PROPS_BASE: usize = 0x3000;
pub const SONG_BASE: usize = 0x3100;
pub const SFX_BASE: usize = 0x3200;
pub const USER_DATA_BASE: usize = 0x4300;
pub const CART_DATA_BASE: usize = 0x5e00;
pub const DRAW_STATE_BASE: usize = 0x5f00;
pub const SCREEN_BASE: usize = 0x6000;
pub const SCREEN_SIZE: usize = 128 * 64;

/// Flat machine memory: base RAM plus the cart ROM window used by
/// [`Memory::reload`] and [`Memory::cstore`]. Allocated once, zeroed, never
/// resized.
pub struct Memory {
    ram: [u8; RAM_SIZE],
    rom: [u8; ROM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            ram: [0; RAM_SIZE],
            rom: [0; ROM_SIZE],
        }
    }

    /// Read a single byte of base RAM.
    pub fn peek(&self, addr: usize) -> Result<u8> {
        if addr < RAM_SIZE {
            Ok(self.ram[addr])
        } else {
            Err(ConsoleError::OutOfRange(format!(
                "addr must meet the condition: 0 <= addr < {RAM_SIZE}, was {addr}"
            )))
        }
    }

    /// Write a single byte of base RAM.
    pub fn poke(&mut self, addr: usize, val: u8) -> Result<()> {
        if addr < RAM_SIZE {
            self.ram[addr] = val;
            Ok(())
        } else {
            Err(ConsoleError::OutOfRange(format!(
                "addr must meet the condition: 0 <= addr < {RAM_SIZE}, was {addr}"
            )))
        }
    }

    /// Copy `len` bytes of RAM from `src` to `dest`. Overlapping ranges copy
    /// as if through a temporary buffer.
    pub fn memcpy(&mut self, dest: usize, src: usize, len: usize) -> Result<()> {
        if in_bounds(src, len, RAM_SIZE) && in_bounds(dest, len, RAM_SIZE) {
            self.ram.copy_within(src..src + len, dest);
            Ok(())
        } else {
            Err(ConsoleError::OutOfRange(format!(
                "dest, src, len must meet the condition: \
                 dest + len <= {RAM_SIZE}, src + len <= {RAM_SIZE}, \
                 were {dest} {src} {len}"
            )))
        }
    }

    /// Restore `len` bytes from cart ROM at `src` into RAM at `dest`.
    pub fn reload(&mut self, dest: usize, src: usize, len: usize) -> Result<()> {
        if in_bounds(src, len, ROM_SIZE) && in_bounds(dest, len, RAM_SIZE) {
            self.ram[dest..dest + len].copy_from_slice(&self.rom[src..src + len]);
            Ok(())
        } else {
            Err(ConsoleError::OutOfRange(format!(
                "dest, src, len must meet the condition: \
                 dest + len <= {RAM_SIZE}, src + len <= {ROM_SIZE}, \
                 were {dest} {src} {len}"
            )))
        }
    }

    /// Store `len` bytes from RAM at `src` into cart ROM at `dest`.
    pub fn cstore(&mut self, dest: usize, src: usize, len: usize) -> Result<()> {
        if in_bounds(src, len, RAM_SIZE) && in_bounds(dest, len, ROM_SIZE) {
            self.rom[dest..dest + len].copy_from_slice(&self.ram[src..src + len]);
            Ok(())
        } else {
            Err(ConsoleError::OutOfRange(format!(
                "dest, src, len must meet the condition: \
                 dest + len <= {ROM_SIZE}, src + len <= {RAM_SIZE}, \
                 were {dest} {src} {len}"
            )))
        }
    }

    /// [`Memory::cstore`] with every argument defaulted: store the whole
    /// ROM-sized window starting at address 0.
    pub fn cstore_all(&mut self) {
        self.rom.copy_from_slice(&self.ram[..ROM_SIZE]);
    }

    /// Set `len` bytes of RAM starting at `dest` to `val`.
    pub fn memset(&mut self, dest: usize, val: u8, len: usize) -> Result<()> {
        if in_bounds(dest, len, RAM_SIZE) {
            self.ram[dest..dest + len].fill(val);
            Ok(())
        } else {
            Err(ConsoleError::OutOfRange(format!(
                "dest, len must meet the condition: dest + len <= {RAM_SIZE}, \
                 were {dest} {len}"
            )))
        }
    }

    /// Read-only view of the packed screen window.
    pub fn screen(&self) -> &[u8] {
        &self.ram[SCREEN_BASE..SCREEN_BASE + SCREEN_SIZE]
    }

    // Mutable counterpart, for the pixel layer. Coordinate bounds are the
    // caller's responsibility; the window itself is always in range.
    pub(crate) fn screen_mut(&mut self) -> &mut [u8] {
        &mut self.ram[SCREEN_BASE..SCREEN_BASE + SCREEN_SIZE]
    }
}

// Whole affected range must stay inside the region; written to avoid
// wrapping on `start + len`.
fn in_bounds(start: usize, len: usize, size: usize) -> bool {
    len <= size && start <= size - len
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_poke_round_trip() {
        let mut mem = Memory::new();
        mem.poke(0x4300, 0xAB).unwrap();
        assert_eq!(mem.peek(0x4300).unwrap(), 0xAB);
        assert_eq!(mem.peek(0x4301).unwrap(), 0);
    }

    #[test]
    fn peek_poke_reject_out_of_range() {
        let mut mem = Memory::new();
        assert!(matches!(
            mem.peek(RAM_SIZE),
            Err(ConsoleError::OutOfRange(_))
        ));
        assert!(matches!(
            mem.poke(RAM_SIZE, 1),
            Err(ConsoleError::OutOfRange(_))
        ));
        // Last valid address is fine.
        mem.poke(RAM_SIZE - 1, 7).unwrap();
        assert_eq!(mem.peek(RAM_SIZE - 1).unwrap(), 7);
    }

    #[test]
    fn memset_fills_range() {
        let mut mem = Memory::new();
        mem.memset(0x100, 0x5A, 16).unwrap();
        assert_eq!(mem.peek(0xFF).unwrap(), 0);
        for addr in 0x100..0x110 {
            assert_eq!(mem.peek(addr).unwrap(), 0x5A);
        }
        assert_eq!(mem.peek(0x110).unwrap(), 0);
        assert!(mem.memset(RAM_SIZE - 8, 1, 16).is_err());
    }

    #[test]
    fn memcpy_matches_temp_buffer_copy_when_overlapping() {
        let pattern: Vec<u8> = (0..64u8).collect();

        // Forward overlap (dest > src) and backward overlap (dest < src),
        // each checked against a copy staged through a scratch buffer.
        for (dest, src) in [(0x210usize, 0x200usize), (0x200usize, 0x210usize)] {
            let mut mem = Memory::new();
            for (i, &b) in pattern.iter().enumerate() {
                mem.poke(0x200 + i, b).unwrap();
            }
            let mut expected = [0u8; 64];
            for (i, slot) in expected.iter_mut().enumerate() {
                *slot = mem.peek(0x200 + i).unwrap();
            }
            let staged: Vec<u8> = (0..32).map(|i| expected[src - 0x200 + i]).collect();
            for (i, &b) in staged.iter().enumerate() {
                expected[dest - 0x200 + i] = b;
            }

            mem.memcpy(dest, src, 32).unwrap();
            for (i, &want) in expected.iter().enumerate() {
                assert_eq!(mem.peek(0x200 + i).unwrap(), want, "offset {i}");
            }
        }
    }

    #[test]
    fn memcpy_rejects_ranges_leaving_ram() {
        let mut mem = Memory::new();
        assert!(mem.memcpy(RAM_SIZE - 4, 0, 8).is_err());
        assert!(mem.memcpy(0, RAM_SIZE - 4, 8).is_err());
        assert!(mem.memcpy(0, RAM_SIZE, 0).is_ok());
        assert!(mem.memcpy(RAM_SIZE - 8, 0, 8).is_ok());
    }

    #[test]
    fn cstore_then_reload_round_trips() {
        let mut mem = Memory::new();
        for addr in 0..32 {
            mem.poke(addr, (addr as u8).wrapping_mul(3)).unwrap();
        }
        mem.cstore(0, 0, 32).unwrap();
        mem.memset(0, 0, 32).unwrap();
        mem.reload(0, 0, 32).unwrap();
        for addr in 0..32 {
            assert_eq!(mem.peek(addr).unwrap(), (addr as u8).wrapping_mul(3));
        }
    }

    #[test]
    fn cstore_all_snapshots_the_rom_window() {
        let mut mem = Memory::new();
        mem.poke(0, 0x11).unwrap();
        mem.poke(ROM_SIZE - 1, 0x22).unwrap();
        mem.poke(ROM_SIZE, 0x33).unwrap(); // just past the window
        mem.cstore_all();
        mem.memset(0, 0, RAM_SIZE).unwrap();
        mem.reload(0, 0, ROM_SIZE).unwrap();
        assert_eq!(mem.peek(0).unwrap(), 0x11);
        assert_eq!(mem.peek(ROM_SIZE - 1).unwrap(), 0x22);
        assert_eq!(mem.peek(ROM_SIZE).unwrap(), 0);
    }

    #[test]
    fn rom_bounds_are_checked_independently() {
        let mut mem = Memory::new();
        assert!(mem.reload(0, ROM_SIZE - 4, 8).is_err());
        assert!(mem.cstore(ROM_SIZE - 4, 0, 8).is_err());
        assert!(mem.reload(RAM_SIZE - 4, 0, 8).is_err());
        assert!(mem.reload(0, 0, ROM_SIZE).is_ok());
    }
}
