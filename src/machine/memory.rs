use crate::machine::config::{MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT, STACK_DEPTH};
use crate::machine::error::Chip8Error;

/// Flat 4 KiB byte store. Every access is bounds-checked; nothing here
/// knows about the reserved interpreter region.
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            bytes: [0; MEMORY_SIZE],
        }
    }
}

impl Memory {
    pub fn read(&self, address: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Chip8Error::AddressOutOfBounds(address))
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Chip8Error> {
        let cell = self
            .bytes
            .get_mut(address)
            .ok_or(Chip8Error::AddressOutOfBounds(address))?;
        *cell = value;
        Ok(())
    }

    /// Big-endian word at `address`, `address + 1`.
    pub fn read_word(&self, address: usize) -> Result<u16, Chip8Error> {
        let high = self.read(address)? as u16;
        let low = self.read(address + 1)? as u16;
        Ok((high << 8) | low)
    }

    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = address + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfBounds(end - 1));
        }
        Ok(&self.bytes[address..end])
    }

    pub fn load(&mut self, offset: usize, data: &[u8]) -> Result<(), Chip8Error> {
        let end = offset + data.len();
        if end > MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfBounds(end - 1));
        }
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bytes = [0; MEMORY_SIZE];
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

/// V0..VF plus the index register and program counter.
///
/// `v` is indexed directly; an index of 16 or more panics. Decoded
/// register operands are 4-bit so this only trips on caller bugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START as u16,
        }
    }
}

/// Fixed-depth return address stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack {
    entries: [u16; STACK_DEPTH],
    sp: usize,
}

impl CallStack {
    pub fn push(&mut self, address: u16) -> Result<(), Chip8Error> {
        if self.sp >= STACK_DEPTH {
            return Err(Chip8Error::StackOverflow);
        }
        self.entries[self.sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.entries[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    pub fn clear(&mut self) {
        self.entries = [0; STACK_DEPTH];
        self.sp = 0;
    }
}
