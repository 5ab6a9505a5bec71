//! The opcode table.
//!
//! Unlike the word-aligned, fixed-width instruction sets used by some
//! register/stack VMs, these instructions are *not* uniformly sized: the
//! opcode byte is always one byte, but the number of immediate bytes that
//! follow it varies per opcode (0, 1 or 2), and `WIDE` additionally widens
//! the immediate of the instruction that follows it. See
//! [`Opcode::is_wideable`] for which opcodes `WIDE` may legally prefix; the
//! actual immediate widths are a property of dispatch, not of the opcode
//! table, since `WIDE` changes them contextually.

use crate::Byte;

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(non_camel_case_types)]
pub enum Opcode {
    NOP = 0x00,
    BIPUSH = 0x10,
    LDC_W = 0x13,
    ILOAD = 0x15,
    ISTORE = 0x36,
    IINC = 0x84,
    DUP = 0x59,
    POP = 0x57,
    SWAP = 0x5F,
    IADD = 0x60,
    ISUB = 0x64,
    IAND = 0x7E,
    IOR = 0xB0,
    GOTO = 0xA7,
    IFEQ = 0x99,
    IFLT = 0x9B,
    IF_ICMPEQ = 0x9F,
    INVOKEVIRTUAL = 0xB6,
    IRETURN = 0xAC,
    TAILCALL = 0xCB,
    WIDE = 0xC4,
    NEWARRAY = 0xD1,
    IALOAD = 0xD2,
    IASTORE = 0xD3,
    GC = 0xD4,
    IN = 0xFC,
    OUT = 0xFD,
    ERR = 0xFE,
    HALT = 0xFF,
}

/// the byte value didn't match any entry in [`Opcode`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct UnknownOpcode(pub Byte);

impl TryFrom<Byte> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(value: Byte) -> Result<Self, Self::Error> {
        use Opcode::*;
        Ok(match value {
            0x00 => NOP,
            0x10 => BIPUSH,
            0x13 => LDC_W,
            0x15 => ILOAD,
            0x36 => ISTORE,
            0x84 => IINC,
            0x59 => DUP,
            0x57 => POP,
            0x5F => SWAP,
            0x60 => IADD,
            0x64 => ISUB,
            0x7E => IAND,
            0xB0 => IOR,
            0xA7 => GOTO,
            0x99 => IFEQ,
            0x9B => IFLT,
            0x9F => IF_ICMPEQ,
            0xB6 => INVOKEVIRTUAL,
            0xAC => IRETURN,
            0xCB => TAILCALL,
            0xC4 => WIDE,
            0xD1 => NEWARRAY,
            0xD2 => IALOAD,
            0xD3 => IASTORE,
            0xD4 => GC,
            0xFC => IN,
            0xFD => OUT,
            0xFE => ERR,
            0xFF => HALT,
            other => return Err(UnknownOpcode(other)),
        })
    }
}

impl Opcode {
    /// `true` for the opcodes `WIDE` may legally prefix.
    pub const fn is_wideable(self) -> bool {
        matches!(self, Opcode::ILOAD | Opcode::ISTORE | Opcode::IINC)
    }
}
