//! Word/byte types, the `Opcode` table, and wire constants shared by the
//! image loader, the execution engine and any host front-end.

pub mod opcode;

/// the machine word: every operand stack entry, local variable slot and
/// constant-pool entry is a 32-bit signed integer.
///
/// note: `Word` here means the VM's integer cell. do not confuse it with a
/// CPU "machine word" of native pointer width — it is always 32 bits,
/// independent of the host platform.
pub type Word = i32;

/// a single byte of the text (code) segment.
pub type Byte = u8;

/// the constant added to a heap-array slot index to produce the word that
/// the operand stack, locals and saved frames actually carry around.
///
/// chosen (by the source this interpreter is modeled on) to be far outside
/// the range of integers ordinary arithmetic is expected to produce, so
/// that an accidental collision is unlikely. the collector does not
/// disambiguate references from look-alike integers; see `ijvm-engine`'s
/// garbage collector for the consequences.
pub const INDICATOR: Word = 22_400_000;

/// size in bytes of one header field (`header`, `*_origin`, `*_size_bytes`)
/// in the on-disk image format.
pub const HEADER_FIELD_SIZE_IN_BYTES: usize = 4;
