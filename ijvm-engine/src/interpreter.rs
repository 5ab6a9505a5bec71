//! The [`Interpreter`]: owns every piece of mutable VM state and drives
//! the fetch-dispatch-execute loop.

use ijvm_image::BinaryImage;
use ijvm_isa::opcode::{Opcode, UnknownOpcode};
use ijvm_isa::Word;

use crate::call_stack::CallStack;
use crate::heap::HeapTable;
use crate::locals::LocalFrame;
use crate::ops::{arithmetic, arrays, calls, control, io, locals as local_ops};
use crate::stack::OperandStack;
use crate::streams::{InputStream, OutputStream, Stdin, Stdout};
use crate::trap::Trap;

/// the whole machine: program image, registers, auxiliary stacks, the
/// heap, and the byte streams it talks to the outside world through.
///
/// Built with [`Interpreter::new`], loaded with [`Interpreter::init`],
/// then driven with [`Interpreter::step`] or [`Interpreter::run`].
pub struct Interpreter {
    pub(crate) image: BinaryImage,
    pub(crate) pc: usize,
    pub(crate) stack: OperandStack,
    pub(crate) locals: LocalFrame,
    pub(crate) call_stack: CallStack,
    pub(crate) heap: HeapTable,
    pub(crate) input: Box<dyn InputStream>,
    pub(crate) output: Box<dyn OutputStream>,
    pub(crate) error_output: Box<dyn OutputStream>,
    trap: Option<Trap>,
}

impl Interpreter {
    /// a fresh interpreter with an empty program image and stdio streams.
    /// Call [`init`](Self::init) before [`run`](Self::run)ning it.
    pub fn new() -> Self {
        Self {
            image: BinaryImage::from_parts(0, Vec::new(), Vec::new()),
            pc: 0,
            stack: OperandStack::new(),
            locals: LocalFrame::new(),
            call_stack: CallStack::new(),
            heap: HeapTable::new(),
            input: Box::new(Stdin::new()),
            output: Box::new(Stdout::new(std::io::stdout())),
            error_output: Box::new(Stdout::new(std::io::stderr())),
            trap: None,
        }
    }

    /// install the stream `IN` reads from.
    pub fn set_input(&mut self, stream: Box<dyn InputStream>) {
        self.input = stream;
    }

    /// install the stream `OUT` writes to.
    pub fn set_output(&mut self, stream: Box<dyn OutputStream>) {
        self.output = stream;
    }

    /// install the stream array-bounds traps and `ERR` write to.
    pub fn set_error_output(&mut self, stream: Box<dyn OutputStream>) {
        self.error_output = stream;
    }

    /// parse `bytes` as a binary image and load it, resetting all VM
    /// state. Returns `0` on success and `-1` if `bytes` does not parse,
    /// matching the host API's C-derived status convention; the
    /// underlying [`ijvm_image::ImageError`] is logged, not returned,
    /// since that richer detail is this crate's own concern and not part
    /// of the cross-language host contract.
    pub fn init(&mut self, bytes: &[u8]) -> i32 {
        match BinaryImage::parse(bytes) {
            Ok(image) => {
                self.load_image(image);
                0
            }
            Err(err) => {
                tracing::warn!(%err, "failed to load image");
                -1
            }
        }
    }

    /// install an already-built [`BinaryImage`], resetting every piece of
    /// VM state that belongs to the previous program. A lower-level
    /// sibling of [`init`](Self::init) for embedders and tests that
    /// assemble a program in memory rather than reading its on-disk
    /// bytes.
    pub fn load_image(&mut self, image: BinaryImage) {
        self.image = image;
        self.pc = 0;
        self.stack = OperandStack::new();
        self.locals = LocalFrame::new();
        self.call_stack = CallStack::new();
        self.heap = HeapTable::new();
        self.trap = None;
    }

    /// release all owned memory. Idempotent; in this implementation that
    /// memory is ordinary heap-allocated Rust state, so this just resets
    /// the interpreter to the same state [`Drop`] would leave behind —
    /// kept as an explicit method for host-API parity rather than
    /// because anything here needs manual teardown.
    pub fn destroy(&mut self) {
        *self = Self::new();
    }

    /// execute one opcode. A no-op once [`finished`](Self::finished).
    pub fn step(&mut self) {
        if self.finished() {
            return;
        }
        let byte = self.text_byte(self.pc);
        match Opcode::try_from(byte) {
            Ok(op) => self.dispatch(op),
            Err(UnknownOpcode(byte)) => {
                tracing::warn!(byte, pc = self.pc, "unknown opcode; halting");
                self.halt();
            }
        }
    }

    /// step until [`finished`](Self::finished).
    pub fn run(&mut self) {
        while !self.finished() {
            self.step();
        }
    }

    /// `true` once the program counter has run off the end of `text`.
    pub fn finished(&self) -> bool {
        self.pc >= self.image.text_len()
    }

    pub fn get_program_counter(&self) -> usize {
        self.pc
    }

    /// top of the operand stack; `0` if empty (the contract leaves this
    /// undefined, and this implementation's choice of default is not
    /// something a well-formed program can observe).
    pub fn tos(&self) -> Word {
        self.stack.top().unwrap_or(0)
    }

    pub fn get_local_variable(&self, index: usize) -> Word {
        self.locals.get(index).unwrap_or(0)
    }

    pub fn get_instruction(&self) -> u8 {
        if self.finished() {
            0
        } else {
            self.text_byte(self.pc)
        }
    }

    pub fn get_text(&self) -> &[u8] {
        self.image.text()
    }

    pub fn get_text_size(&self) -> usize {
        self.image.text_len()
    }

    pub fn get_constant(&self, index: usize) -> Word {
        self.image.get_constant(index)
    }

    /// call-depth as `|D| - 1`, preserved from the source for host
    /// compatibility; the true number of pending invocations is this
    /// value plus one whenever it's nonnegative.
    pub fn get_call_stack_size(&self) -> isize {
        self.call_stack.reported_depth()
    }

    pub fn is_heap_freed(&self, reference: Word) -> bool {
        match crate::heap::HeapRef::from_word(reference) {
            Some(r) => self.heap.is_freed(r.slot()),
            None => false,
        }
    }

    /// the trap (array-bounds failure or explicit `ERR`) that halted
    /// execution, if any. Cleared by the next [`load_image`](Self::load_image).
    pub fn last_trap(&self) -> Option<Trap> {
        self.trap
    }

    pub(crate) fn halt(&mut self) {
        self.pc = self.image.text_len();
    }

    pub(crate) fn raise(&mut self, trap: Trap) {
        self.trap = Some(trap);
        self.halt();
    }

    pub(crate) fn text_byte(&self, offset: usize) -> u8 {
        self.image.text()[offset]
    }

    /// signed 16-bit big-endian immediate at `offset`, sign-extended to
    /// `Word`. Used by the control-flow and call opcodes.
    pub(crate) fn short_arg_at(&self, offset: usize) -> Word {
        let raw = ((self.text_byte(offset) as u16) << 8) | self.text_byte(offset + 1) as u16;
        raw as i16 as Word
    }

    /// unsigned 16-bit big-endian value at `offset`. Used to read a
    /// callee's `arg_count`/`local_count` method-header fields.
    pub(crate) fn text_u16_at(&self, offset: usize) -> u16 {
        ((self.text_byte(offset) as u16) << 8) | self.text_byte(offset + 1) as u16
    }

    /// unsigned 16-bit big-endian index at `offset`, as produced by a
    /// `WIDE`-promoted `ILOAD`/`ISTORE`/`IINC`.
    pub(crate) fn wide_index_at(&self, offset: usize) -> usize {
        self.text_u16_at(offset) as usize
    }

    fn dispatch(&mut self, op: Opcode) {
        tracing::trace!(?op, pc = self.pc, "dispatch");
        match op {
            Opcode::NOP => arithmetic::nop(self),
            Opcode::BIPUSH => arithmetic::bipush(self),
            Opcode::LDC_W => arithmetic::ldc_w(self),
            Opcode::DUP => arithmetic::dup(self),
            Opcode::POP => arithmetic::pop(self),
            Opcode::SWAP => arithmetic::swap(self),
            Opcode::IADD => arithmetic::iadd(self),
            Opcode::ISUB => arithmetic::isub(self),
            Opcode::IAND => arithmetic::iand(self),
            Opcode::IOR => arithmetic::ior(self),
            Opcode::GOTO => control::goto(self),
            Opcode::IFEQ => control::ifeq(self),
            Opcode::IFLT => control::iflt(self),
            Opcode::IF_ICMPEQ => control::if_icmpeq(self),
            Opcode::ILOAD => local_ops::iload(self),
            Opcode::ISTORE => local_ops::istore(self),
            Opcode::IINC => local_ops::iinc(self),
            Opcode::WIDE => local_ops::wide(self),
            Opcode::INVOKEVIRTUAL => calls::invokevirtual(self),
            Opcode::IRETURN => calls::ireturn(self),
            Opcode::TAILCALL => calls::tailcall(self),
            Opcode::NEWARRAY => arrays::newarray(self),
            Opcode::IALOAD => arrays::iaload(self),
            Opcode::IASTORE => arrays::iastore(self),
            Opcode::GC => arrays::gc_trigger(self),
            Opcode::IN => io::in_op(self),
            Opcode::OUT => io::out_op(self),
            Opcode::ERR => io::err_op(self),
            Opcode::HALT => io::halt(self),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
