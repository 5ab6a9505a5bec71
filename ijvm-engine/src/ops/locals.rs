//! `ILOAD`, `ISTORE`, `IINC`, and the `WIDE` prefix that widens their index
//! operand from one byte to two.
//!
//! Each handler comes in a plain and a `_wide` form differing only in
//! where the index is read from and how far `pc` advances; `wide` reads
//! the next opcode byte and redispatches to the matching `_wide` form.

use crate::Interpreter;
use ijvm_isa::opcode::Opcode;

pub fn iload(interp: &mut Interpreter) {
    let index = interp.text_byte(interp.pc + 1) as usize;
    do_iload(interp, index, 2);
}

pub fn iload_wide(interp: &mut Interpreter) {
    let index = interp.wide_index_at(interp.pc + 1);
    do_iload(interp, index, 3);
}

fn do_iload(interp: &mut Interpreter, index: usize, advance: usize) {
    if let Some(value) = interp.locals.get(index) {
        interp.stack.push(value);
        interp.pc += advance;
    }
}

pub fn istore(interp: &mut Interpreter) {
    let index = interp.text_byte(interp.pc + 1) as usize;
    do_istore(interp, index, 2);
}

pub fn istore_wide(interp: &mut Interpreter) {
    let index = interp.wide_index_at(interp.pc + 1);
    do_istore(interp, index, 3);
}

fn do_istore(interp: &mut Interpreter, index: usize, advance: usize) {
    if let Some(value) = interp.stack.pop() {
        interp.locals.store_growing(index, value);
        interp.pc += advance;
    }
}

pub fn iinc(interp: &mut Interpreter) {
    let index = interp.text_byte(interp.pc + 1) as usize;
    let delta = interp.text_byte(interp.pc + 2) as i8;
    do_iinc(interp, index, delta, 3);
}

pub fn iinc_wide(interp: &mut Interpreter) {
    let index = interp.wide_index_at(interp.pc + 1);
    let delta = interp.text_byte(interp.pc + 3) as i8;
    do_iinc(interp, index, delta, 4);
}

fn do_iinc(interp: &mut Interpreter, index: usize, delta: i8, advance: usize) {
    if index < interp.locals.len() {
        interp.locals.inc_if_present(index, delta);
        interp.pc += advance;
    }
}

/// `WIDE`: peek the opcode it prefixes and redispatch to that opcode's
/// widened handler. A byte other than `ILOAD`/`ISTORE`/`IINC` here is a
/// malformed image; rather than trust that the dispatcher never hands it
/// one (see `Opcode::is_wideable`), this handles it the same way the
/// source's `wide_func` does — silently, by logging and halting, not
/// panicking.
pub fn wide(interp: &mut Interpreter) {
    let prefixed = Opcode::try_from(interp.text_byte(interp.pc + 1)).ok();
    // the WIDE byte itself is consumed by shifting every subsequent read
    // one byte later; the widened handlers are written in terms of
    // `pc + 1` being the *prefixed* opcode's own address.
    interp.pc += 1;
    match prefixed {
        Some(Opcode::ILOAD) => iload_wide(interp),
        Some(Opcode::ISTORE) => istore_wide(interp),
        Some(Opcode::IINC) => iinc_wide(interp),
        other => {
            tracing::warn!(?other, pc = interp.pc, "WIDE prefixing a non-wideable opcode; halting");
            interp.halt();
        }
    }
}
