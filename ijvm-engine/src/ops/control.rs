//! `GOTO` and the conditional branches. A branch's offset is relative to
//! its own opcode address, not to the operand that follows it.

use crate::Interpreter;

pub fn goto(interp: &mut Interpreter) {
    let offset = interp.short_arg_at(interp.pc + 1);
    interp.pc = (interp.pc as i32 + offset) as usize;
}

pub fn ifeq(interp: &mut Interpreter) {
    branch_if(interp, |v| v == 0);
}

pub fn iflt(interp: &mut Interpreter) {
    branch_if(interp, |v| v < 0);
}

pub fn if_icmpeq(interp: &mut Interpreter) {
    if interp.stack.len() < 2 {
        return;
    }
    let opcode_pc = interp.pc;
    let b = interp.stack.pop().unwrap();
    let a = interp.stack.pop().unwrap();
    interp.pc = if a == b {
        let offset = interp.short_arg_at(opcode_pc + 1);
        (opcode_pc as i32 + offset) as usize
    } else {
        opcode_pc + 3
    };
}

fn branch_if(interp: &mut Interpreter, cond: impl Fn(i32) -> bool) {
    if interp.stack.is_empty() {
        return;
    }
    let opcode_pc = interp.pc;
    let value = interp.stack.pop().unwrap();
    interp.pc = if cond(value) {
        let offset = interp.short_arg_at(opcode_pc + 1);
        (opcode_pc as i32 + offset) as usize
    } else {
        opcode_pc + 3
    };
}
