//! `INVOKEVIRTUAL`, `IRETURN`, `TAILCALL`.
//!
//! A call transfers the top `arg_count` operand-stack words into the
//! callee's fresh locals frame (the first of which is conventionally an
//! object reference, though nothing here inspects it), saves the caller's
//! locals and return address, and jumps past the callee's two-field
//! method header. Return reverses all of that except the frame size; a
//! tail call does only the jump-and-frame-install half, reusing the
//! current invocation's saved return info.

use crate::Interpreter;

pub fn invokevirtual(interp: &mut Interpreter) {
    let opcode_pc = interp.pc;
    let (target, arg_count) = resolve_target(interp, opcode_pc);

    if interp.stack.len() < arg_count {
        return;
    }

    let saved_frame = interp.locals.snapshot();
    let return_address = opcode_pc + 3;
    let saved_depth = interp.stack.len() - arg_count;

    install_callee_frame(interp, target, arg_count);

    interp.call_stack.push_invocation(saved_frame, return_address, saved_depth);
    tracing::debug!(callee = interp.pc, depth = interp.call_stack.depth(), "invokevirtual");
}

pub fn tailcall(interp: &mut Interpreter) {
    let (target, arg_count) = resolve_target(interp, interp.pc);

    if interp.stack.len() < arg_count {
        return;
    }

    install_callee_frame(interp, target, arg_count);
    tracing::debug!(callee = interp.pc, "tailcall");
}

/// steps 3-4 of `INVOKEVIRTUAL`: resolve the target through the constant
/// pool and read its `arg_count` header field, without touching the
/// operand stack yet — the caller checks `arg_count` against the current
/// stack depth before committing to the call.
fn resolve_target(interp: &Interpreter, opcode_pc: usize) -> (usize, usize) {
    let const_index = interp.short_arg_at(opcode_pc + 1);
    let target = interp.image.get_constant(const_index as usize) as usize;
    let arg_count = interp.text_u16_at(target) as usize;
    (target, arg_count)
}

/// steps 5-9 of `INVOKEVIRTUAL`: read the callee's `local_count` header
/// field, transfer arguments into a fresh locals frame, and land `pc` on
/// the first body instruction.
fn install_callee_frame(interp: &mut Interpreter, target: usize, arg_count: usize) {
    let local_count = interp.text_u16_at(target + 2) as usize;
    let frame_size = arg_count.max(local_count);

    let args = interp.stack.top_n(arg_count).to_vec();
    interp.stack.truncate_by(arg_count);
    interp.locals.replace_with(&args, frame_size);

    interp.pc = target + 4;
}

pub fn ireturn(interp: &mut Interpreter) {
    let Some((saved_frame, return_address, saved_depth)) = interp.call_stack.pop_invocation() else {
        return;
    };
    let return_value = interp.stack.top().unwrap_or(0);

    interp.stack.resize(saved_depth + 1);
    interp.stack.set(saved_depth, return_value);
    interp.locals.restore(saved_frame);
    interp.pc = return_address;
    tracing::debug!(to = return_address, depth = interp.call_stack.depth(), "ireturn");
}
