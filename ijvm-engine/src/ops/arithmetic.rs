//! `NOP`, `BIPUSH`, `LDC_W`, `DUP`/`POP`/`SWAP`, and the binary integer
//! operators. All single-byte (no-immediate) opcodes here advance `pc` by
//! one even when their depth precondition fails — only opcodes that carry
//! an immediate operand withhold the `pc` advance on failure (see
//! `ops::locals`).

use crate::Interpreter;

pub fn nop(interp: &mut Interpreter) {
    interp.pc += 1;
}

pub fn bipush(interp: &mut Interpreter) {
    let value = interp.text_byte(interp.pc + 1) as i8 as i32;
    interp.stack.push(value);
    interp.pc += 2;
}

pub fn ldc_w(interp: &mut Interpreter) {
    let index = interp.short_arg_at(interp.pc + 1);
    interp.stack.push(interp.image.get_constant(index as usize));
    interp.pc += 3;
}

pub fn dup(interp: &mut Interpreter) {
    if let Some(top) = interp.stack.top() {
        interp.stack.push(top);
    }
    interp.pc += 1;
}

pub fn pop(interp: &mut Interpreter) {
    interp.stack.pop();
    interp.pc += 1;
}

pub fn swap(interp: &mut Interpreter) {
    if interp.stack.len() >= 2 {
        let b = interp.stack.pop().unwrap();
        let a = interp.stack.pop().unwrap();
        interp.stack.push(b);
        interp.stack.push(a);
    }
    interp.pc += 1;
}

pub fn iadd(interp: &mut Interpreter) {
    binary_op(interp, i32::wrapping_add);
}

pub fn isub(interp: &mut Interpreter) {
    binary_op(interp, i32::wrapping_sub);
}

pub fn iand(interp: &mut Interpreter) {
    binary_op(interp, |a, b| a & b);
}

pub fn ior(interp: &mut Interpreter) {
    binary_op(interp, |a, b| a | b);
}

fn binary_op(interp: &mut Interpreter, f: impl Fn(i32, i32) -> i32) {
    if interp.stack.len() >= 2 {
        let b = interp.stack.pop().unwrap();
        let a = interp.stack.pop().unwrap();
        interp.stack.push(f(a, b));
    }
    interp.pc += 1;
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;
    use ijvm_image::BinaryImage;

    fn interp_with_text(text: &[u8]) -> Interpreter {
        let mut interp = Interpreter::new();
        interp.load_image(BinaryImage::from_parts(0, vec![], text.to_vec()));
        interp
    }

    #[test]
    fn bipush_sign_extends() {
        let mut interp = interp_with_text(&[0x10, 0xFF]);
        super::bipush(&mut interp);
        assert_eq!(interp.stack.pop(), Some(-1));
        assert_eq!(interp.pc, 2);
    }

    #[test]
    fn iadd_is_a_no_op_under_one_operand() {
        let mut interp = interp_with_text(&[0x60]);
        interp.stack.push(5);
        super::iadd(&mut interp);
        assert_eq!(interp.stack.len(), 1);
        assert_eq!(interp.pc, 1);
    }

    #[test]
    fn iadd_pops_two_and_pushes_sum() {
        let mut interp = interp_with_text(&[0x60]);
        interp.stack.push(5);
        interp.stack.push(7);
        super::iadd(&mut interp);
        assert_eq!(interp.stack.pop(), Some(12));
    }

    #[test]
    fn swap_reverses_top_two() {
        let mut interp = interp_with_text(&[0x5F]);
        interp.stack.push(1);
        interp.stack.push(2);
        super::swap(&mut interp);
        assert_eq!(interp.stack.top_n(2), &[2, 1]);
    }
}
