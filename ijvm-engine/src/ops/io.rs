//! `IN`, `OUT`, `ERR`, `HALT`.

use crate::Interpreter;

pub fn in_op(interp: &mut Interpreter) {
    let byte = interp.input.read_byte().unwrap_or(0);
    interp.stack.push(byte as i32);
    interp.pc += 1;
}

pub fn out_op(interp: &mut Interpreter) {
    if let Some(value) = interp.stack.pop() {
        interp.output.write_byte(value as u8);
    }
    interp.pc += 1;
}

pub fn err_op(interp: &mut Interpreter) {
    interp.error_output.write_bytes(b"ERROR\n");
    interp.raise(crate::Trap::ExplicitError);
}

pub fn halt(interp: &mut Interpreter) {
    interp.halt();
}

#[cfg(test)]
mod tests {
    use crate::streams::{BufferInput, SharedOutput};
    use crate::Interpreter;
    use ijvm_image::BinaryImage;

    fn interp_with_text(text: &[u8]) -> Interpreter {
        let mut interp = Interpreter::new();
        interp.load_image(BinaryImage::from_parts(0, vec![], text.to_vec()));
        interp
    }

    #[test]
    fn in_pushes_zero_at_end_of_stream() {
        let mut interp = interp_with_text(&[0xFC]);
        interp.set_input(Box::new(BufferInput::new(vec![])));
        super::in_op(&mut interp);
        assert_eq!(interp.stack.pop(), Some(0));
    }

    #[test]
    fn in_pushes_the_next_byte() {
        let mut interp = interp_with_text(&[0xFC]);
        interp.set_input(Box::new(BufferInput::new(vec![65])));
        super::in_op(&mut interp);
        assert_eq!(interp.stack.pop(), Some(65));
    }

    #[test]
    fn out_writes_the_low_byte() {
        let mut interp = interp_with_text(&[0xFD]);
        let output = SharedOutput::new();
        interp.set_output(Box::new(output.clone()));
        interp.stack.push(0x141);
        super::out_op(&mut interp);
        // low byte of 0x141 is 0x41 = 'A'
        assert_eq!(output.bytes(), vec![0x41]);
    }

    #[test]
    fn err_writes_error_and_halts() {
        let mut interp = interp_with_text(&[0xFE]);
        let error_output = SharedOutput::new();
        interp.set_error_output(Box::new(error_output.clone()));
        super::err_op(&mut interp);
        assert!(interp.finished());
        assert_eq!(interp.last_trap(), Some(crate::Trap::ExplicitError));
        assert_eq!(error_output.bytes(), b"ERROR\n");
    }
}
