//! `NEWARRAY`, `IALOAD`, `IASTORE`, and the `GC` trigger.

use crate::trap::Trap;
use crate::Interpreter;
use ijvm_isa::INDICATOR;

pub fn newarray(interp: &mut Interpreter) {
    let Some(count) = interp.stack.pop() else {
        return;
    };
    let reference = interp.heap.allocate(count.max(0) as usize);
    interp.stack.push(reference.0);
    interp.pc += 1;
}

pub fn iaload(interp: &mut Interpreter) {
    if interp.stack.len() < 2 {
        return;
    }
    let reference = interp.stack.pop().unwrap();
    let index = interp.stack.pop().unwrap();

    match resolve(interp, reference, index) {
        Ok((slot, idx)) => {
            let value = interp.heap.get(slot).unwrap()[idx];
            interp.stack.push(value);
            interp.pc += 1;
        }
        Err(trap) => interp.raise(trap),
    }
}

pub fn iastore(interp: &mut Interpreter) {
    if interp.stack.len() < 3 {
        return;
    }
    let reference = interp.stack.pop().unwrap();
    let index = interp.stack.pop().unwrap();
    let value = interp.stack.pop().unwrap();

    match resolve(interp, reference, index) {
        Ok((slot, idx)) => {
            interp.heap.get_mut(slot).unwrap()[idx] = value;
            interp.pc += 1;
        }
        Err(trap) => interp.raise(trap),
    }
}

/// validate `reference`/`index` against the heap table and return the
/// `(slot, index)` pair to index with, or the trap to raise. A
/// `reference` that isn't actually a live array's tagged address (too
/// small, too large, or already freed) resolves to a zero-length array,
/// so any index on it traps the same way an ordinary out-of-bounds
/// access would, rather than panicking on the malformed input.
fn resolve(interp: &Interpreter, reference: i32, index: i32) -> Result<(usize, usize), Trap> {
    let slot = reference.wrapping_sub(INDICATOR);
    let slot = usize::try_from(slot).unwrap_or(usize::MAX);
    let len = interp.heap.get(slot).map_or(0, <[_]>::len);
    if index < 0 || index as usize >= len {
        tracing::warn!(reference, index, len, "array index out of bounds");
        return Err(Trap::ArrayIndexOutOfBounds { reference, index, len });
    }
    Ok((slot, index as usize))
}

pub fn gc_trigger(interp: &mut Interpreter) {
    tracing::debug!("running garbage collection");
    crate::gc::collect(&mut interp.heap, &interp.stack, &interp.locals, &interp.call_stack);
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
    fn newarray_allocates_and_pushes_a_reference() {
        let mut interp = interp_with_text(&[0xD1]);
        interp.stack.push(3);
        super::newarray(&mut interp);
        let reference = interp.stack.pop().unwrap();
        assert!(reference >= ijvm_isa::INDICATOR);
    }

    #[test]
    fn iastore_then_iaload_round_trips() {
        let mut interp = interp_with_text(&[0xD3, 0xD2]);
        interp.stack.push(3);
        super::newarray(&mut interp);
        let reference = interp.stack.pop().unwrap();

        interp.stack.push(7); // value
        interp.stack.push(0); // index
        interp.stack.push(reference);
        super::iastore(&mut interp);

        interp.stack.push(0); // index
        interp.stack.push(reference);
        super::iaload(&mut interp);
        assert_eq!(interp.stack.pop(), Some(7));
    }

    #[test]
    fn iaload_out_of_bounds_traps_and_halts() {
        let mut interp = interp_with_text(&[0xD1, 0xD2]);
        interp.stack.push(1);
        super::newarray(&mut interp);
        let reference = interp.stack.pop().unwrap();

        interp.stack.push(5); // out-of-bounds index
        interp.stack.push(reference);
        super::iaload(&mut interp);

        assert!(interp.finished());
        assert!(matches!(interp.last_trap(), Some(crate::Trap::ArrayIndexOutOfBounds { .. })));
    }
}
