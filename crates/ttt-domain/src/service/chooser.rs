//! Slot Chooser - The randomness port
//!
//! The automated opponent needs one uniform pick per move. The source of
//! randomness is injected so the domain stays dependency-free and tests
//! can script the opponent.

/// Picks an index uniformly from `0..len`
pub trait SlotChooser {
    /// `len` is always at least 1
    fn choose_index(&mut self, len: usize) -> usize;
}

impl<C: SlotChooser + ?Sized> SlotChooser for &mut C {
    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }
}

impl<C: SlotChooser + ?Sized> SlotChooser for Box<C> {
    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }
}
