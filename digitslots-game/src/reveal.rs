//! Cosmetic digit flicker shown before a spin settles.
//!
//! The outcome is fixed before the first frame; frames never feed back into
//! the account.
use crate::spin::SpinSource;

/// Yields `frames` rows of random digits followed by the settled digits.
pub struct Flicker<'a, R: SpinSource + ?Sized> {
    settled: &'a [u8],
    source: &'a mut R,
    remaining: usize,
    finished: bool,
}

impl<'a, R: SpinSource + ?Sized> Flicker<'a, R> {
    pub fn new(settled: &'a [u8], frames: usize, source: &'a mut R) -> Self {
        Self {
            settled,
            source,
            remaining: frames,
            finished: false,
        }
    }
}

impl<R: SpinSource + ?Sized> Iterator for Flicker<'_, R> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            let source = &mut *self.source;
            return Some(self.settled.iter().map(|_| source.next_digit()).collect());
        }
        self.finished = true;
        Some(self.settled.to_vec())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.finished { 0 } else { self.remaining + 1 };
        (left, Some(left))
    }
}

impl<R: SpinSource + ?Sized> ExactSizeIterator for Flicker<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn flicker_settles_on_the_outcome() {
        let settled = [4, 2, 9];
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let frames: Vec<Vec<u8>> = Flicker::new(&settled, 5, &mut rng).collect();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames.last().unwrap(), &settled.to_vec());
        for frame in &frames {
            assert_eq!(frame.len(), 3);
            assert!(frame.iter().all(|d| (1..=9).contains(d)));
        }
    }

    #[test]
    fn zero_frames_is_just_the_result() {
        let settled = [1];
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut flicker = Flicker::new(&settled, 0, &mut rng);
        assert_eq!(flicker.len(), 1);
        assert_eq!(flicker.next(), Some(vec![1]));
        assert_eq!(flicker.next(), None);
    }
}
