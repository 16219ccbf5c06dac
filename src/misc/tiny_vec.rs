use std::{fmt::Debug, mem::MaybeUninit, ops::Deref};

/// Inline vector with a fixed capacity of `N` copyable elements.
///
/// Move lists never exceed one entry per pawn, so they live on the stack
/// instead of the heap.
#[derive(Clone, Copy)]
pub struct TinyVec<T, const N: usize>
where
    T: Copy,
{
    buf: [MaybeUninit<T>; N],
    len: u8,
}

impl<T, const N: usize> TinyVec<T, N>
where
    T: Copy,
{
    pub const fn new() -> Self {
        const { assert!(N <= 255, "TinyVec supports up to 255 elements") }
        TinyVec { buf: [const { MaybeUninit::uninit() }; N], len: 0 }
    }

    /// Panics when the vector is already full.
    pub fn push(&mut self, val: T) {
        assert!((self.len as usize) < N, "TinyVec capacity {N} exceeded");
        self.buf[self.len as usize].write(val);
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: previously pushed, so initialized
        Some(unsafe { self.buf[self.len as usize].assume_init_read() })
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let mut kept = TinyVec::new();
        for &item in self.iter() {
            if keep(&item) {
                kept.push(item);
            }
        }
        *self = kept;
    }
}

impl<T: Copy, const N: usize> Default for TinyVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> Deref for TinyVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: Only the first `self.len` elements are initialized
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr() as *const T, self.len as usize) }
    }
}

impl<T: Copy + PartialEq, const N: usize> PartialEq for TinyVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Copy + Eq, const N: usize> Eq for TinyVec<T, N> {}

impl<T: Copy + Debug, const N: usize> Debug for TinyVec<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Copy, const N: usize> FromIterator<T> for TinyVec<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = TinyVec::new();
        for item in iter {
            vec.push(item);
        }
        vec
    }
}

impl<'a, T: Copy, const N: usize> IntoIterator for &'a TinyVec<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_and_retain() {
        let mut v: TinyVec<u8, 4> = TinyVec::new();
        assert!(v.is_empty());
        v.push(1);
        v.push(2);
        v.push(3);
        assert_eq!(&*v, &[1, 2, 3]);
        v.retain(|&x| x != 2);
        assert_eq!(&*v, &[1, 3]);
        assert_eq!(v.pop(), Some(3));
        assert_eq!(v.len(), 1);
        v.clear();
        assert_eq!(v.pop(), None);
    }

    #[test]
    #[should_panic]
    fn push_beyond_capacity_panics() {
        let mut v: TinyVec<u8, 1> = TinyVec::new();
        v.push(1);
        v.push(2);
    }
}
