use std::{
	alloc::{self, Layout},
	any::type_name,
	marker::PhantomData,
	mem,
	ptr::NonNull,
};

use crate::debug::error::VectorError;

// === RawBuf === //

/// An exclusively owned heap block with room for `cap` values of type `T`.
///
/// The buffer never reads, writes, or drops its slots. Tracking which of them are initialized is
/// entirely the owner's job.
///
/// Zero-sized element types never touch the allocator. Their capacity is whatever was last
/// requested.
pub struct RawBuf<T> {
	ptr: NonNull<T>,
	cap: usize,
	_ty: PhantomData<T>,
}

// Safety: `RawBuf` owns its block uniquely, just like a `Box<[T]>` would.
unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
	const IS_ZST: bool = mem::size_of::<T>() == 0;

	pub const fn dangling() -> Self {
		Self {
			ptr: NonNull::dangling(),
			cap: 0,
			_ty: PhantomData,
		}
	}

	pub fn try_allocate(cap: usize) -> Result<Self, VectorError> {
		let mut buf = Self::dangling();
		if cap > 0 {
			buf.try_grow_to(cap)?;
		}
		Ok(buf)
	}

	pub fn cap(&self) -> usize {
		self.cap
	}

	/// Whether this buffer currently holds a block obtained from the global allocator.
	pub fn is_allocated(&self) -> bool {
		!Self::IS_ZST && self.cap > 0
	}

	pub fn as_ptr(&self) -> *mut T {
		self.ptr.as_ptr()
	}

	fn layout_for(cap: usize) -> Result<Layout, VectorError> {
		Layout::array::<T>(cap).map_err(|_| {
			log::debug!(
				"Storage for {cap} element(s) of type {} exceeds the maximum layout size.",
				type_name::<T>(),
			);
			VectorError::allocation_failure::<T>(cap)
		})
	}

	/// Grows the block to exactly `new_cap` slots, preserving the contents of the existing slots.
	///
	/// On failure, the buffer is left untouched.
	pub fn try_grow_to(&mut self, new_cap: usize) -> Result<(), VectorError> {
		debug_assert!(new_cap > self.cap);

		if Self::IS_ZST {
			self.cap = new_cap;
			return Ok(());
		}

		let new_layout = Self::layout_for(new_cap)?;
		let new_ptr = if self.cap == 0 {
			// Safety: `new_layout` has a non-zero size since `T` is not zero-sized and `new_cap > 0`.
			unsafe { alloc::alloc(new_layout) }
		} else {
			// Safety: `ptr` was allocated by the global allocator with exactly this layout and
			// `new_layout.size()` was validated by `Layout::array` not to overflow `isize`.
			unsafe { alloc::realloc(self.ptr.as_ptr().cast(), self.layout(), new_layout.size()) }
		};

		let Some(new_ptr) = NonNull::new(new_ptr.cast::<T>()) else {
			log::debug!(
				"Allocator refused a block of {} byte(s) for {new_cap} element(s) of type {}.",
				new_layout.size(),
				type_name::<T>(),
			);
			return Err(VectorError::allocation_failure::<T>(new_cap));
		};

		log::trace!(
			"Grew storage for {} from {} to {new_cap} slot(s).",
			type_name::<T>(),
			self.cap,
		);

		self.ptr = new_ptr;
		self.cap = new_cap;
		Ok(())
	}

	/// Returns the block to the allocator and resets the buffer to its dangling state. Slots are
	/// not dropped.
	pub fn free(&mut self) {
		if self.is_allocated() {
			// Safety: the block was allocated with exactly this layout.
			unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), self.layout()) };

			log::trace!(
				"Freed storage of {} slot(s) for {}.",
				self.cap,
				type_name::<T>(),
			);
		}

		self.ptr = NonNull::dangling();
		self.cap = 0;
	}

	fn layout(&self) -> Layout {
		// Safety: a layout for `cap` elements was successfully created when the block was
		// allocated so this size cannot overflow.
		unsafe {
			Layout::from_size_align_unchecked(mem::size_of::<T>() * self.cap, mem::align_of::<T>())
		}
	}
}

impl<T> Drop for RawBuf<T> {
	fn drop(&mut self) {
		self.free();
	}
}

// === Tests === //

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn allocates_and_grows() {
		let mut buf = RawBuf::<u64>::try_allocate(3).unwrap();
		assert_eq!(buf.cap(), 3);
		assert!(buf.is_allocated());
		assert_eq!(buf.as_ptr() as usize % mem::align_of::<u64>(), 0);

		unsafe {
			for i in 0..3 {
				buf.as_ptr().add(i).write(i as u64 * 10);
			}
		}

		buf.try_grow_to(8).unwrap();
		assert_eq!(buf.cap(), 8);

		unsafe {
			for i in 0..3 {
				assert_eq!(buf.as_ptr().add(i).read(), i as u64 * 10);
			}
		}

		buf.free();
		assert_eq!(buf.cap(), 0);
		assert!(!buf.is_allocated());

		// Freeing twice is harmless.
		buf.free();
	}

	#[test]
	fn empty_buffer_never_allocates() {
		let buf = RawBuf::<String>::try_allocate(0).unwrap();
		assert_eq!(buf.cap(), 0);
		assert!(!buf.is_allocated());
	}

	#[test]
	fn zero_sized_types_skip_the_allocator() {
		let mut buf = RawBuf::<()>::try_allocate(16).unwrap();
		assert_eq!(buf.cap(), 16);
		assert!(!buf.is_allocated());

		buf.try_grow_to(usize::MAX).unwrap();
		assert_eq!(buf.cap(), usize::MAX);
	}

	#[test]
	fn oversized_requests_fail_cleanly() {
		let err = RawBuf::<u64>::try_allocate(usize::MAX).err().unwrap();
		assert_eq!(
			err,
			VectorError::AllocationFailure {
				type_name: type_name::<u64>(),
				count: usize::MAX,
			}
		);

		let mut buf = RawBuf::<u64>::try_allocate(2).unwrap();
		assert!(buf.try_grow_to(usize::MAX / 2).is_err());
		assert_eq!(buf.cap(), 2);
		assert!(buf.is_allocated());
	}
}
