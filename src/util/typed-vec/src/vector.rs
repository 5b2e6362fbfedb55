use std::{
	any::type_name,
	fmt,
	mem::ManuallyDrop,
	ops::{Index, IndexMut},
	ptr, slice,
};

use crate::{
	debug::{
		error::{ResultExt, VectorError},
		render::{Render, Rendered, VectorDisplay},
	},
	mem::raw::RawBuf,
};

// === Growth policy === //

/// The smallest non-zero capacity `push` and `reserve` will grow to.
pub const MIN_NON_ZERO_CAP: usize = 4;

/// Computes the capacity to grow to when `required` slots are needed but only `cap` exist.
pub fn amortized_capacity(cap: usize, required: usize) -> usize {
	required.max(cap.saturating_mul(2)).max(MIN_NON_ZERO_CAP)
}

// === Vector === //

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
enum VectorState {
	Live,
	Released,
}

/// A growable, contiguous, heap-allocated sequence of `T`.
///
/// ## Invariants
///
/// - The first `len` slots of `buf` are initialized. Slots `len..buf.cap()` are not and are never
///   read.
/// - `len <= buf.cap()`. Capacity only changes when growing or releasing.
/// - Once `state` is `Released`, `len == 0` and `buf` owns no block.
///
pub struct Vector<T> {
	buf: RawBuf<T>,
	len: usize,
	state: VectorState,
}

impl<T> Vector<T> {
	// --- Construction --- //

	/// Creates an empty vector without allocating.
	pub const fn new() -> Self {
		Self {
			buf: RawBuf::dangling(),
			len: 0,
			state: VectorState::Live,
		}
	}

	/// Creates an empty vector with room for exactly `cap` elements.
	pub fn try_with_capacity(cap: usize) -> Result<Self, VectorError> {
		Ok(Self {
			buf: RawBuf::try_allocate(cap)?,
			len: 0,
			state: VectorState::Live,
		})
	}

	/// Builds a vector holding `values` in order, with `len() == capacity() == N`.
	///
	/// If the block cannot be allocated, `values` are dropped and the error is returned.
	pub fn from_values<const N: usize>(values: [T; N]) -> Result<Self, VectorError> {
		let mut vec = Self::try_with_capacity(N)?;
		let values = ManuallyDrop::new(values);

		// Safety: the buffer has room for `N` elements and does not overlap the array. The array is
		// wrapped in `ManuallyDrop` so every value is moved exactly once.
		unsafe {
			ptr::copy_nonoverlapping(values.as_ptr(), vec.buf.as_ptr(), N);
		}
		vec.len = N;

		log::trace!("Constructed a vector of {N} {}(s).", type_name::<T>());
		Ok(vec)
	}

	/// Builds a vector from an iterator that knows its length up front.
	///
	/// Storage for the reported length is allocated once. Surplus items are left in the iterator
	/// and a short iterator leaves the vector with fewer live elements than its capacity.
	pub fn try_from_exact<I>(values: I) -> Result<Self, VectorError>
	where
		I: IntoIterator,
		I::IntoIter: ExactSizeIterator<Item = T>,
	{
		let mut values = values.into_iter();
		let mut vec = Self::try_with_capacity(values.len())?;

		// If `next` panics, the vector's destructor drops the elements written so far.
		while vec.len < vec.buf.cap() {
			let Some(value) = values.next() else {
				break;
			};

			// Safety: `len < cap`, so the slot is allocated and uninitialized.
			unsafe { vec.buf.as_ptr().add(vec.len).write(value) };
			vec.len += 1;
		}

		if vec.len < vec.buf.cap() {
			log::debug!(
				"Iterator of {} reported {} item(s) but only produced {}.",
				type_name::<T>(),
				vec.buf.cap(),
				vec.len,
			);
		}

		Ok(vec)
	}

	// --- Inspection --- //

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn capacity(&self) -> usize {
		self.buf.cap()
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn is_released(&self) -> bool {
		self.state == VectorState::Released
	}

	fn ensure_live(&self) -> Result<(), VectorError> {
		match self.state {
			VectorState::Live => Ok(()),
			VectorState::Released => Err(VectorError::UseAfterRelease),
		}
	}

	fn ensure_in_bounds(&self, index: usize) -> Result<(), VectorError> {
		self.ensure_live()?;

		if index < self.len {
			Ok(())
		} else {
			Err(VectorError::IndexOutOfBounds {
				index,
				length: self.len,
			})
		}
	}

	fn live_slice(&self) -> &[T] {
		// Safety: the first `len` slots are initialized and `buf.as_ptr()` is non-null and aligned
		// even when nothing is allocated.
		unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
	}

	// --- Indexed access --- //

	pub fn at(&self, index: usize) -> Result<&T, VectorError> {
		self.ensure_in_bounds(index)?;

		// Safety: `index < len`.
		Ok(unsafe { &*self.buf.as_ptr().add(index) })
	}

	/// Fetches a mutable reference to the element at `index`. Assigning through it drops the old
	/// value in place.
	pub fn at_mut(&mut self, index: usize) -> Result<&mut T, VectorError> {
		self.ensure_in_bounds(index)?;

		// Safety: `index < len` and we hold a unique borrow of the vector.
		Ok(unsafe { &mut *self.buf.as_ptr().add(index) })
	}

	/// Stores `value` at `index`, returning the value it displaced.
	pub fn replace(&mut self, index: usize, value: T) -> Result<T, VectorError> {
		Ok(std::mem::replace(self.at_mut(index)?, value))
	}

	// --- Mutation --- //

	/// Removes the last element and returns it. Capacity is retained.
	pub fn pop(&mut self) -> Result<T, VectorError> {
		self.ensure_live()?;

		if self.len == 0 {
			return Err(VectorError::EmptyContainer);
		}

		self.len -= 1;

		// Safety: the slot at the old `len - 1` was initialized and is now outside of the live
		// range so it will never be read or dropped again.
		Ok(unsafe { self.buf.as_ptr().add(self.len).read() })
	}

	/// Ensures room for at least `additional` more elements, growing according to
	/// [`amortized_capacity`].
	pub fn reserve(&mut self, additional: usize) -> Result<(), VectorError> {
		self.ensure_live()?;

		let cap = self.buf.cap();
		let Some(required) = self.len.checked_add(additional) else {
			return Err(VectorError::allocation_failure::<T>(usize::MAX));
		};

		if required <= cap {
			return Ok(());
		}

		self.buf.try_grow_to(amortized_capacity(cap, required))
	}

	/// Appends `value` to the end of the vector, growing the storage if it is full.
	///
	/// If growing fails, `value` is dropped and the vector is left unchanged.
	pub fn push(&mut self, value: T) -> Result<(), VectorError> {
		self.ensure_live()?;

		if self.len == self.buf.cap() {
			self.reserve(1)?;
		}

		// Safety: `len < cap` after reserving.
		unsafe { self.buf.as_ptr().add(self.len).write(value) };
		self.len += 1;

		Ok(())
	}

	// --- Teardown --- //

	/// Drops every live element, frees the storage, and poisons the vector so that every further
	/// operation reports [`VectorError::UseAfterRelease`].
	///
	/// Releasing an already-released vector does nothing.
	pub fn release(&mut self) {
		if self.is_released() {
			return;
		}

		let len = self.len;
		let cap = self.buf.cap();

		// Mark the vector as released before running element destructors so that a panicking
		// destructor cannot cause them to run twice.
		self.state = VectorState::Released;
		self.len = 0;

		// Safety: the first `len` slots were initialized and are no longer reachable.
		unsafe {
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.as_ptr(), len));
		}
		self.buf.free();

		log::trace!(
			"Released a vector of {len} {}(s) with capacity {cap}.",
			type_name::<T>(),
		);
	}

	// --- Diagnostics --- //

	/// Lists the live elements using the caller's `render` mapping.
	pub fn display_with<'a, F, R>(&'a self, render: F) -> VectorDisplay<'a, T, F>
	where
		F: Fn(&'a T) -> R,
		R: fmt::Display,
	{
		let elems = (!self.is_released()).then(|| self.live_slice());
		VectorDisplay::new(elems, render)
	}

	/// Lists the live elements using their [`Render`] implementation.
	pub fn display(&self) -> impl fmt::Display + '_
	where
		T: Render,
	{
		self.display_with(Rendered)
	}

	pub fn print_with<'a, F, R>(&'a self, render: F)
	where
		F: Fn(&'a T) -> R,
		R: fmt::Display,
	{
		println!("{}", self.display_with(render));
	}

	pub fn print(&self)
	where
		T: Render,
	{
		println!("{}", self.display());
	}
}

impl<T> Default for Vector<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Drop for Vector<T> {
	fn drop(&mut self) {
		self.release();
	}
}

impl<T> Index<usize> for Vector<T> {
	type Output = T;

	#[track_caller]
	fn index(&self, index: usize) -> &T {
		self.at(index).unwrap_pretty()
	}
}

impl<T> IndexMut<usize> for Vector<T> {
	#[track_caller]
	fn index_mut(&mut self, index: usize) -> &mut T {
		self.at_mut(index).unwrap_pretty()
	}
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Vector")
			.field("len", &self.len)
			.field("capacity", &self.buf.cap())
			.field("state", &self.state)
			.field("elems", &self.live_slice())
			.finish()
	}
}
