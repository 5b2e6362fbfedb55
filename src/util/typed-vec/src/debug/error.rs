//! The vector's error type and helpers for reporting it.

use std::{any::type_name, error::Error, fmt};

use derive_where::derive_where;
use thiserror::Error;

// === VectorError === //

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Error)]
pub enum VectorError {
	#[error("failed to allocate storage for {count} element(s) of type {type_name}")]
	AllocationFailure {
		type_name: &'static str,
		count: usize,
	},
	#[error("index {index} out of the vector bounds (length {length})")]
	IndexOutOfBounds { index: usize, length: usize },
	#[error("cannot pop from an empty vector")]
	EmptyContainer,
	#[error("vector was used after being released")]
	UseAfterRelease,
}

impl VectorError {
	pub fn allocation_failure<T>(count: usize) -> Self {
		Self::AllocationFailure {
			type_name: type_name::<T>(),
			count,
		}
	}
}

// === Error formatting === //

pub trait ErrorFormatExt: Error {
	fn format_error(&self) -> FormattedError<'_, Self> {
		FormattedError(self)
	}

	fn raise(&self) -> ! {
		panic!("{}", self.format_error());
	}

	fn log(&self, level: log::Level) {
		log::log!(level, "{}", self.format_error());
	}
}

impl<T: ?Sized + Error> ErrorFormatExt for T {}

#[derive_where(Copy, Clone)]
pub struct FormattedError<'a, T: ?Sized>(pub &'a T);

impl<T: ?Sized + Error> fmt::Display for FormattedError<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Error: {}", self.0)?;

		let mut cause_iter = self.0.source();
		if cause_iter.is_some() {
			write!(f, "\n\nCaused by:")?;
		}

		while let Some(cause) = cause_iter {
			for line in cause.to_string().lines() {
				write!(f, "\n\t{line}")?;
			}
			cause_iter = cause.source();
		}

		Ok(())
	}
}

// === Result extensions === //

pub trait ResultExt<T> {
	fn unwrap_pretty(self) -> T;

	fn log(self, level: log::Level) -> Option<T>;
}

impl<T, E: Error> ResultExt<T> for Result<T, E> {
	#[track_caller]
	fn unwrap_pretty(self) -> T {
		match self {
			Ok(val) => val,
			Err(err) => err.raise(),
		}
	}

	fn log(self, level: log::Level) -> Option<T> {
		match self {
			Ok(val) => Some(val),
			Err(err) => {
				err.log(level);
				None
			}
		}
	}
}

// === Tests === //
