//! A growable, contiguous vector with checked access and explicit, poisoning release.

pub mod debug {
	pub mod error;
	pub mod render;
}

pub mod mem {
	pub mod raw;
}

mod macros;

mod vector;
pub use vector::*;

pub use debug::{
	error::{ErrorFormatExt, ResultExt, VectorError},
	render::Render,
};
