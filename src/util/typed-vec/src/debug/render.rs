//! Opt-in, human-readable rendering of vector elements.
//!
//! A [`Vector`](crate::Vector) knows nothing about how to turn its elements into text. Element
//! types either implement [`Render`] or the caller passes a mapping to
//! [`display_with`](crate::Vector::display_with). The output is meant for people reading logs and
//! terminals; it has no grammar anyone should parse.

use std::{fmt, rc::Rc, sync::Arc};

use derive_where::derive_where;

// === Render === //

/// The capability of being printed as a vector element.
pub trait Render {
	fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! impl_render_via_display {
	($($ty:ty),*$(,)?) => {$(
		impl Render for $ty {
			fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				fmt::Display::fmt(self, f)
			}
		}
	)*};
}

impl_render_via_display!(
	i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
	String,
);

impl<T: ?Sized + Render> Render for &'_ T {
	fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		(**self).render(f)
	}
}

impl<T: ?Sized + Render> Render for &'_ mut T {
	fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		(**self).render(f)
	}
}

impl<T: ?Sized + Render> Render for Box<T> {
	fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		(**self).render(f)
	}
}

impl<T: ?Sized + Render> Render for Rc<T> {
	fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		(**self).render(f)
	}
}

impl<T: ?Sized + Render> Render for Arc<T> {
	fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		(**self).render(f)
	}
}

macro_rules! impl_render_for_tuples {
	($($first:ident $(, $rest:ident)*;)*) => {$(
		#[allow(non_snake_case)]
		impl<$first: Render $(, $rest: Render)*> Render for ($first, $($rest,)*) {
			fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				let ($first, $($rest,)*) = self;

				f.write_str("(")?;
				$first.render(f)?;
				$(
					f.write_str(", ")?;
					$rest.render(f)?;
				)*
				f.write_str(")")
			}
		}
	)*};
}

impl_render_for_tuples! {
	A;
	A, B;
	A, B, C;
	A, B, C, D;
}

/// Adapts a [`Render`] value into something [`fmt::Display`] accepts.
#[derive_where(Copy, Clone)]
pub struct Rendered<'a, T: ?Sized>(pub &'a T);

impl<T: ?Sized + Render> fmt::Display for Rendered<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.render(f)
	}
}

// === VectorDisplay === //

/// A listing of a vector's live elements in the form `[a, b, c]`.
///
/// A released vector is listed as `<released>`.
#[derive_where(Copy, Clone; F)]
pub struct VectorDisplay<'a, T, F> {
	elems: Option<&'a [T]>,
	render: F,
}

impl<'a, T, F> VectorDisplay<'a, T, F> {
	pub(crate) fn new(elems: Option<&'a [T]>, render: F) -> Self {
		Self { elems, render }
	}
}

impl<'a, T, F, R> fmt::Display for VectorDisplay<'a, T, F>
where
	F: Fn(&'a T) -> R,
	R: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Some(elems) = self.elems else {
			return f.write_str("<released>");
		};

		f.write_str("[")?;
		for (i, elem) in elems.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}", (self.render)(elem))?;
		}
		f.write_str("]")
	}
}

// === Tests === //

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn renders_scalars_and_tuples() {
		assert_eq!(Rendered(&42).to_string(), "42");
		assert_eq!(Rendered("you?").to_string(), "you?");
		assert_eq!(Rendered(&String::from("Who")).to_string(), "Who");
		assert_eq!(Rendered(&(4, 2)).to_string(), "(4, 2)");
		assert_eq!(Rendered(&('a', true, 1.5)).to_string(), "(a, true, 1.5)");
		assert_eq!(Rendered(&(7,)).to_string(), "(7)");
		assert_eq!(Rendered(&Box::new(Arc::new(-3))).to_string(), "-3");
	}

	#[test]
	fn lists_elements() {
		let elems = [1, 2, 3];

		assert_eq!(
			VectorDisplay::new(Some(&elems[..]), Rendered).to_string(),
			"[1, 2, 3]"
		);
		assert_eq!(
			VectorDisplay::new(Some(&elems[..]), |v: &i32| v * 10).to_string(),
			"[10, 20, 30]"
		);
		assert_eq!(
			VectorDisplay::new(Some(&elems[..0]), Rendered).to_string(),
			"[]"
		);
		assert_eq!(
			VectorDisplay::new(None::<&[i32]>, Rendered).to_string(),
			"<released>"
		);
	}
}
