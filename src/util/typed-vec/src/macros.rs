/// Builds a [`Vector`](crate::Vector) from a literal run of values.
///
/// The element type is either inferred from the values or given explicitly with a leading
/// `type T;` clause. Either way, every value must have that one type.
///
/// ```
/// use typed_vec::{vector, Vector, VectorError};
///
/// let words = vector![type &str; "Who", "are", "you?"]?;
/// assert_eq!(words.len(), 3);
///
/// let numbers = vector![1u8, 2, 3, 4]?;
/// assert_eq!(*numbers.at(3)?, 4);
///
/// let nothing: Vector<u8> = vector![]?;
/// assert!(nothing.is_empty());
/// # Ok::<(), VectorError>(())
/// ```
///
/// The expansion evaluates to a `Result` since allocating the storage may fail.
#[macro_export]
macro_rules! vector {
	(type $ty:ty; $($value:expr),* $(,)?) => {
		$crate::Vector::<$ty>::from_values([$($value),*])
	};
	($($value:expr),* $(,)?) => {
		$crate::Vector::from_values([$($value),*])
	};
}
