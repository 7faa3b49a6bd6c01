use std::any;
use std::borrow::Cow;

use crate::Result;

/// A function that can be wrapped by a [`Registry`](crate::Registry) for timing.
///
/// This is implemented for every function and closure that takes up to eight
/// arguments, with the arguments passed as a tuple (`()`, `(a,)`, `(a, b)`, ...).
/// It is also implemented by [`Timed`](crate::Timed), so an already timed
/// function can be wrapped again.
///
/// You do not normally need to implement this trait yourself.
pub trait Callable<Args> {
    /// The value returned by the function.
    type Output;

    /// Calls the function with the given arguments.
    ///
    /// Plain functions always succeed. A [`Timed`](crate::Timed) function fails if
    /// its timer cannot be updated.
    ///
    /// # Errors
    ///
    /// Returns the error of the innermost timer that could not be updated.
    fn invoke(&mut self, args: Args) -> Result<Self::Output>;

    /// The identifier of the function, used as the timer key in name-derived mode.
    ///
    /// For plain function items this is the function's own name without its
    /// module path or generic arguments. For closures it is the name of the
    /// enclosing function followed by `::{{closure}}`.
    ///
    /// Function pointers and boxed trait objects have no identifier of their own, so
    /// their full type name (e.g. `fn(u64) -> u64`) is used instead. Wrap those with
    /// [`Registry::wrap_as()`](crate::Registry::wrap_as) to give them a readable key.
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(derive_name(any::type_name::<Self>()))
    }
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<F, R, $($arg),*> Callable<($($arg,)*)> for F
        where
            F: FnMut($($arg),*) -> R,
        {
            type Output = R;

            #[allow(non_snake_case, reason = "argument names are reused from type parameters")]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> Result<R> {
                Ok(self($($arg),*))
            }
        }
    };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);
impl_callable!(A1, A2, A3, A4, A5, A6, A7);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8);

const CLOSURE_SEGMENT: &str = "{{closure}}";

const BOX_PREFIX: &str = "alloc::boxed::Box<";

/// Reduces a full type name such as `my_crate::io::load<u8>` to `load`.
///
/// Types without a path identifier (function pointers, trait objects) keep their
/// full type name.
pub(crate) fn derive_name(type_name: &str) -> String {
    identifier_of(type_name).unwrap_or_else(|| type_name.to_string())
}

fn identifier_of(type_name: &str) -> Option<String> {
    let trimmed = type_name.trim_start_matches('&');
    let trimmed = trimmed.strip_prefix("mut ").unwrap_or(trimmed);

    if let Some(inner) = trimmed
        .strip_prefix(BOX_PREFIX)
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return identifier_of(inner);
    }

    let path = strip_generic_arguments(trimmed);

    // Function pointers and `dyn Fn*` sugar carry a parameter list instead of a path.
    if path.contains('(') || path.starts_with("dyn ") {
        return None;
    }

    let segments: Vec<&str> = path
        .split("::")
        .filter(|segment| !segment.is_empty())
        .collect();

    let (&last, parents) = segments.split_last()?;

    if last != CLOSURE_SEGMENT {
        return Some(last.to_string());
    }

    Some(
        match parents.iter().rev().find(|segment| **segment != CLOSURE_SEGMENT) {
            Some(enclosing) => format!("{enclosing}::{CLOSURE_SEGMENT}"),
            None => CLOSURE_SEGMENT.to_string(),
        },
    )
}

fn strip_generic_arguments(type_name: &str) -> String {
    let mut result = String::with_capacity(type_name.len());
    let mut depth = 0_usize;
    let mut previous = None;

    for c in type_name.chars() {
        match c {
            '<' => depth = depth.saturating_add(1),
            // The `>` of a `->` return arrow is not a closing bracket.
            '>' if previous == Some('-') => {
                if depth == 0 {
                    result.push(c);
                }
            }
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => result.push(c),
            _ => {}
        }

        previous = Some(c);
    }

    result
}
